//! Crawler: a vehicle assembled from segments
//!
//! The crawler owns its segments in a flat list and answers every power,
//! movement and combat query through a derived [`SegmentCache`]. Any change
//! to hits or flags made through [`Crawler::segment_mut`] leaves the cache
//! stale until [`Crawler::update_segment_cache`] is called.

pub mod cache;
pub mod movement;
pub mod persistence;
pub mod power;
pub mod supplies;

pub use cache::SegmentCache;
pub use movement::{MoveEvaluation, TripEstimate};
pub use persistence::CrawlerData;
pub use power::TickReport;
pub use supplies::Supplies;

use ahash::AHashMap;
use std::fmt;
use std::sync::Arc;

use crate::combat::relations::ActorRelation;
use crate::core::config::config;
use crate::core::rng::SimRng;
use crate::core::types::ActorId;
use crate::segments::{Segment, SegmentDef, SegmentKind};

#[derive(Debug, Clone)]
pub struct Crawler {
    pub(crate) id: ActorId,
    pub name: String,
    pub(crate) seed: u64,
    pub(crate) segments: Vec<Segment>,
    pub(crate) cache: SegmentCache,
    /// Bumped on every structural change; the cache records the value it was built for
    pub(crate) generation: u64,
    pub crew: u32,
    pub morale: f32,
    pub evil_points: f32,
    pub supplies: Supplies,
    pub(crate) relations: AHashMap<ActorId, ActorRelation>,
}

impl Crawler {
    pub fn new(id: ActorId, name: impl Into<String>, seed: u64, crew: u32) -> Self {
        Self {
            id,
            name: name.into(),
            seed,
            segments: Vec::new(),
            cache: SegmentCache::default(),
            generation: 0,
            crew,
            morale: 0.0,
            evil_points: 0.0,
            supplies: Supplies::new(),
            relations: AHashMap::new(),
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fresh random stream for crawler-level decisions; advances the stored seed
    pub fn rng(&mut self) -> SimRng {
        SimRng::advance(&mut self.seed)
    }

    // === SEGMENTS ===

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Mutable access to a segment.
    ///
    /// Marks the cache stale; call `update_segment_cache` before the next query.
    pub fn segment_mut(&mut self, index: usize) -> Option<&mut Segment> {
        self.generation += 1;
        self.segments.get_mut(index)
    }

    /// Build a segment from a def and install it; returns its index
    pub fn install(&mut self, def: Arc<SegmentDef>) -> usize {
        let seed = self.rng().child_seed();
        let segment = Segment::new(def, self.id, seed);
        self.install_segment(segment)
    }

    pub fn install_segment(&mut self, segment: Segment) -> usize {
        self.segments.push(segment);
        self.invalidate();
        self.segments.len() - 1
    }

    /// Uninstall a segment. Indices after it shift down by one.
    pub fn remove(&mut self, index: usize) -> Option<Segment> {
        if index >= self.segments.len() {
            return None;
        }
        let segment = self.segments.remove(index);
        self.invalidate();
        Some(segment)
    }

    pub fn set_activated(&mut self, index: usize, activated: bool) -> bool {
        let Some(segment) = self.segments.get_mut(index) else {
            return false;
        };
        segment.set_activated(activated);
        self.invalidate();
        true
    }

    pub fn set_packaged(&mut self, index: usize, packaged: bool) -> bool {
        let Some(segment) = self.segments.get_mut(index) else {
            return false;
        };
        segment.set_packaged(packaged);
        self.invalidate();
        true
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.update_segment_cache();
    }

    /// Rebuild the derived segment index from the current segment list
    pub fn update_segment_cache(&mut self) {
        self.cache = SegmentCache::build(&self.segments, self.generation);
    }

    pub fn is_cache_current(&self) -> bool {
        self.cache.generation() == self.generation
    }

    pub fn cache(&self) -> &SegmentCache {
        debug_assert!(
            self.is_cache_current(),
            "segment cache is stale (built for {}, now {})",
            self.cache.generation(),
            self.generation
        );
        &self.cache
    }

    /// Active segments of one kind, in (kind, cost) order
    pub fn active_segments(&self, kind: SegmentKind) -> impl Iterator<Item = &Segment> + '_ {
        self.cache()
            .active_of_kind(kind)
            .iter()
            .map(move |&i| &self.segments[i])
    }

    // === STATUS ===

    /// Total mass: every installed segment (wrecks included), cargo and crew
    pub fn mass(&self) -> f32 {
        let segments: f32 = self.segments.iter().map(Segment::weight).sum();
        segments + self.supplies.weight() + self.crew as f32 * config().crew_weight
    }

    /// No crew left, or nothing left intact
    pub fn is_destroyed(&self) -> bool {
        self.crew == 0 || self.segments.iter().all(Segment::is_destroyed)
    }

    // === RELATIONS ===

    pub fn relation(&self, other: ActorId) -> Option<&ActorRelation> {
        self.relations.get(&other)
    }

    pub fn relation_mut(&mut self, other: ActorId) -> &mut ActorRelation {
        self.relations.entry(other).or_default()
    }

    pub fn relations(&self) -> impl Iterator<Item = (&ActorId, &ActorRelation)> {
        self.relations.iter()
    }
}

impl fmt::Display for Crawler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} (crew {}, morale {:.1}, mass {:.1})",
            self.name,
            self.crew,
            self.morale,
            self.mass()
        )?;
        for segment in &self.segments {
            writeln!(f, "  {}", segment)?;
        }
        Ok(())
    }
}
