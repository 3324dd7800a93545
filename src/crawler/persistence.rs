//! Save/load of a whole crawler

use serde::{Deserialize, Serialize};

use super::{Crawler, Supplies};
use crate::combat::relations::ActorRelation;
use crate::core::error::Result;
use crate::core::types::ActorId;
use crate::segments::{DefCatalog, Segment, SegmentData};

/// Persisted form of a crawler.
///
/// Segment defs are stored by canonical name and resolved through a
/// [`DefCatalog`] on load, so derived defs survive the round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlerData {
    pub id: ActorId,
    pub name: String,
    pub seed: u64,
    pub crew: u32,
    pub morale: f32,
    pub evil_points: f32,
    #[serde(default)]
    pub supplies: Supplies,
    /// Sorted by counterpart id
    #[serde(default)]
    pub relations: Vec<(ActorId, ActorRelation)>,
    pub segments: Vec<SegmentData>,
}

impl CrawlerData {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Crawler {
    pub fn to_data(&self) -> CrawlerData {
        let mut relations: Vec<(ActorId, ActorRelation)> = self
            .relations
            .iter()
            .map(|(id, relation)| (*id, relation.clone()))
            .collect();
        relations.sort_by_key(|(id, _)| *id);

        CrawlerData {
            id: self.id,
            name: self.name.clone(),
            seed: self.seed,
            crew: self.crew,
            morale: self.morale,
            evil_points: self.evil_points,
            supplies: self.supplies.clone(),
            relations,
            segments: self.segments.iter().map(Segment::to_data).collect(),
        }
    }

    pub fn from_data(catalog: &mut DefCatalog, data: &CrawlerData) -> Result<Crawler> {
        let mut crawler = Crawler::new(data.id, data.name.clone(), data.seed, data.crew);
        crawler.morale = data.morale;
        crawler.evil_points = data.evil_points;
        crawler.supplies = data.supplies.clone();
        crawler.relations = data.relations.iter().cloned().collect();
        for segment in &data.segments {
            crawler
                .segments
                .push(Segment::from_data(catalog, data.id, segment)?);
        }
        crawler.generation += 1;
        crawler.update_segment_cache();
        tracing::debug!(
            crawler = %crawler.name,
            segments = crawler.segments.len(),
            "crawler loaded"
        );
        Ok(crawler)
    }
}
