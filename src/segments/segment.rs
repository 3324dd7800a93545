//! Runtime segment instances.
//!
//! A segment wraps a shared def with the state that changes during play:
//! accumulated hits, activation and packaging flags, weapon cooldown and the
//! kind-specific fields (reactor charge, shield charge, production, storage).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::catalog::DefCatalog;
use super::def::{DefVariant, SegmentDef, SegmentKind};
use super::scaling::Stat;
use crate::core::error::{CrawlerError, Result};
use crate::core::rng::SimRng;
use crate::core::types::{ActorId, Terrain};

/// Plating never mitigates more than this fraction of a hit
pub const MAX_MITIGATION: f32 = 0.9;

/// Operational state, derived from hits and flags and never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Working {
    Pristine,
    Running,
    Damaged,
    Destroyed,
    Deactivated,
    Packaged,
}

impl Working {
    /// Contributes its output (power, speed, fire, defense)
    pub fn is_active(self) -> bool {
        matches!(self, Working::Pristine | Working::Running)
    }

    /// Installed and intact enough to target or repair
    pub fn is_usable(self) -> bool {
        !matches!(self, Working::Destroyed | Working::Packaged)
    }
}

impl fmt::Display for Working {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Working::Pristine => "Pristine",
            Working::Running => "Running",
            Working::Damaged => "Damaged",
            Working::Destroyed => "Destroyed",
            Working::Deactivated => "Deactivated",
            Working::Packaged => "Packaged",
        };
        f.write_str(s)
    }
}

/// Derive the working state from its inputs
pub fn working_state(hits: i32, max_health: i32, activated: bool, packaged: bool) -> Working {
    if hits >= max_health {
        Working::Destroyed
    } else if packaged {
        Working::Packaged
    } else if !activated {
        Working::Deactivated
    } else if hits > max_health / 2 {
        Working::Damaged
    } else if hits > 0 {
        Working::Running
    } else {
        Working::Pristine
    }
}

/// Kind-specific mutable state
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentState {
    Plain,
    Reactor { charge: f32 },
    Shield { shield_left: f32 },
    Industry { recipe: Option<String>, progress: f32 },
    Storage { used_capacity: f32 },
}

impl SegmentState {
    fn fresh(def: &SegmentDef) -> Self {
        match &def.variant {
            DefVariant::Reactor(_) => SegmentState::Reactor {
                charge: def.value(Stat::Capacity),
            },
            DefVariant::Shield(_) => SegmentState::Shield {
                shield_left: def.value(Stat::ShieldCapacity),
            },
            DefVariant::Industry(_) => SegmentState::Industry {
                recipe: None,
                progress: 0.0,
            },
            DefVariant::Storage(_) => SegmentState::Storage { used_capacity: 0.0 },
            _ => SegmentState::Plain,
        }
    }
}

/// Persisted form of a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentData {
    pub seed: u64,
    pub def_name: String,
    pub hits: i32,
    pub packaged: bool,
    pub activated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shield_left: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_capacity: Option<f32>,
}

/// One installed module of a crawler
#[derive(Debug, Clone)]
pub struct Segment {
    def: Arc<SegmentDef>,
    /// Owning actor, for lookup only
    owner: ActorId,
    seed: u64,
    hits: i32,
    activated: bool,
    packaged: bool,
    /// Weapon cooldown remaining
    cycle: Duration,
    state: SegmentState,
}

impl Segment {
    pub fn new(def: Arc<SegmentDef>, owner: ActorId, seed: u64) -> Self {
        let state = SegmentState::fresh(&def);
        Self {
            def,
            owner,
            seed,
            hits: 0,
            activated: true,
            packaged: false,
            cycle: Duration::ZERO,
            state,
        }
    }

    pub fn def(&self) -> &Arc<SegmentDef> {
        &self.def
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn kind(&self) -> SegmentKind {
        self.def.kind()
    }

    pub fn owner(&self) -> ActorId {
        self.owner
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fresh random stream for this segment; advances the stored seed
    pub fn rng(&mut self) -> SimRng {
        SimRng::advance(&mut self.seed)
    }

    // === HEALTH ===

    pub fn hits(&self) -> i32 {
        self.hits
    }

    pub fn max_health(&self) -> i32 {
        self.def.max_hits()
    }

    /// Hits left before destruction
    pub fn health(&self) -> i32 {
        self.max_health() - self.hits
    }

    pub fn working(&self) -> Working {
        working_state(self.hits, self.max_health(), self.activated, self.packaged)
    }

    pub fn is_active(&self) -> bool {
        self.working().is_active()
    }

    pub fn is_usable(&self) -> bool {
        self.working().is_usable()
    }

    pub fn is_destroyed(&self) -> bool {
        self.hits >= self.max_health()
    }

    /// Add (or with a negative delta, remove) hits; returns the change applied
    pub fn add_dmg(&mut self, delta: i32) -> i32 {
        let max = self.max_health() as i64;
        let next = (self.hits as i64 + delta as i64).clamp(0, max) as i32;
        let applied = next - self.hits;
        self.hits = next;
        applied
    }

    /// Take up to `damage` hits, bounded by remaining health; returns hits taken
    pub fn absorb(&mut self, damage: i32) -> i32 {
        if damage <= 0 {
            return 0;
        }
        self.add_dmg(damage.min(self.health()))
    }

    /// Remove up to `amount` hits; returns hits repaired
    pub fn repair(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        -self.add_dmg(-amount)
    }

    // === FLAGS ===

    pub fn activated(&self) -> bool {
        self.activated
    }

    pub fn packaged(&self) -> bool {
        self.packaged
    }

    pub fn set_activated(&mut self, activated: bool) {
        self.activated = activated;
    }

    pub fn set_packaged(&mut self, packaged: bool) {
        self.packaged = packaged;
    }

    // === COOLDOWN ===

    pub fn cycle(&self) -> Duration {
        self.cycle
    }

    pub fn is_cycle_ready(&self) -> bool {
        self.cycle.is_zero()
    }

    pub fn start_cycle(&mut self, length: Duration) {
        self.cycle = length;
    }

    pub fn tick_cooldown(&mut self, elapsed: Duration) {
        self.cycle = self.cycle.saturating_sub(elapsed);
    }

    // === RESOLVED STATS ===

    pub fn weight(&self) -> f32 {
        self.def.weight()
    }

    pub fn drain(&self) -> f32 {
        self.def.drain()
    }

    pub fn cost(&self) -> f32 {
        self.def.cost()
    }

    /// Charge produced per hour, for reactors and chargers
    pub fn generation(&self) -> f32 {
        self.def.value(Stat::Generation)
    }

    pub fn speed(&self) -> f32 {
        self.def.value(Stat::Speed)
    }

    pub fn lift(&self) -> f32 {
        self.def.value(Stat::Lift)
    }

    pub fn terrain_limit(&self) -> Option<Terrain> {
        self.def.as_traction().map(|t| t.terrain_limit)
    }

    /// Flat damage soaked by armor, halved once the plate is damaged
    pub fn reduction(&self) -> f32 {
        let base = self.def.value(Stat::Reduction);
        if self.working() == Working::Damaged {
            base / 2.0
        } else {
            base
        }
    }

    pub fn mitigation(&self) -> f32 {
        self.def.value(Stat::Mitigation).min(MAX_MITIGATION)
    }

    // === REACTOR ===

    pub fn capacity(&self) -> f32 {
        self.def.value(Stat::Capacity)
    }

    pub fn charge(&self) -> f32 {
        match self.state {
            SegmentState::Reactor { charge } => charge,
            _ => 0.0,
        }
    }

    /// Set reactor charge, clamped to [0, capacity]; no-op for other kinds
    pub fn set_charge(&mut self, value: f32) {
        let capacity = self.capacity();
        if let SegmentState::Reactor { charge } = &mut self.state {
            *charge = value.clamp(0.0, capacity);
        }
    }

    // === SHIELD ===

    pub fn shield_capacity(&self) -> f32 {
        self.def.value(Stat::ShieldCapacity)
    }

    /// Shield charge restored per hour
    pub fn recharge(&self) -> f32 {
        self.def.value(Stat::Recharge)
    }

    pub fn shield_left(&self) -> f32 {
        match self.state {
            SegmentState::Shield { shield_left } => shield_left,
            _ => 0.0,
        }
    }

    pub fn set_shield_left(&mut self, value: f32) {
        let capacity = self.shield_capacity();
        if let SegmentState::Shield { shield_left } = &mut self.state {
            *shield_left = value.clamp(0.0, capacity);
        }
    }

    // === INDUSTRY ===

    pub fn recipe(&self) -> Option<&str> {
        match &self.state {
            SegmentState::Industry { recipe, .. } => recipe.as_deref(),
            _ => None,
        }
    }

    pub fn production_progress(&self) -> f32 {
        match self.state {
            SegmentState::Industry { progress, .. } => progress,
            _ => 0.0,
        }
    }

    /// Switch recipe, discarding progress on the previous one
    pub fn set_recipe(&mut self, new_recipe: Option<String>) {
        if let SegmentState::Industry { recipe, progress } = &mut self.state {
            if *recipe != new_recipe {
                *recipe = new_recipe;
                *progress = 0.0;
            }
        }
    }

    pub fn set_production_progress(&mut self, value: f32) {
        if let SegmentState::Industry { progress, .. } = &mut self.state {
            *progress = value.clamp(0.0, 1.0);
        }
    }

    // === STORAGE ===

    pub fn storage_capacity(&self) -> f32 {
        self.def.value(Stat::StorageCapacity)
    }

    pub fn used_capacity(&self) -> f32 {
        match self.state {
            SegmentState::Storage { used_capacity } => used_capacity,
            _ => 0.0,
        }
    }

    /// Claim space, returns the amount actually stored
    pub fn store(&mut self, amount: f32) -> f32 {
        let capacity = self.storage_capacity();
        match &mut self.state {
            SegmentState::Storage { used_capacity } if amount > 0.0 => {
                let stored = amount.min(capacity - *used_capacity).max(0.0);
                *used_capacity += stored;
                stored
            }
            _ => 0.0,
        }
    }

    /// Free space, returns the amount actually released
    pub fn release(&mut self, amount: f32) -> f32 {
        match &mut self.state {
            SegmentState::Storage { used_capacity } if amount > 0.0 => {
                let released = amount.min(*used_capacity);
                *used_capacity -= released;
                released
            }
            _ => 0.0,
        }
    }

    pub fn state(&self) -> &SegmentState {
        &self.state
    }

    // === PERSISTENCE ===

    pub fn to_data(&self) -> SegmentData {
        let mut data = SegmentData {
            seed: self.seed,
            def_name: self.def.name.clone(),
            hits: self.hits,
            packaged: self.packaged,
            activated: self.activated,
            charge: None,
            shield_left: None,
            recipe: None,
            progress: None,
            used_capacity: None,
        };
        match &self.state {
            SegmentState::Plain => {}
            SegmentState::Reactor { charge } => data.charge = Some(*charge),
            SegmentState::Shield { shield_left } => data.shield_left = Some(*shield_left),
            SegmentState::Industry { recipe, progress } => {
                data.recipe = recipe.clone();
                data.progress = Some(*progress);
            }
            SegmentState::Storage { used_capacity } => data.used_capacity = Some(*used_capacity),
        }
        data
    }

    /// Restore persisted state into a segment of the same def
    pub fn load_data(&mut self, data: &SegmentData) -> Result<()> {
        if data.def_name != self.def.name {
            return Err(CrawlerError::DefMismatch {
                expected: self.def.name.clone(),
                found: data.def_name.clone(),
            });
        }
        self.seed = data.seed;
        self.hits = data.hits.clamp(0, self.max_health());
        self.packaged = data.packaged;
        self.activated = data.activated;
        if let Some(charge) = data.charge {
            self.set_charge(charge);
        }
        if let Some(shield_left) = data.shield_left {
            self.set_shield_left(shield_left);
        }
        if let SegmentState::Industry { recipe, progress } = &mut self.state {
            *recipe = data.recipe.clone();
            *progress = data.progress.unwrap_or(0.0).clamp(0.0, 1.0);
        }
        if let Some(used) = data.used_capacity {
            let capacity = self.storage_capacity();
            if let SegmentState::Storage { used_capacity } = &mut self.state {
                *used_capacity = used.clamp(0.0, capacity);
            }
        }
        Ok(())
    }

    /// Rebuild a segment from persisted data, resolving its def by name
    pub fn from_data(catalog: &mut DefCatalog, owner: ActorId, data: &SegmentData) -> Result<Self> {
        let def = catalog.resolve(&data.def_name)?;
        let mut segment = Segment::new(def, owner, data.seed);
        segment.load_data(data)?;
        Ok(segment)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{} {}/{}]",
            self.def.name,
            self.working(),
            self.health(),
            self.max_health()
        )?;
        match &self.state {
            SegmentState::Reactor { charge } => {
                write!(f, " charge {:.0}/{:.0}", charge, self.capacity())
            }
            SegmentState::Shield { shield_left } => {
                write!(f, " shield {:.0}/{:.0}", shield_left, self.shield_capacity())
            }
            _ => Ok(()),
        }
    }
}
