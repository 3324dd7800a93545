//! Stat curves mapping a tier to a concrete value.
//!
//! Every concrete number a segment exposes (weight, cost, damage, speed, ...)
//! comes from one `PowerScaling` evaluated at one of its def's tiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::def::SegmentKind;
use super::tier::Tier;

/// Exponential interpolation from a (size, quality) pair to a value.
///
/// `ref_size` is the multiplier gained over four size classes and
/// `ref_quality` the multiplier gained over three quality levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerScaling {
    pub min: f32,
    pub ref_size: f32,
    pub ref_quality: f32,
    pub bad_name: &'static str,
    pub good_name: &'static str,
}

impl PowerScaling {
    pub const fn new(
        min: f32,
        ref_size: f32,
        ref_quality: f32,
        bad_name: &'static str,
        good_name: &'static str,
    ) -> Self {
        Self {
            min,
            ref_size,
            ref_quality,
            bad_name,
            good_name,
        }
    }

    pub fn value_at(&self, size: f32, quality: f32) -> f32 {
        self.min
            * ((size - 1.0) * self.ref_size.ln() / 4.0).exp()
            * (quality * self.ref_quality.ln() / 3.0).exp()
    }

    pub fn value(&self, tier: Tier) -> f32 {
        self.value_at(tier.size, tier.quality)
    }

    /// Descriptor for a quality offset, None when unmodified
    pub fn adjective(&self, quality: f32) -> Option<&'static str> {
        if quality == 0.0 {
            None
        } else if quality > 0.0 {
            Some(self.good_name)
        } else {
            Some(self.bad_name)
        }
    }
}

/// Every stat a def can carry a tier for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Weight,
    Drain,
    Cost,
    MaxHits,
    Damage,
    Rate,
    Shots,
    Aim,
    AmmoUse,
    AimBonus,
    Capacity,
    Generation,
    Lift,
    Speed,
    Reduction,
    Mitigation,
    ShieldCapacity,
    Recharge,
    Throughput,
    StorageCapacity,
    Yield,
    CrewCapacity,
}

impl Stat {
    pub const ALL: [Stat; 22] = [
        Stat::Weight,
        Stat::Drain,
        Stat::Cost,
        Stat::MaxHits,
        Stat::Damage,
        Stat::Rate,
        Stat::Shots,
        Stat::Aim,
        Stat::AmmoUse,
        Stat::AimBonus,
        Stat::Capacity,
        Stat::Generation,
        Stat::Lift,
        Stat::Speed,
        Stat::Reduction,
        Stat::Mitigation,
        Stat::ShieldCapacity,
        Stat::Recharge,
        Stat::Throughput,
        Stat::StorageCapacity,
        Stat::Yield,
        Stat::CrewCapacity,
    ];

    /// Short name used inside derived def names
    pub fn name(&self) -> &'static str {
        match self {
            Stat::Weight => "weight",
            Stat::Drain => "drain",
            Stat::Cost => "cost",
            Stat::MaxHits => "max_hits",
            Stat::Damage => "damage",
            Stat::Rate => "rate",
            Stat::Shots => "shots",
            Stat::Aim => "aim",
            Stat::AmmoUse => "ammo_use",
            Stat::AimBonus => "aim_bonus",
            Stat::Capacity => "capacity",
            Stat::Generation => "generation",
            Stat::Lift => "lift",
            Stat::Speed => "speed",
            Stat::Reduction => "reduction",
            Stat::Mitigation => "mitigation",
            Stat::ShieldCapacity => "shield_capacity",
            Stat::Recharge => "recharge",
            Stat::Throughput => "throughput",
            Stat::StorageCapacity => "storage_capacity",
            Stat::Yield => "yield",
            Stat::CrewCapacity => "crew_capacity",
        }
    }

    pub fn from_name(name: &str) -> Option<Stat> {
        Stat::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Curve for a stat on a segment of the given kind.
///
/// Weight, drain, cost and durability vary by kind; the kind-specific
/// stats have one curve each.
pub fn scaling(stat: Stat, kind: SegmentKind) -> PowerScaling {
    use SegmentKind::*;
    match stat {
        Stat::Weight => {
            let min = match kind {
                Power => 8.0,
                Traction => 10.0,
                Offense => 6.0,
                Defense => 12.0,
                Industry => 10.0,
                Storage => 6.0,
                Harvest => 10.0,
                Habitat => 8.0,
            };
            PowerScaling::new(min, 3.0, 0.8, "heavy", "light")
        }
        Stat::Drain => {
            let min = match kind {
                Power => 1.0,
                Traction => 4.0,
                Offense => 6.0,
                Defense => 3.0,
                Industry => 5.0,
                Storage => 1.0,
                Harvest => 4.0,
                Habitat => 2.0,
            };
            PowerScaling::new(min, 2.5, 0.8, "hungry", "efficient")
        }
        Stat::Cost => {
            let min = match kind {
                Power => 60.0,
                Traction => 40.0,
                Offense => 50.0,
                Defense => 45.0,
                Industry => 70.0,
                Storage => 25.0,
                Harvest => 55.0,
                Habitat => 35.0,
            };
            PowerScaling::new(min, 3.0, 1.6, "cheap", "premium")
        }
        Stat::MaxHits => {
            let min = match kind {
                Power => 10.0,
                Traction => 12.0,
                Offense => 8.0,
                Defense => 16.0,
                Industry => 10.0,
                Storage => 10.0,
                Harvest => 10.0,
                Habitat => 8.0,
            };
            PowerScaling::new(min, 2.0, 1.5, "fragile", "sturdy")
        }
        Stat::Damage => PowerScaling::new(3.0, 2.5, 1.5, "weak", "deadly"),
        Stat::Rate => PowerScaling::new(6.0, 1.2, 1.4, "sluggish", "rapid"),
        Stat::Shots => PowerScaling::new(1.0, 2.0, 1.5, "sparse", "volley"),
        Stat::Aim => PowerScaling::new(1.0, 1.2, 1.5, "wild", "accurate"),
        Stat::AmmoUse => PowerScaling::new(1.0, 2.0, 0.8, "wasteful", "frugal"),
        Stat::AimBonus => PowerScaling::new(0.25, 1.5, 1.5, "blurry", "sharp"),
        Stat::Capacity => PowerScaling::new(300.0, 3.0, 1.5, "shallow", "deep"),
        Stat::Generation => PowerScaling::new(20.0, 3.0, 1.5, "weak", "strong"),
        Stat::Lift => PowerScaling::new(60.0, 3.0, 1.4, "weak", "strong"),
        Stat::Speed => PowerScaling::new(50.0, 1.1, 1.3, "slow", "fast"),
        Stat::Reduction => PowerScaling::new(2.0, 2.0, 1.5, "thin", "thick"),
        Stat::Mitigation => PowerScaling::new(0.25, 1.2, 1.25, "brittle", "layered"),
        Stat::ShieldCapacity => PowerScaling::new(10.0, 2.0, 1.5, "faint", "dense"),
        Stat::Recharge => PowerScaling::new(6.0, 2.0, 1.5, "slow", "quick"),
        Stat::Throughput => PowerScaling::new(1.0, 2.0, 1.5, "slow", "productive"),
        Stat::StorageCapacity => PowerScaling::new(100.0, 3.0, 1.5, "cramped", "roomy"),
        Stat::Yield => PowerScaling::new(10.0, 2.5, 1.5, "poor", "rich"),
        Stat::CrewCapacity => PowerScaling::new(10.0, 2.5, 1.3, "cramped", "spacious"),
    }
}
