//! Segment definitions: immutable blueprints resolving stats from tiers.
//!
//! A def carries the four tiers every segment has (weight, drain, cost,
//! durability) plus a variant with the kind-specific tiers. Defs are shared
//! behind `Arc` once registered in the catalog and never mutated; resizing or
//! upgrading produces a new def with its own canonical name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::scaling::{scaling, Stat};
use super::tier::Tier;
use crate::core::error::{CrawlerError, Result};
use crate::core::types::{Commodity, Terrain};

/// Smallest size class a def can be resized to
pub const MIN_SIZE: f32 = 1.0;

/// Broad role of a segment, also the primary sort key of a crawler's segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Power,
    Traction,
    Offense,
    Defense,
    Industry,
    Storage,
    Harvest,
    Habitat,
}

impl SegmentKind {
    pub const ALL: [SegmentKind; 8] = [
        SegmentKind::Power,
        SegmentKind::Traction,
        SegmentKind::Offense,
        SegmentKind::Defense,
        SegmentKind::Industry,
        SegmentKind::Storage,
        SegmentKind::Harvest,
        SegmentKind::Habitat,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponClass {
    /// Chance to fire a doubled volley
    Gun,
    /// Chance to double a shot's damage
    Laser,
    /// Chance to gain extra aim
    Missile,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeaponDef {
    pub class: WeaponClass,
    pub damage: Tier,
    pub rate: Tier,
    pub shots: Tier,
    pub aim: Tier,
    pub ammo_use: Tier,
    pub ammo: Option<Commodity>,
}

/// Non-weapon offense: sharpens every weapon's aim
#[derive(Debug, Clone, PartialEq)]
pub struct TargetingDef {
    pub aim_bonus: Tier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReactorDef {
    pub capacity: Tier,
    pub generation: Tier,
}

/// Generation without storage
#[derive(Debug, Clone, PartialEq)]
pub struct ChargerDef {
    pub generation: Tier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TractionDef {
    pub lift: Tier,
    pub speed: Tier,
    /// Roughest terrain this traction can cross (at a penalty)
    pub terrain_limit: Terrain,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArmorDef {
    pub reduction: Tier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlatingDef {
    pub mitigation: Tier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShieldDef {
    pub capacity: Tier,
    pub recharge: Tier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndustryDef {
    pub throughput: Tier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageDef {
    pub capacity: Tier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HarvestDef {
    pub yield_tier: Tier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HabitatDef {
    pub crew_capacity: Tier,
}

/// Kind-specific part of a def
#[derive(Debug, Clone, PartialEq)]
pub enum DefVariant {
    Weapon(WeaponDef),
    Targeting(TargetingDef),
    Reactor(ReactorDef),
    Charger(ChargerDef),
    Traction(TractionDef),
    Armor(ArmorDef),
    Plating(PlatingDef),
    Shield(ShieldDef),
    Industry(IndustryDef),
    Storage(StorageDef),
    Harvest(HarvestDef),
    Habitat(HabitatDef),
}

impl DefVariant {
    pub fn kind(&self) -> SegmentKind {
        match self {
            DefVariant::Weapon(_) | DefVariant::Targeting(_) => SegmentKind::Offense,
            DefVariant::Reactor(_) | DefVariant::Charger(_) => SegmentKind::Power,
            DefVariant::Traction(_) => SegmentKind::Traction,
            DefVariant::Armor(_) | DefVariant::Plating(_) | DefVariant::Shield(_) => {
                SegmentKind::Defense
            }
            DefVariant::Industry(_) => SegmentKind::Industry,
            DefVariant::Storage(_) => SegmentKind::Storage,
            DefVariant::Harvest(_) => SegmentKind::Harvest,
            DefVariant::Habitat(_) => SegmentKind::Habitat,
        }
    }

    /// Segments that draw no running power
    fn is_passive(&self) -> bool {
        matches!(
            self,
            DefVariant::Reactor(_)
                | DefVariant::Charger(_)
                | DefVariant::Armor(_)
                | DefVariant::Plating(_)
                | DefVariant::Storage(_)
        )
    }

    fn tier(&self, stat: Stat) -> Option<Tier> {
        match (self, stat) {
            (DefVariant::Weapon(w), Stat::Damage) => Some(w.damage),
            (DefVariant::Weapon(w), Stat::Rate) => Some(w.rate),
            (DefVariant::Weapon(w), Stat::Shots) => Some(w.shots),
            (DefVariant::Weapon(w), Stat::Aim) => Some(w.aim),
            (DefVariant::Weapon(w), Stat::AmmoUse) if w.ammo.is_some() => Some(w.ammo_use),
            (DefVariant::Targeting(t), Stat::AimBonus) => Some(t.aim_bonus),
            (DefVariant::Reactor(r), Stat::Capacity) => Some(r.capacity),
            (DefVariant::Reactor(r), Stat::Generation) => Some(r.generation),
            (DefVariant::Charger(c), Stat::Generation) => Some(c.generation),
            (DefVariant::Traction(t), Stat::Lift) => Some(t.lift),
            (DefVariant::Traction(t), Stat::Speed) => Some(t.speed),
            (DefVariant::Armor(a), Stat::Reduction) => Some(a.reduction),
            (DefVariant::Plating(p), Stat::Mitigation) => Some(p.mitigation),
            (DefVariant::Shield(s), Stat::ShieldCapacity) => Some(s.capacity),
            (DefVariant::Shield(s), Stat::Recharge) => Some(s.recharge),
            (DefVariant::Industry(i), Stat::Throughput) => Some(i.throughput),
            (DefVariant::Storage(s), Stat::StorageCapacity) => Some(s.capacity),
            (DefVariant::Harvest(h), Stat::Yield) => Some(h.yield_tier),
            (DefVariant::Habitat(h), Stat::CrewCapacity) => Some(h.crew_capacity),
            _ => None,
        }
    }

    fn tier_mut(&mut self, stat: Stat) -> Option<&mut Tier> {
        match (self, stat) {
            (DefVariant::Weapon(w), Stat::Damage) => Some(&mut w.damage),
            (DefVariant::Weapon(w), Stat::Rate) => Some(&mut w.rate),
            (DefVariant::Weapon(w), Stat::Shots) => Some(&mut w.shots),
            (DefVariant::Weapon(w), Stat::Aim) => Some(&mut w.aim),
            (DefVariant::Weapon(w), Stat::AmmoUse) if w.ammo.is_some() => Some(&mut w.ammo_use),
            (DefVariant::Targeting(t), Stat::AimBonus) => Some(&mut t.aim_bonus),
            (DefVariant::Reactor(r), Stat::Capacity) => Some(&mut r.capacity),
            (DefVariant::Reactor(r), Stat::Generation) => Some(&mut r.generation),
            (DefVariant::Charger(c), Stat::Generation) => Some(&mut c.generation),
            (DefVariant::Traction(t), Stat::Lift) => Some(&mut t.lift),
            (DefVariant::Traction(t), Stat::Speed) => Some(&mut t.speed),
            (DefVariant::Armor(a), Stat::Reduction) => Some(&mut a.reduction),
            (DefVariant::Plating(p), Stat::Mitigation) => Some(&mut p.mitigation),
            (DefVariant::Shield(s), Stat::ShieldCapacity) => Some(&mut s.capacity),
            (DefVariant::Shield(s), Stat::Recharge) => Some(&mut s.recharge),
            (DefVariant::Industry(i), Stat::Throughput) => Some(&mut i.throughput),
            (DefVariant::Storage(s), Stat::StorageCapacity) => Some(&mut s.capacity),
            (DefVariant::Harvest(h), Stat::Yield) => Some(&mut h.yield_tier),
            (DefVariant::Habitat(h), Stat::CrewCapacity) => Some(&mut h.crew_capacity),
            _ => None,
        }
    }
}

/// Immutable blueprint for one kind of segment
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentDef {
    /// One-character map glyph
    pub symbol: char,
    /// Catalog name of the def this one was derived from
    pub base_name: String,
    /// Size class of the catalog def
    pub base_size: f32,
    /// Canonical name; resolves back to this def through the catalog
    pub name: String,
    pub size: Tier,
    pub weight: Tier,
    /// None for segments that never draw running power
    pub drain: Option<Tier>,
    pub cost: Tier,
    pub max_hits: Tier,
    pub variant: DefVariant,
    /// Net quality steps applied on top of the catalog def
    pub upgrades: BTreeMap<Stat, i32>,
}

impl SegmentDef {
    /// A def with every tier at `(size, 0)`
    pub fn new(name: impl Into<String>, symbol: char, size: f32, variant: DefVariant) -> Self {
        let name = name.into();
        let tier = Tier::new(size, 0.0);
        let drain = if variant.is_passive() { None } else { Some(tier) };
        Self {
            symbol,
            base_name: name.clone(),
            base_size: size,
            name,
            size: tier,
            weight: tier,
            drain,
            cost: tier,
            max_hits: tier,
            variant,
            upgrades: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> SegmentKind {
        self.variant.kind()
    }

    /// Tier for a stat, None when the stat does not apply
    pub fn tier(&self, stat: Stat) -> Option<Tier> {
        match stat {
            Stat::Weight => Some(self.weight),
            Stat::Drain => self.drain,
            Stat::Cost => Some(self.cost),
            Stat::MaxHits => Some(self.max_hits),
            _ => self.variant.tier(stat),
        }
    }

    fn tier_mut(&mut self, stat: Stat) -> Option<&mut Tier> {
        match stat {
            Stat::Weight => Some(&mut self.weight),
            Stat::Drain => self.drain.as_mut(),
            Stat::Cost => Some(&mut self.cost),
            Stat::MaxHits => Some(&mut self.max_hits),
            _ => self.variant.tier_mut(stat),
        }
    }

    /// Concrete value of a stat; zero when the stat does not apply
    pub fn value(&self, stat: Stat) -> f32 {
        self.tier(stat)
            .map(|tier| scaling(stat, self.kind()).value(tier))
            .unwrap_or(0.0)
    }

    pub fn weight(&self) -> f32 {
        self.value(Stat::Weight)
    }

    pub fn drain(&self) -> f32 {
        self.value(Stat::Drain)
    }

    pub fn cost(&self) -> f32 {
        self.value(Stat::Cost)
    }

    pub fn max_hits(&self) -> i32 {
        (self.value(Stat::MaxHits).round() as i32).max(1)
    }

    /// Set the quality of a stat's tier directly, keeping the name.
    ///
    /// Used when authoring catalog entries; derived defs go through `upgrade`.
    pub fn with_quality(mut self, stat: Stat, quality: f32) -> Result<Self> {
        let name = self.name.clone();
        let tier = self
            .tier_mut(stat)
            .ok_or(CrawlerError::StatNotApplicable { def: name, stat })?;
        tier.quality = quality;
        Ok(self)
    }

    /// New def with every tier shifted to the given size class
    pub fn resize(&self, new_size: f32) -> Result<SegmentDef> {
        if !new_size.is_finite() || new_size < MIN_SIZE {
            return Err(CrawlerError::InvalidSize {
                def: self.name.clone(),
                size: new_size,
            });
        }
        let delta = new_size - self.size.size;
        let mut def = self.clone();
        for stat in Stat::ALL {
            if let Some(tier) = def.tier_mut(stat) {
                *tier = tier.resized(delta);
            }
        }
        def.size = def.size.resized(delta);
        def.name = def.canonical_name();
        Ok(def)
    }

    /// New def with a stat's quality moved by `steps`
    pub fn upgrade(&self, stat: Stat, steps: i32) -> Result<SegmentDef> {
        let mut def = self.clone();
        let tier = def
            .tier_mut(stat)
            .ok_or_else(|| CrawlerError::StatNotApplicable {
                def: self.name.clone(),
                stat,
            })?;
        *tier = *tier + steps as f32;
        let net = def.upgrades.entry(stat).or_insert(0);
        *net += steps;
        if *net == 0 {
            def.upgrades.remove(&stat);
        }
        def.name = def.canonical_name();
        Ok(def)
    }

    /// `Base`, `Base@3`, `Base@3+damage+damage-weight`, ...
    pub fn canonical_name(&self) -> String {
        let mut name = self.base_name.clone();
        if self.size.size != self.base_size {
            name.push_str(&format!("@{}", self.size.size));
        }
        for (stat, steps) in &self.upgrades {
            let sign = if *steps > 0 { '+' } else { '-' };
            for _ in 0..steps.unsigned_abs() {
                name.push(sign);
                name.push_str(stat.name());
            }
        }
        name
    }

    /// Human readable name with upgrade adjectives, e.g. "deadly rapid Autocannon"
    pub fn display_name(&self) -> String {
        let mut words: Vec<&str> = self
            .upgrades
            .iter()
            .filter_map(|(stat, steps)| scaling(*stat, self.kind()).adjective(*steps as f32))
            .collect();
        words.push(&self.base_name);
        let mut name = words.join(" ");
        if self.size.size != self.base_size {
            name.push_str(&format!(" (size {})", self.size.size));
        }
        name
    }

    pub fn as_weapon(&self) -> Option<&WeaponDef> {
        match &self.variant {
            DefVariant::Weapon(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_traction(&self) -> Option<&TractionDef> {
        match &self.variant {
            DefVariant::Traction(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for SegmentDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{:?} {}]", self.name, self.kind(), self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gun(size: f32) -> SegmentDef {
        let t = Tier::new(size, 0.0);
        SegmentDef::new(
            "Autocannon",
            'G',
            size,
            DefVariant::Weapon(WeaponDef {
                class: WeaponClass::Gun,
                damage: t,
                rate: t,
                shots: t,
                aim: t,
                ammo_use: t,
                ammo: Some(Commodity::Slugs),
            }),
        )
    }

    fn reactor() -> SegmentDef {
        let t = Tier::new(1.0, 0.0);
        SegmentDef::new(
            "Reactor",
            'R',
            1.0,
            DefVariant::Reactor(ReactorDef {
                capacity: t,
                generation: t,
            }),
        )
    }

    #[test]
    fn test_kind_from_variant() {
        assert_eq!(gun(1.0).kind(), SegmentKind::Offense);
        assert_eq!(reactor().kind(), SegmentKind::Power);
    }

    #[test]
    fn test_reactor_has_no_drain() {
        let r = reactor();
        assert!(r.tier(Stat::Drain).is_none());
        assert_eq!(r.drain(), 0.0);
        assert!(r.value(Stat::Capacity) > 0.0);
    }

    #[test]
    fn test_resize_shifts_every_tier() {
        let small = gun(1.0);
        let big = small.resize(3.0).unwrap();
        assert_eq!(big.size.size, 3.0);
        for stat in Stat::ALL {
            match (small.tier(stat), big.tier(stat)) {
                (Some(a), Some(b)) => {
                    assert_eq!(b.size - a.size, 2.0, "{:?}", stat);
                    assert_eq!(a.quality, b.quality);
                }
                (None, None) => {}
                _ => panic!("tier presence changed for {:?}", stat),
            }
        }
        assert!(big.weight() > small.weight());
        assert!(big.value(Stat::Damage) > small.value(Stat::Damage));
        assert_eq!(big.name, "Autocannon@3");
    }

    #[test]
    fn test_resize_back_restores_name() {
        let back = gun(1.0).resize(2.0).unwrap().resize(1.0).unwrap();
        assert_eq!(back, gun(1.0));
    }

    #[test]
    fn test_resize_below_minimum_fails() {
        assert!(matches!(
            gun(1.0).resize(0.0),
            Err(CrawlerError::InvalidSize { .. })
        ));
        assert!(gun(1.0).resize(f32::NAN).is_err());
    }

    #[test]
    fn test_upgrade_names_are_canonical() {
        let a = gun(1.0)
            .upgrade(Stat::Rate, 1)
            .unwrap()
            .upgrade(Stat::Damage, 1)
            .unwrap();
        let b = gun(1.0)
            .upgrade(Stat::Damage, 1)
            .unwrap()
            .upgrade(Stat::Rate, 1)
            .unwrap();
        assert_eq!(a.name, b.name);
        assert_eq!(a, b);
        assert_eq!(a.name, "Autocannon+damage+rate");
    }

    #[test]
    fn test_upgrade_cancels_out() {
        let def = gun(1.0)
            .upgrade(Stat::Damage, 2)
            .unwrap()
            .upgrade(Stat::Damage, -2)
            .unwrap();
        assert_eq!(def, gun(1.0));
    }

    #[test]
    fn test_upgrade_inapplicable_stat() {
        assert!(matches!(
            reactor().upgrade(Stat::Drain, 1),
            Err(CrawlerError::StatNotApplicable { .. })
        ));
        assert!(gun(1.0).upgrade(Stat::Lift, 1).is_err());
    }

    #[test]
    fn test_resize_then_upgrade_name() {
        let def = gun(1.0)
            .resize(3.0)
            .unwrap()
            .upgrade(Stat::Weight, -1)
            .unwrap();
        assert_eq!(def.name, "Autocannon@3-weight");
        assert_eq!(def.display_name(), "heavy Autocannon (size 3)");
    }

    #[test]
    fn test_max_hits_at_least_one() {
        assert!(gun(1.0).max_hits() >= 1);
    }
}
