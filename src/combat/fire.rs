//! Fire generation
//!
//! A crawler fires every ready weapon it can power. Weapons are admitted in
//! seeded random order until the stored charge runs out, ammunition is paid
//! up front, and each admitted weapon emits one `HitRecord` per shot.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::config::{config, EngineConfig};
use crate::core::rng::SimRng;
use crate::core::types::ActorId;
use crate::crawler::Crawler;
use crate::segments::{DefVariant, SegmentKind, Stat, WeaponClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitType {
    Hits,
    Misses,
}

/// One shot in flight; realized into integer damage on resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRecord {
    pub seed: u64,
    pub attacker: ActorId,
    /// Segment index of the firing weapon on the attacker
    pub weapon: usize,
    pub class: WeaponClass,
    pub expected_damage: f32,
    pub aim: f32,
}

impl HitRecord {
    /// Decide whether the shot lands and how much damage it carries
    pub fn roll(&self, cfg: &EngineConfig, rng: &mut SimRng) -> (HitType, i32) {
        let lands = rng.chance(cfg.hit_chance(self.aim, cfg.base_evasion));
        let damage = rng.stochastic_round(self.expected_damage).max(0);
        if lands {
            (HitType::Hits, damage)
        } else {
            (HitType::Misses, 0)
        }
    }
}

/// Guns sometimes fire a doubled volley
fn adjust_volley(class: WeaponClass, shots: i32, rng: &mut SimRng, cfg: &EngineConfig) -> i32 {
    match class {
        WeaponClass::Gun if rng.chance(cfg.gun_double_shot_chance) => shots * 2,
        _ => shots,
    }
}

fn adjust_shot(hit: &mut HitRecord, rng: &mut SimRng, cfg: &EngineConfig) {
    match hit.class {
        WeaponClass::Laser => {
            if rng.chance(cfg.laser_double_damage_chance) {
                hit.expected_damage *= 2.0;
            }
        }
        WeaponClass::Missile => {
            if rng.chance(cfg.missile_aim_bonus_chance) {
                hit.aim += cfg.missile_aim_bonus;
            }
        }
        WeaponClass::Gun => {}
    }
}

/// Time between volleys at `rate` shots per minute. None when the rate is
/// not positive or the cycle does not fit a `Duration`; such a weapon is
/// never ready.
pub fn cycle_time(rate: f32) -> Option<Duration> {
    if !(rate > 0.0) {
        return None;
    }
    Duration::try_from_secs_f32(60.0 / rate).ok()
}

impl Crawler {
    /// Fire every ready weapon the reactors can power
    pub fn create_fire(&mut self) -> Vec<HitRecord> {
        let cfg = config();
        let attacker = self.id;

        let mut weapons = Vec::new();
        let mut aim_bonus = 0.0;
        for &i in self.cache().active_of_kind(SegmentKind::Offense) {
            let segment = &self.segments[i];
            match &segment.def().variant {
                DefVariant::Weapon(_) => {
                    let cycles = cycle_time(segment.def().value(Stat::Rate)).is_some();
                    if cycles && segment.is_cycle_ready() {
                        weapons.push(i);
                    }
                }
                DefVariant::Targeting(_) => aim_bonus += segment.def().value(Stat::AimBonus),
                _ => {}
            }
        }
        if weapons.is_empty() {
            return Vec::new();
        }

        let mut rng = self.rng();
        rng.shuffle(&mut weapons);

        let total_charge = self.total_charge();
        let mut available = total_charge;
        let mut admitted = Vec::with_capacity(weapons.len());
        for i in weapons {
            let drain = self.segments[i].drain();
            if available >= drain {
                available -= drain;
                admitted.push(i);
            }
        }
        let drawn = (total_charge - available).max(0.0);
        self.draw_power(drawn);

        let mut hits = Vec::new();
        for &i in &admitted {
            let def = self.segments[i].def().clone();
            let Some(weapon) = def.as_weapon() else {
                continue;
            };
            if let Some(ammo) = weapon.ammo {
                let needed = def.value(Stat::AmmoUse);
                if !self.supplies.consume(ammo, needed) {
                    tracing::debug!(crawler = %self.name, weapon = %def.name, "out of ammunition");
                    continue;
                }
            }

            let segment = &mut self.segments[i];
            let mut weapon_rng = segment.rng();
            let base_shots = weapon_rng.stochastic_round(def.value(Stat::Shots)).max(1);
            let shots = adjust_volley(weapon.class, base_shots, &mut weapon_rng, cfg);
            let damage = def.value(Stat::Damage);
            let aim = def.value(Stat::Aim) + aim_bonus;

            for _ in 0..shots {
                let mut shot_rng = weapon_rng.child();
                let mut hit = HitRecord {
                    seed: shot_rng.child_seed(),
                    attacker,
                    weapon: i,
                    class: weapon.class,
                    expected_damage: damage,
                    aim,
                };
                adjust_shot(&mut hit, &mut shot_rng, cfg);
                hits.push(hit);
            }

            if let Some(cycle) = cycle_time(def.value(Stat::Rate)) {
                segment.start_cycle(cycle);
            }
        }

        tracing::debug!(
            crawler = %self.name,
            admitted = admitted.len(),
            drawn,
            shots = hits.len(),
            "volley"
        );
        hits
    }
}
