//! Damage resolution
//!
//! Each hit runs through four absorption phases in order: one active shield,
//! then one armor or plating segment, then one non-defense segment, and
//! whatever is left falls on the crew. A phase with no candidates is skipped.
//! Every random pick draws from the hit's own seed.

use serde::Serialize;

use super::fire::{HitRecord, HitType};
use super::relations::kill_reward;
use crate::core::config::config;
use crate::core::rng::SimRng;
use crate::crawler::Crawler;
use crate::segments::{DefVariant, SegmentKind, Working};

/// Where one hit's damage went. `shield + armor + hull + crew + overkill == damage`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HitAbsorption {
    pub damage: i32,
    pub shield: i32,
    pub armor: i32,
    pub hull: i32,
    pub crew: i32,
    /// Damage with nothing left to land on
    pub overkill: i32,
    pub crew_lost: u32,
    pub destroyed_segments: Vec<usize>,
}

impl HitAbsorption {
    pub fn absorbed(&self) -> i32 {
        self.shield + self.armor + self.hull + self.crew
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitOutcome {
    pub hit_type: HitType,
    pub absorption: HitAbsorption,
}

/// Summary of one `receive_fire` call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DamageReport {
    pub outcomes: Vec<HitOutcome>,
    pub total_damage: i64,
    pub crew_lost: u32,
    pub segments_destroyed: Vec<usize>,
    /// First damage ever taken from this attacker
    pub first_blood: bool,
    /// This call took the crawler from alive to destroyed
    pub destroyed: bool,
    pub kill_reward: f32,
}

/// Scaled reductions carry float noise; a value this close to a whole
/// number soaks exactly that number.
const WHOLE_EPSILON: f32 = 1e-3;

fn settle(value: f32) -> f32 {
    let whole = value.round();
    if (value - whole).abs() < WHOLE_EPSILON {
        whole
    } else {
        value
    }
}

impl Crawler {
    /// Run one hit's damage through the absorption phases, then rebuild the
    /// segment cache
    pub fn absorb_hit(&mut self, damage: i32, rng: &mut SimRng) -> HitAbsorption {
        let result = self.resolve_hit(damage, rng);
        self.generation += 1;
        self.update_segment_cache();
        result
    }

    /// Absorption without the cache rebuild. Candidate filters read live
    /// segment state, so several hits can resolve against one cache.
    fn resolve_hit(&mut self, damage: i32, rng: &mut SimRng) -> HitAbsorption {
        let mut result = HitAbsorption {
            damage: damage.max(0),
            ..Default::default()
        };
        let mut remaining = result.damage;
        if remaining == 0 {
            return result;
        }

        // Phase 0: shields
        let shields: Vec<usize> = self
            .cache()
            .active_of_kind(SegmentKind::Defense)
            .iter()
            .copied()
            .filter(|&i| self.segments[i].is_active() && self.segments[i].shield_left() > 0.0)
            .collect();
        let mut shield_pick = None;
        if let Some(pick) = rng.pick_index(shields.len()) {
            let i = shields[pick];
            let segment = &mut self.segments[i];
            let left = segment.shield_left();
            let absorbed = remaining.min(left.ceil() as i32);
            segment.set_shield_left(left - absorbed as f32);
            remaining -= absorbed;
            result.shield = absorbed;
            shield_pick = Some(i);
        }

        // Phase 1: armor and plating
        if remaining > 0 {
            let candidates: Vec<usize> = self
                .cache()
                .of_kind(SegmentKind::Defense)
                .iter()
                .copied()
                .filter(|&i| Some(i) != shield_pick && !self.segments[i].is_destroyed())
                .collect();
            if let Some(pick) = rng.pick_index(candidates.len()) {
                let i = candidates[pick];
                let segment = &mut self.segments[i];
                let working = matches!(
                    segment.working(),
                    Working::Pristine | Working::Running | Working::Damaged
                );
                let soaked = match &segment.def().variant {
                    DefVariant::Armor(_) if working => {
                        rng.stochastic_round(settle(segment.reduction()))
                    }
                    DefVariant::Plating(_) if working => {
                        rng.stochastic_round(remaining as f32 * segment.mitigation())
                    }
                    _ => 0,
                };
                let soaked = soaked.clamp(0, remaining);
                let taken = segment.absorb(remaining - soaked);
                remaining -= soaked + taken;
                result.armor = soaked + taken;
                if taken > 0 && segment.is_destroyed() {
                    result.destroyed_segments.push(i);
                }
            }
        }

        // Phase 2: everything else
        if remaining > 0 {
            let candidates: Vec<usize> = self
                .cache()
                .undestroyed()
                .iter()
                .copied()
                .filter(|&i| {
                    let segment = &self.segments[i];
                    segment.kind() != SegmentKind::Defense && !segment.is_destroyed()
                })
                .collect();
            if let Some(pick) = rng.pick_index(candidates.len()) {
                let i = candidates[pick];
                let segment = &mut self.segments[i];
                let taken = segment.absorb(remaining);
                remaining -= taken;
                result.hull = taken;
                if taken > 0 && segment.is_destroyed() {
                    result.destroyed_segments.push(i);
                }
            }
        }

        // Residual: crew
        if remaining > 0 {
            if self.crew > 0 {
                let cfg = config();
                let lost = rng
                    .stochastic_round(remaining as f32 / cfg.crew_damage_divisor)
                    .max(0) as u32;
                let lost = lost.min(self.crew);
                self.crew -= lost;
                self.morale -= lost as f32 * cfg.crew_loss_morale;
                result.crew = remaining;
                result.crew_lost = lost;
            } else {
                result.overkill = remaining;
            }
        }

        for &i in &result.destroyed_segments {
            tracing::info!(
                crawler = %self.name,
                segment = %self.segments[i].name(),
                "segment destroyed"
            );
        }
        result
    }

    /// Resolve incoming hits from `attacker`
    pub fn receive_fire(&mut self, attacker: &mut Crawler, hits: &[HitRecord]) -> DamageReport {
        let mut report = DamageReport::default();
        if self.segments.is_empty() || hits.is_empty() {
            return report;
        }

        let cfg = config();
        let was_alive = !self.is_destroyed();
        let crew_before = self.crew;

        for hit in hits {
            let mut rng = SimRng::new(hit.seed);
            let (hit_type, damage) = hit.roll(cfg, &mut rng);
            let absorption = self.resolve_hit(damage, &mut rng);
            tracing::trace!(
                crawler = %self.name,
                ?hit_type,
                damage = absorption.damage,
                shield = absorption.shield,
                armor = absorption.armor,
                hull = absorption.hull,
                crew = absorption.crew,
                overkill = absorption.overkill,
                "hit resolved"
            );
            report.total_damage += (absorption.damage - absorption.overkill) as i64;
            report
                .segments_destroyed
                .extend_from_slice(&absorption.destroyed_segments);
            report.outcomes.push(HitOutcome {
                hit_type,
                absorption,
            });
        }
        report.crew_lost = crew_before - self.crew;

        let relation = self.relation_mut(attacker.id());
        relation.hostile = true;
        if report.total_damage > 0 {
            report.first_blood = relation.damage_taken == 0;
            relation.damage_taken += report.total_damage;
        }
        if report.first_blood {
            self.morale -= cfg.first_damage_morale;
        }
        attacker.relation_mut(self.id).damage_dealt += report.total_damage;

        self.generation += 1;
        self.update_segment_cache();

        if was_alive && self.is_destroyed() {
            let was_hostile = attacker.relation(self.id).map_or(false, |r| r.hostile);
            let reward = kill_reward(cfg, was_hostile, attacker.evil_points);
            attacker.morale += reward;
            report.destroyed = true;
            report.kill_reward = reward;
            tracing::info!(
                crawler = %self.name,
                attacker = %attacker.name,
                reward,
                "crawler destroyed"
            );
        }

        tracing::debug!(
            crawler = %self.name,
            hits = hits.len(),
            total_damage = report.total_damage,
            crew_lost = report.crew_lost,
            "fire received"
        );
        report
    }
}
