//! Traction performance: speed, drain and lift per terrain.
//!
//! A traction segment runs at full output on terrain below its limit, at a
//! penalty exactly at its limit, and not at all beyond it.

use serde::Serialize;

use super::Crawler;
use crate::core::config::config;
use crate::core::types::Terrain;
use crate::segments::{Segment, SegmentKind};

/// Best achievable movement toward a terrain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveEvaluation {
    pub speed: f32,
    pub drain: f32,
    /// Why the speed is lower than the traction could deliver
    pub note: Option<String>,
}

impl MoveEvaluation {
    pub fn is_mobile(&self) -> bool {
        self.speed > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripEstimate {
    pub hours: f32,
    pub fuel: f32,
}

/// Output multiplier for a segment with `limit` running on `terrain`
fn penalty(terrain: Terrain, limit: Terrain, at_limit: f32) -> f32 {
    if terrain < limit {
        1.0
    } else if terrain == limit {
        at_limit
    } else {
        0.0
    }
}

fn limit_of(segment: &Segment) -> Terrain {
    segment.terrain_limit().unwrap_or(Terrain::Flat)
}

impl Crawler {
    /// Lift available on a terrain; full up to each segment's limit
    pub fn lift_on(&self, terrain: Terrain) -> f32 {
        self.active_segments(SegmentKind::Traction)
            .filter(|s| terrain <= limit_of(s))
            .map(Segment::lift)
            .sum()
    }

    pub fn speed_on(&self, terrain: Terrain) -> f32 {
        let factor = config().limit_speed_factor;
        self.active_segments(SegmentKind::Traction)
            .map(|s| s.speed() * penalty(terrain, limit_of(s), factor))
            .sum()
    }

    pub fn drain_on(&self, terrain: Terrain) -> f32 {
        let factor = config().limit_drain_factor;
        self.active_segments(SegmentKind::Traction)
            .map(|s| s.drain() * penalty(terrain, limit_of(s), factor))
            .sum()
    }

    /// Best speed over every terrain tier from flat up to `target`.
    ///
    /// Speed is throttled when generation cannot cover drain, and divided by
    /// `(mass / lift) ^ overload_exponent` when overloaded (drain is
    /// multiplied by the same factor).
    pub fn evaluate_move(&self, target: Terrain) -> MoveEvaluation {
        if self.active_segments(SegmentKind::Traction).next().is_none() {
            return MoveEvaluation {
                speed: 0.0,
                drain: 0.0,
                note: Some("No traction".to_string()),
            };
        }

        let cfg = config();
        let generation = self.total_generation();
        let mass = self.mass();

        let mut best: Option<(f32, f32, bool, bool)> = None;
        for terrain in target.up_to() {
            let mut speed = self.speed_on(terrain);
            let mut drain = self.drain_on(terrain);

            let gen_limit = if drain > 0.0 {
                (generation / drain).min(1.0)
            } else {
                1.0
            };
            speed *= gen_limit;
            let low_gen = gen_limit < 1.0;

            let lift = self.lift_on(terrain);
            let mut too_heavy = false;
            if lift <= 0.0 {
                speed = 0.0;
                too_heavy = true;
            } else {
                let fraction = mass / lift;
                if fraction > 1.0 {
                    let overload = fraction.powf(cfg.overload_exponent);
                    speed /= overload;
                    drain *= overload;
                    too_heavy = true;
                }
            }

            if best.map_or(true, |(best_speed, ..)| speed > best_speed) {
                best = Some((speed, drain, low_gen, too_heavy));
            }
        }

        let Some((speed, drain, low_gen, too_heavy)) = best else {
            return MoveEvaluation {
                speed: 0.0,
                drain: 0.0,
                note: None,
            };
        };

        let mut notes = Vec::new();
        if low_gen {
            notes.push("low gen");
        }
        if too_heavy {
            notes.push("too heavy");
        }
        MoveEvaluation {
            speed,
            drain,
            note: (!notes.is_empty()).then(|| notes.join(", ")),
        }
    }

    /// Running drain of every active segment
    pub fn total_drain(&self) -> f32 {
        self.cache()
            .active()
            .iter()
            .map(|&i| self.segments[i].drain())
            .sum()
    }

    /// Fuel burned per hour while stationary
    pub fn standby_fuel_per_hour(&self) -> f32 {
        self.total_drain() * config().standby_fraction
    }

    /// Time and fuel to cover `km` toward `terrain`; None when immobile
    pub fn trip_estimate(&self, terrain: Terrain, km: f32) -> Option<TripEstimate> {
        let eval = self.evaluate_move(terrain);
        if !eval.is_mobile() || !(km >= 0.0) {
            return None;
        }
        let hours = km / eval.speed;
        let fuel = eval.drain * km * config().fuel_per_km + self.standby_fuel_per_hour() * hours;
        Some(TripEstimate { hours, fuel })
    }
}
