//! How one crawler regards another

use serde::{Deserialize, Serialize};

use crate::core::config::EngineConfig;

/// One crawler's record of a counterpart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorRelation {
    /// Set once the counterpart has fired on us
    pub hostile: bool,
    pub damage_taken: i64,
    pub damage_dealt: i64,
}

/// Morale an attacker gains for destroying a crawler.
///
/// Killing a known hostile is always worth the full bonus. Otherwise the
/// reward slides from the friendly-kill value toward the hostile one as the
/// attacker's evil points approach the cutoff.
pub fn kill_reward(cfg: &EngineConfig, was_hostile: bool, evil_points: f32) -> f32 {
    if was_hostile {
        return cfg.hostile_kill_morale;
    }
    let t = (evil_points / cfg.evil_points_cutoff).clamp(0.0, 1.0);
    cfg.friendly_kill_morale + (cfg.hostile_kill_morale - cfg.friendly_kill_morale) * t
}
