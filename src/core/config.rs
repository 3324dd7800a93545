//! Engine configuration with documented constants
//!
//! All tunable numbers of the power, movement and combat engine live here,
//! with a note on how they interact.

use serde::Deserialize;
use std::path::Path;

use super::error::{CrawlerError, Result};

/// Configuration for the crawler engine
///
/// Every field has a default, so a TOML file only needs the values it
/// overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === MOVEMENT ===
    /// Speed multiplier for a traction segment running exactly at its terrain limit
    ///
    /// Below the limit a segment runs at full speed; above it, not at all.
    pub limit_speed_factor: f32,

    /// Drain multiplier for a traction segment running exactly at its terrain limit
    pub limit_drain_factor: f32,

    /// Exponent applied to the mass/lift ratio when overloaded
    ///
    /// At 0.6, carrying 150% of rated lift costs about 28% of speed
    /// rather than a full third.
    pub overload_exponent: f32,

    /// Fuel burned per unit of movement drain per kilometer
    pub fuel_per_km: f32,

    /// Fraction of total drain burned every hour even while stationary
    pub standby_fraction: f32,

    // === FIRE ===
    /// Evasion a defender presents against a shot's aim
    ///
    /// Hit chance is `aim / (aim + evasion)`, so an aim equal to the
    /// evasion lands half the time.
    pub base_evasion: f32,

    /// Floor on hit chance, so even poor aim lands occasionally
    pub min_hit_chance: f32,

    /// Ceiling on hit chance
    pub max_hit_chance: f32,

    /// Chance a gun volley fires twice as many shots
    pub gun_double_shot_chance: f32,

    /// Chance a laser shot deals double damage
    pub laser_double_damage_chance: f32,

    /// Chance a missile shot gains extra aim
    pub missile_aim_bonus_chance: f32,

    /// Aim added by a missile guidance roll
    pub missile_aim_bonus: f32,

    // === DAMAGE ===
    /// Damage per crew member lost once every segment phase is exhausted
    pub crew_damage_divisor: f32,

    // === MORALE ===
    /// Morale lost the first time an attacker draws blood
    pub first_damage_morale: f32,

    /// Morale lost per crew member killed
    pub crew_loss_morale: f32,

    /// Morale gained for destroying an enemy that was already hostile
    pub hostile_kill_morale: f32,

    /// Morale gained (usually negative) for destroying a non-hostile crawler
    ///
    /// Evil attackers care less: the reward slides toward
    /// `hostile_kill_morale` as their evil points approach the cutoff.
    pub friendly_kill_morale: f32,

    /// Evil points at which a non-hostile kill feels like a hostile one
    pub evil_points_cutoff: f32,

    // === MASS ===
    /// Tons per crew member
    pub crew_weight: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Movement
            limit_speed_factor: 0.5,
            limit_drain_factor: 1.5,
            overload_exponent: 0.6,
            fuel_per_km: 0.01,
            standby_fraction: 0.1,

            // Fire
            base_evasion: 1.0,
            min_hit_chance: 0.05,
            max_hit_chance: 0.95,
            gun_double_shot_chance: 0.2,
            laser_double_damage_chance: 0.2,
            missile_aim_bonus_chance: 0.25,
            missile_aim_bonus: 1.0,

            // Damage
            crew_damage_divisor: 3.0,

            // Morale
            first_damage_morale: 1.0,
            crew_loss_morale: 0.2,
            hostile_kill_morale: 4.0,
            friendly_kill_morale: -2.0,
            evil_points_cutoff: 10.0,

            // Mass
            crew_weight: 0.1,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML, validating the result
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate().map_err(CrawlerError::InvalidConfig)?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        let probabilities = [
            ("gun_double_shot_chance", self.gun_double_shot_chance),
            ("laser_double_damage_chance", self.laser_double_damage_chance),
            ("missile_aim_bonus_chance", self.missile_aim_bonus_chance),
            ("min_hit_chance", self.min_hit_chance),
            ("max_hit_chance", self.max_hit_chance),
            ("limit_speed_factor", self.limit_speed_factor),
            ("standby_fraction", self.standby_fraction),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} ({}) must be within [0, 1]", name, value));
            }
        }

        if self.min_hit_chance > self.max_hit_chance {
            return Err(format!(
                "min_hit_chance ({}) should be <= max_hit_chance ({})",
                self.min_hit_chance, self.max_hit_chance
            ));
        }

        if self.overload_exponent <= 0.0 || self.overload_exponent > 1.0 {
            return Err(format!(
                "overload_exponent ({}) must be within (0, 1]",
                self.overload_exponent
            ));
        }

        if self.crew_damage_divisor <= 0.0 {
            return Err("crew_damage_divisor must be positive".into());
        }

        if self.base_evasion <= 0.0 || self.evil_points_cutoff <= 0.0 {
            return Err("base_evasion and evil_points_cutoff must be positive".into());
        }

        if self.limit_drain_factor < 0.0 || self.fuel_per_km < 0.0 || self.crew_weight < 0.0 {
            return Err("Drain, fuel and weight factors cannot be negative".into());
        }

        Ok(())
    }

    /// Hit chance for a shot with the given aim against the given evasion
    pub fn hit_chance(&self, aim: f32, evasion: f32) -> f32 {
        let total = aim + evasion;
        let raw = if total > 0.0 { aim / total } else { 0.0 };
        raw.clamp(self.min_hit_chance, self.max_hit_chance)
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Get the global engine config (initializes with defaults if not set)
pub fn config() -> &'static EngineConfig {
    CONFIG.get_or_init(EngineConfig::default)
}

/// Set the global engine config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: EngineConfig) -> std::result::Result<(), EngineConfig> {
    CONFIG.set(config)
}
