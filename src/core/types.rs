//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for actors (crawlers and anything else that owns segments)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Deterministic id, for replays and tests
    pub fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ground roughness, ordered from easiest to hardest to cross
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    Flat,
    Rough,
    Broken,
    Shattered,
    Ruined,
}

impl Terrain {
    pub const ALL: [Terrain; 5] = [
        Terrain::Flat,
        Terrain::Rough,
        Terrain::Broken,
        Terrain::Shattered,
        Terrain::Ruined,
    ];

    /// Every terrain from the smoothest up to `self`, inclusive
    pub fn up_to(self) -> impl Iterator<Item = Terrain> {
        Self::ALL.into_iter().filter(move |t| *t <= self)
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Terrain::Flat => "flat",
            Terrain::Rough => "rough",
            Terrain::Broken => "broken",
            Terrain::Shattered => "shattered",
            Terrain::Ruined => "ruined",
        };
        f.write_str(name)
    }
}

/// Tradeable goods carried aboard a crawler
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commodity {
    Fuel,
    Scrap,
    Rations,
    /// Gun ammunition
    Slugs,
    /// Laser cells
    Cells,
    Rockets,
}

impl Commodity {
    /// Mass of one unit, in tons
    pub fn unit_weight(&self) -> f32 {
        match self {
            Commodity::Fuel => 0.001,
            Commodity::Scrap => 0.01,
            Commodity::Rations => 0.001,
            Commodity::Slugs => 0.002,
            Commodity::Cells => 0.0005,
            Commodity::Rockets => 0.05,
        }
    }
}
