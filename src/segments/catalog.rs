//! Def catalog: loading, interning and name resolution.
//!
//! Catalog entries are authored in TOML. Every def handed out is interned
//! behind an `Arc`, and derived defs (resized or upgraded) are registered
//! under their canonical name so that a persisted `def_name` always
//! resolves back to an identical def.

use ahash::AHashMap;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use super::def::*;
use super::scaling::Stat;
use super::tier::Tier;
use crate::core::error::{CrawlerError, Result};
use crate::core::types::{Commodity, Terrain};

const BUILTIN_CATALOG: &str = include_str!("../../data/segments.toml");

/// Top level of a catalog file
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    segment: Vec<DefEntry>,
}

/// One authored def
#[derive(Debug, Deserialize)]
struct DefEntry {
    name: String,
    symbol: char,
    #[serde(default = "default_size")]
    size: f32,
    /// Quality offsets by stat
    #[serde(default)]
    quality: BTreeMap<Stat, f32>,
    spec: VariantSpec,
}

fn default_size() -> f32 {
    1.0
}

/// Kind-specific part of an authored def
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum VariantSpec {
    Weapon {
        class: WeaponClass,
        #[serde(default)]
        ammo: Option<Commodity>,
    },
    Targeting,
    Reactor,
    Charger,
    Traction {
        terrain_limit: Terrain,
    },
    Armor,
    Plating,
    Shield,
    Industry,
    Storage,
    Harvest,
    Habitat,
}

impl VariantSpec {
    fn build(self, size: f32) -> DefVariant {
        let t = Tier::new(size, 0.0);
        match self {
            VariantSpec::Weapon { class, ammo } => DefVariant::Weapon(WeaponDef {
                class,
                damage: t,
                rate: t,
                shots: t,
                aim: t,
                ammo_use: t,
                ammo,
            }),
            VariantSpec::Targeting => DefVariant::Targeting(TargetingDef { aim_bonus: t }),
            VariantSpec::Reactor => DefVariant::Reactor(ReactorDef {
                capacity: t,
                generation: t,
            }),
            VariantSpec::Charger => DefVariant::Charger(ChargerDef { generation: t }),
            VariantSpec::Traction { terrain_limit } => DefVariant::Traction(TractionDef {
                lift: t,
                speed: t,
                terrain_limit,
            }),
            VariantSpec::Armor => DefVariant::Armor(ArmorDef { reduction: t }),
            VariantSpec::Plating => DefVariant::Plating(PlatingDef { mitigation: t }),
            VariantSpec::Shield => DefVariant::Shield(ShieldDef {
                capacity: t,
                recharge: t,
            }),
            VariantSpec::Industry => DefVariant::Industry(IndustryDef { throughput: t }),
            VariantSpec::Storage => DefVariant::Storage(StorageDef { capacity: t }),
            VariantSpec::Harvest => DefVariant::Harvest(HarvestDef { yield_tier: t }),
            VariantSpec::Habitat => DefVariant::Habitat(HabitatDef { crew_capacity: t }),
        }
    }
}

impl DefEntry {
    fn into_def(self) -> Result<SegmentDef> {
        if !self.size.is_finite() || self.size < MIN_SIZE {
            return Err(CrawlerError::InvalidSize {
                def: self.name,
                size: self.size,
            });
        }
        let variant = self.spec.build(self.size);
        let mut def = SegmentDef::new(self.name, self.symbol, self.size, variant);
        for (stat, quality) in self.quality {
            def = def.with_quality(stat, quality)?;
        }
        Ok(def)
    }
}

/// Registry of every def known to the game
#[derive(Debug, Default)]
pub struct DefCatalog {
    /// Interned defs by name (canonical names and resolved aliases)
    defs: AHashMap<String, Arc<SegmentDef>>,
    /// Authored defs in load order
    bases: Vec<Arc<SegmentDef>>,
}

impl DefCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the defs shipped with the crate
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::new();
        catalog.load_str(BUILTIN_CATALOG)?;
        Ok(catalog)
    }

    /// Register an authored def; an existing def of the same name wins
    pub fn register(&mut self, def: SegmentDef) -> Arc<SegmentDef> {
        if let Some(existing) = self.defs.get(&def.name) {
            return existing.clone();
        }
        let def = Arc::new(def);
        self.defs.insert(def.name.clone(), def.clone());
        if def.name == def.base_name {
            self.bases.push(def.clone());
        }
        def
    }

    /// Parse catalog TOML and register every entry
    pub fn load_str(&mut self, content: &str) -> Result<Vec<Arc<SegmentDef>>> {
        let file: CatalogFile = toml::from_str(content)?;
        let mut loaded = Vec::with_capacity(file.segment.len());
        for entry in file.segment {
            loaded.push(self.register(entry.into_def()?));
        }
        tracing::debug!(count = loaded.len(), "Loaded segment defs");
        Ok(loaded)
    }

    /// Load a catalog TOML file
    pub fn load_file(&mut self, path: &Path) -> Result<Vec<Arc<SegmentDef>>> {
        let content = std::fs::read_to_string(path)?;
        self.load_str(&content)
    }

    /// Look up an already interned def
    pub fn get(&self, name: &str) -> Option<Arc<SegmentDef>> {
        self.defs.get(name).cloned()
    }

    /// Look up a def by name, deriving and interning it if the name
    /// describes a resize or upgrade of a known def
    pub fn resolve(&mut self, name: &str) -> Result<Arc<SegmentDef>> {
        if let Some(def) = self.defs.get(name) {
            return Ok(def.clone());
        }

        let (base, rest) = self
            .split_base(name)
            .ok_or_else(|| CrawlerError::UnknownDef(name.to_string()))?;
        let (size, upgrades) = parse_suffix(rest)
            .ok_or_else(|| CrawlerError::MalformedDefName(name.to_string()))?;

        let mut def = (*base).clone();
        if let Some(size) = size {
            def = def.resize(size)?;
        }
        for (stat, steps) in upgrades {
            def = def.upgrade(stat, steps)?;
        }

        let def = self.intern(def);
        // Non-canonical spellings resolve to the same Arc from now on
        self.defs.insert(name.to_string(), def.clone());
        Ok(def)
    }

    /// Resized variant of a def, interned
    pub fn resize(&mut self, def: &SegmentDef, new_size: f32) -> Result<Arc<SegmentDef>> {
        let resized = def.resize(new_size)?;
        Ok(self.intern(resized))
    }

    /// Upgraded variant of a def, interned
    pub fn upgrade(&mut self, def: &SegmentDef, stat: Stat, steps: i32) -> Result<Arc<SegmentDef>> {
        let upgraded = def.upgrade(stat, steps)?;
        Ok(self.intern(upgraded))
    }

    /// Authored defs of one kind, in load order
    pub fn by_kind(&self, kind: SegmentKind) -> Vec<Arc<SegmentDef>> {
        self.bases
            .iter()
            .filter(|d| d.kind() == kind)
            .cloned()
            .collect()
    }

    pub fn bases(&self) -> &[Arc<SegmentDef>] {
        &self.bases
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    fn intern(&mut self, def: SegmentDef) -> Arc<SegmentDef> {
        self.defs
            .entry(def.name.clone())
            .or_insert_with(|| Arc::new(def))
            .clone()
    }

    /// Longest authored name that prefixes `name` followed by a suffix marker
    fn split_base<'a>(&self, name: &'a str) -> Option<(Arc<SegmentDef>, &'a str)> {
        self.bases
            .iter()
            .filter(|b| {
                name.strip_prefix(b.name.as_str())
                    .and_then(|rest| rest.chars().next())
                    .map_or(false, |c| matches!(c, '@' | '+' | '-'))
            })
            .max_by_key(|b| b.name.len())
            .map(|b| (b.clone(), &name[b.name.len()..]))
    }
}

/// Parse `@size` followed by `+stat` / `-stat` tokens
fn parse_suffix(rest: &str) -> Option<(Option<f32>, Vec<(Stat, i32)>)> {
    let mut rest = rest;
    let mut size = None;

    if let Some(after) = rest.strip_prefix('@') {
        let end = after.find(['+', '-']).unwrap_or(after.len());
        size = Some(after[..end].parse::<f32>().ok()?);
        rest = &after[end..];
    }

    let mut upgrades = Vec::new();
    while let Some(sign) = rest.chars().next() {
        let steps = match sign {
            '+' => 1,
            '-' => -1,
            _ => return None,
        };
        let body = &rest[1..];
        let end = body.find(['+', '-']).unwrap_or(body.len());
        let stat = Stat::from_name(&body[..end])?;
        upgrades.push((stat, steps));
        rest = &body[end..];
    }

    Some((size, upgrades))
}
