//! Segment data model
//!
//! Tiers and stat curves, immutable segment defs with their catalog, and the
//! mutable runtime segments installed on a crawler.

pub mod catalog;
pub mod def;
pub mod scaling;
pub mod segment;
pub mod tier;

pub use catalog::DefCatalog;
pub use def::{
    DefVariant, SegmentDef, SegmentKind, TractionDef, WeaponClass, WeaponDef, MIN_SIZE,
};
pub use scaling::{scaling, PowerScaling, Stat};
pub use segment::{working_state, Segment, SegmentData, SegmentState, Working};
pub use tier::Tier;
