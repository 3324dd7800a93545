//! Combat: fire generation and damage resolution between crawlers

pub mod damage;
pub mod fire;
pub mod relations;

pub use damage::{DamageReport, HitAbsorption, HitOutcome};
pub use fire::{HitRecord, HitType};
pub use relations::{kill_reward, ActorRelation};
