pub mod config;
pub mod error;
pub mod rng;
pub mod types;

pub use config::{config, set_config, EngineConfig};
pub use error::{CrawlerError, Result};
pub use rng::SimRng;
pub use types::{ActorId, Commodity, Terrain};
