use thiserror::Error;

use crate::segments::Stat;

#[derive(Error, Debug)]
pub enum CrawlerError {
    #[error("Segment def not found: {0}")]
    UnknownDef(String),

    #[error("Malformed segment def name: {0}")]
    MalformedDefName(String),

    #[error("Segment data is for {found}, not {expected}")]
    DefMismatch { expected: String, found: String },

    #[error("Invalid segment size {size} for {def}")]
    InvalidSize { def: String, size: f32 },

    #[error("Stat {stat:?} does not apply to {def}")]
    StatNotApplicable { def: String, stat: Stat },

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CrawlerError>;
