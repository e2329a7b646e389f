use thiserror::Error;

use crate::datatype::{Shape, Timestamp};
use crate::relation::Relation;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporaError {
    #[error("Unsupported relation: {relation} is undefined for {self_shape} self against {other_shape} other")]
    UnsupportedRelation { relation: Relation, self_shape: Shape, other_shape: Shape },
    #[error("Malformed period: start {start} is after end {end}")]
    MalformedPeriod { start: Timestamp, end: Timestamp },
    #[error("Unknown value reference: {0}")]
    UnknownValueReference(String),
    #[error("Parse error: {message}")]
    Parse { message: String },
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TemporaError>;

// Helper conversions
impl From<config::ConfigError> for TemporaError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
