use thiserror::Error;

use crate::types::EntityId;

/// Errors raised by object pool operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("No pool slot for {0}")]
    UnknownEntity(EntityId),

    #[error("Cannot collect {0}: it is not active")]
    AlreadyCollected(EntityId),
}

/// Errors detected while validating an environment configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Relocation probability must lie in [0, 1], got {0}")]
    InvalidProbability(f64),

    #[error("Pool capacity must be at least 1")]
    ZeroCapacity,

    #[error("Relocation slot {slot} is outside a pool of {capacity} entities")]
    RelocateSlotOutOfRange { slot: usize, capacity: usize },

    #[error("Region is inverted or non-finite on the {axis} axis")]
    InvertedRegion { axis: &'static str },

    #[error("Region span overflows on the {axis} axis")]
    UnboundedRegion { axis: &'static str },

    #[error("{0} must be finite")]
    NonFinite(&'static str),
}

/// Errors surfaced by the agent environment.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EnvError {
    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Action must have {expected} values, got {actual}")]
    ActionArity { expected: usize, actual: usize },

    #[error("No episode has begun yet")]
    EpisodeNotStarted,
}
