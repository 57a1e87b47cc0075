//! robocollect - an episodic collection-task environment for a mobile agent.
//!
//! A fixed pool of collectible entities is scattered inside a bounded volume.
//! The agent senses the nearest active entity, drives with force and torque,
//! and earns shaped reward for facing and approaching it. Integration and
//! collision detection sit behind [`PhysicsAdapter`].

pub mod agent;
pub mod config;
pub mod environment;
pub mod error;
pub mod locator;
pub mod metrics;
pub mod observation;
pub mod physics;
pub mod policy;
pub mod pool;
pub mod reward;
pub mod types;

pub use agent::{AgentState, Kinematics};
pub use config::{EnvConfig, RewardConfig};
pub use environment::{AgentEnvironment, Phase, StepResult};
pub use error::{ConfigError, EnvError, PoolError};
pub use locator::{NearestTargetLocator, TargetFix};
pub use metrics::{EpisodeStats, EvaluationMetrics};
pub use observation::{Observation, TargetReading, OBSERVATION_DIM};
pub use physics::{Actuation, Contact, ContactKind, PhysicsAdapter, PointMassPhysics};
pub use policy::{Policy, RandomPolicy, SeekTargetPolicy};
pub use pool::{CollectibleEntity, CollectiblePool, ObjectPool};
pub use reward::{RewardComputer, RewardLedger};
pub use types::{Action, EntityId, Region};

/// Identifier type used for episodes.
pub type Id = String;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
