//! Reward shaping and accumulation.
//!
//! Combines a facing term, a distance-progress term, a flat collection bonus
//! and a boundary penalty.

use crate::config::RewardConfig;

/// Computes reward increments from the configured constants.
pub struct RewardComputer;

impl RewardComputer {
    /// Per-observation shaping reward.
    ///
    /// ```text
    /// r = w_orient × (forward · direction) + w_progress × (d_prev − d_now)
    /// ```
    ///
    /// The progress term is positive when the agent got closer and negative
    /// when it moved away, so a round trip nets to zero.
    pub fn shaping(config: &RewardConfig, dot: f64, previous: f64, current: f64) -> f64 {
        config.orientation_weight * dot + config.progress_weight * (previous - current)
    }

    /// Reward for collecting an entity.
    pub fn collection(config: &RewardConfig) -> f64 {
        config.collection_bonus
    }

    /// Reward for touching the arena boundary.
    pub fn boundary(config: &RewardConfig) -> f64 {
        config.boundary_penalty
    }
}

/// Running reward totals for one episode.
///
/// `pending` collects everything added since the trainer last drained it;
/// `cumulative` keeps the episode total.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RewardLedger {
    pending: f64,
    cumulative: f64,
}

impl RewardLedger {
    /// Adds an increment to both totals.
    pub fn add(&mut self, reward: f64) {
        self.pending += reward;
        self.cumulative += reward;
    }

    /// Reward accumulated since the last [`take`](Self::take).
    pub fn pending(&self) -> f64 {
        self.pending
    }

    /// Episode total.
    pub fn cumulative(&self) -> f64 {
        self.cumulative
    }

    /// Returns and clears the pending reward.
    pub fn take(&mut self) -> f64 {
        std::mem::take(&mut self.pending)
    }

    /// Clears both totals.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
