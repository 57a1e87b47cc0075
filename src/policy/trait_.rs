//! Policy trait for the collection environment.

use crate::observation::Observation;
use crate::types::Action;

/// A source of actions for the agent.
///
/// Policies see only the observation vector and answer with a two-axis
/// [`Action`]. Keeping actions in `[-1, 1]` is the policy's responsibility.
pub trait Policy: Send + Sync {
    /// Selects an action for the given observation.
    fn select_action(&mut self, observation: &Observation) -> Action;

    /// Returns a human-readable name for this policy.
    fn name(&self) -> &str;
}
