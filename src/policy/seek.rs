//! Greedy steer-toward-target heuristic.
//!
//! A scripted stand-in for a human driver: turn until the target is ahead,
//! then drive at it.

use glam::DQuat;

use super::trait_::Policy;
use crate::observation::Observation;
use crate::types::Action;

/// Steers toward the observed target.
///
/// The world-space direction in the observation is rotated into the agent's
/// frame (forward `+Z`, up `+Y`). The lateral component drives the turn axis;
/// the agent drives forward only once the facing cosine exceeds
/// `facing_threshold`. With no target the agent idles.
pub struct SeekTargetPolicy {
    /// Minimum `forward · direction` before driving forward.
    pub facing_threshold: f64,
    /// Turn command per unit of lateral offset.
    pub turn_gain: f64,
}

impl SeekTargetPolicy {
    pub fn new() -> Self {
        Self {
            facing_threshold: 0.8,
            turn_gain: 3.0,
        }
    }
}

impl Default for SeekTargetPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for SeekTargetPolicy {
    fn select_action(&mut self, observation: &Observation) -> Action {
        if observation.is_empty() {
            return Action::idle();
        }

        let [x, y, z, w] = observation.orientation();
        let local = DQuat::from_xyzw(x, y, z, w).inverse() * observation.direction();

        let turn = if local.z < 0.0 {
            // Behind: turn hard toward whichever side is closer.
            if local.x < 0.0 {
                -1.0
            } else {
                1.0
            }
        } else {
            (local.x * self.turn_gain).clamp(-1.0, 1.0)
        };
        let forward = if observation.dot() >= self.facing_threshold {
            1.0
        } else {
            0.0
        };

        Action::new(forward, turn)
    }

    fn name(&self) -> &str {
        "seek_target"
    }
}
