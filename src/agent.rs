//! Agent kinematics and per-episode target bookkeeping.

use glam::{DQuat, DVec3};

use crate::types::EntityId;

/// Rigid-body pose and motion of the agent.
///
/// The body's local forward axis is `+Z` and its local up axis is `+Y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub position: DVec3,
    pub orientation: DQuat,
    pub velocity: DVec3,
    pub angular_velocity: DVec3,
}

impl Kinematics {
    /// A body at rest at `position` with identity orientation.
    pub fn at_rest(position: DVec3) -> Self {
        Self {
            position,
            orientation: DQuat::IDENTITY,
            velocity: DVec3::ZERO,
            angular_velocity: DVec3::ZERO,
        }
    }

    /// World-space forward axis.
    pub fn forward(&self) -> DVec3 {
        self.orientation * DVec3::Z
    }

    /// World-space up axis.
    pub fn up(&self) -> DVec3 {
        self.orientation * DVec3::Y
    }

    /// Zeroes linear and angular velocity.
    pub fn halt(&mut self) {
        self.velocity = DVec3::ZERO;
        self.angular_velocity = DVec3::ZERO;
    }

    /// Returns true if the body has no residual motion.
    pub fn is_at_rest(&self) -> bool {
        self.velocity == DVec3::ZERO && self.angular_velocity == DVec3::ZERO
    }
}

impl Default for Kinematics {
    fn default() -> Self {
        Self::at_rest(DVec3::ZERO)
    }
}

/// State of the agent within the current episode.
///
/// The target is a weak reference: a pool slot id that must be re-validated
/// against the pool before use, since the pool may deactivate it at any time.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    pub body: Kinematics,
    /// Current nearest target, if any.
    pub target: Option<EntityId>,
    /// Next observation must set a new distance baseline without reward.
    pub fresh: bool,
    /// Distance to the target at the previous observation. Only meaningful
    /// once `fresh` is false.
    pub previous_distance: f64,
}

impl AgentState {
    /// Creates a fresh agent at `position`.
    pub fn new(position: DVec3) -> Self {
        Self {
            body: Kinematics::at_rest(position),
            target: None,
            fresh: true,
            previous_distance: 0.0,
        }
    }

    /// Clears everything that must not leak from one episode into the next.
    ///
    /// Pose is left alone; play mode keeps the agent where it is.
    pub fn reset_episode(&mut self) {
        self.body.halt();
        self.target = None;
        self.fresh = true;
        self.previous_distance = 0.0;
    }

    /// Places the agent at `position`, keeping its orientation.
    pub fn teleport(&mut self, position: DVec3) {
        self.body.position = position;
    }

    /// Stores `current` as the new distance baseline and returns the old one.
    ///
    /// Returns `None` when the baseline was fresh, clearing the flag.
    pub fn swap_baseline(&mut self, current: f64) -> Option<f64> {
        let previous = if self.fresh {
            self.fresh = false;
            None
        } else {
            Some(self.previous_distance)
        };
        self.previous_distance = current;
        previous
    }
}

impl Default for AgentState {
    fn default() -> Self {
        Self::new(DVec3::ZERO)
    }
}
