//! Observation encoding for the agent.
//!
//! Every observation has the same width whether or not a target exists:
//! ```text
//! [qx, qy, qz, qw] ++ [dir_x, dir_y, dir_z] ++ [forward · dir] ++ [distance]
//! ```

use glam::DVec3;

use crate::agent::Kinematics;

/// Number of values in an observation.
pub const OBSERVATION_DIM: usize = 9;

/// Geometry of the agent relative to its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetReading {
    /// Unit vector from agent to target; zero if they coincide.
    pub direction: DVec3,
    /// Cosine between the agent's forward axis and `direction`.
    pub dot: f64,
    /// Euclidean distance from agent to target.
    pub distance: f64,
}

impl TargetReading {
    /// Measures `target` from `body`.
    pub fn measure(body: &Kinematics, target: DVec3) -> Self {
        let to_target = target - body.position;
        let direction = to_target.normalize_or_zero();
        Self {
            direction,
            dot: body.forward().dot(direction),
            distance: to_target.length(),
        }
    }
}

/// A fixed-width observation vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    values: [f64; OBSERVATION_DIM],
}

impl Observation {
    /// The all-zero observation emitted when there is no target.
    pub fn empty() -> Self {
        Self {
            values: [0.0; OBSERVATION_DIM],
        }
    }

    /// Encodes the agent's orientation and its reading of the target.
    pub fn encode(body: &Kinematics, reading: &TargetReading) -> Self {
        let q = body.orientation.normalize();
        let d = reading.direction;
        Self {
            values: [
                q.x,
                q.y,
                q.z,
                q.w,
                d.x,
                d.y,
                d.z,
                reading.dot,
                reading.distance,
            ],
        }
    }

    /// Returns true for the no-target observation.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    /// Orientation quaternion as `[x, y, z, w]`.
    pub fn orientation(&self) -> [f64; 4] {
        [self.values[0], self.values[1], self.values[2], self.values[3]]
    }

    /// Unit direction to the target.
    pub fn direction(&self) -> DVec3 {
        DVec3::new(self.values[4], self.values[5], self.values[6])
    }

    /// Facing cosine.
    pub fn dot(&self) -> f64 {
        self.values[7]
    }

    /// Distance to the target.
    pub fn distance(&self) -> f64 {
        self.values[8]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.to_vec()
    }
}

impl Default for Observation {
    fn default() -> Self {
        Self::empty()
    }
}

impl AsRef<[f64]> for Observation {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}
