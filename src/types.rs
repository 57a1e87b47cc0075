//! Core types for the collection environment.
//!
//! Defines pool slot identifiers, axis-aligned placement regions and the
//! two-axis action understood by the agent.

use std::fmt;

use glam::DVec3;
use rand::Rng;

use crate::error::{ConfigError, EnvError};

/// Stable identifier of a pool slot.
///
/// Entities are never created or destroyed after the pool is built, so the
/// slot index doubles as the entity's identity. Holding an `EntityId` does
/// not keep anything alive: the pool may deactivate the slot at any time and
/// every lookup goes back through the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub usize);

impl EntityId {
    /// Returns the slot index.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// An axis-aligned box `{min, max}` used for random placement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub min: DVec3,
    pub max: DVec3,
}

impl Region {
    /// Creates a region, rejecting corners that are inverted on any axis.
    pub fn new(min: DVec3, max: DVec3) -> Result<Self, ConfigError> {
        let region = Self { min, max };
        region.validate()?;
        Ok(region)
    }

    /// Region spanning `[0, size]` on every axis.
    pub fn cube(size: f64) -> Self {
        Self {
            min: DVec3::ZERO,
            max: DVec3::splat(size),
        }
    }

    /// Checks that `min <= max` on every axis, that both corners are finite
    /// and that `max - min` does not overflow.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, (lo, hi)) in ["x", "y", "z"]
            .into_iter()
            .zip(self.min.to_array().into_iter().zip(self.max.to_array()))
        {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(ConfigError::InvertedRegion { axis });
            }
            if !(hi - lo).is_finite() {
                return Err(ConfigError::UnboundedRegion { axis });
            }
        }
        Ok(())
    }

    /// Samples each coordinate independently and uniformly from `[min, max]`.
    ///
    /// # Panics
    ///
    /// If the region does not pass [`validate`](Self::validate).
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DVec3 {
        DVec3::new(
            rng.gen_range(self.min.x..=self.max.x),
            rng.gen_range(self.min.y..=self.max.y),
            rng.gen_range(self.min.z..=self.max.z),
        )
    }

    /// Returns true if `point` lies inside the region (bounds inclusive).
    pub fn contains(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Returns `point` clamped into the region.
    pub fn clamp(&self, point: DVec3) -> DVec3 {
        point.clamp(self.min, self.max)
    }

    /// Center of the region.
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[({:.2}, {:.2}, {:.2}), ({:.2}, {:.2}, {:.2})]",
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z
        )
    }
}

/// A two-axis action: drive along the forward axis and turn about the up axis.
///
/// Both axes are conceptually in `[-1, 1]`. Values outside that range are
/// passed through to actuation unchanged; bounding them is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Action {
    /// `+1` drives forward, `-1` backward.
    pub forward: f64,
    /// `+1` turns one way about the up axis, `-1` the other.
    pub turn: f64,
}

impl Action {
    /// Number of scalars in an action.
    pub const DIM: usize = 2;

    /// Creates a new action.
    pub fn new(forward: f64, turn: f64) -> Self {
        Self { forward, turn }
    }

    /// The do-nothing action.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Builds an action from a raw policy output.
    ///
    /// Fails with [`EnvError::ActionArity`] unless `values` holds exactly
    /// [`Action::DIM`] scalars; the input is never truncated or padded.
    pub fn from_slice(values: &[f64]) -> Result<Self, EnvError> {
        match values {
            [forward, turn] => Ok(Self::new(*forward, *turn)),
            _ => Err(EnvError::ActionArity {
                expected: Self::DIM,
                actual: values.len(),
            }),
        }
    }

    /// Returns the action as `[forward, turn]`.
    pub fn as_array(&self) -> [f64; 2] {
        [self.forward, self.turn]
    }
}

impl TryFrom<&[f64]> for Action {
    type Error = EnvError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        Self::from_slice(values)
    }
}
