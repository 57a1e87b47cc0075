//! Boundary to the physics engine.
//!
//! The environment only produces an [`Actuation`] intent and consumes
//! [`Contact`] events; integration and collision detection belong to a
//! [`PhysicsAdapter`]. [`PointMassPhysics`] is a small headless adapter for
//! driving the environment without an external engine.

use std::fmt;
use std::str::FromStr;

use glam::{DQuat, DVec3};

use crate::agent::Kinematics;
use crate::pool::CollectiblePool;
use crate::types::{EntityId, Region};

/// Force and torque the agent asks the physics engine to apply this tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Actuation {
    pub force: DVec3,
    pub torque: DVec3,
}

/// Classification of a contact reported by the physics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactKind {
    Collectible,
    Boundary,
}

impl ContactKind {
    /// Resolves an engine tag; anything outside the taxonomy is `None`.
    pub fn classify(tag: &str) -> Option<Self> {
        tag.parse().ok()
    }
}

impl FromStr for ContactKind {
    type Err = ();

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "ObjectToBeCollected" | "collectible" => Ok(Self::Collectible),
            "Boundary" | "boundary" => Ok(Self::Boundary),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ContactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactKind::Collectible => write!(f, "collectible"),
            ContactKind::Boundary => write!(f, "boundary"),
        }
    }
}

/// A contact event the environment reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// The agent touched a collectible entity.
    Collectible(EntityId),
    /// The agent touched the arena boundary.
    Boundary,
}

impl Contact {
    /// Builds a contact from an engine tag and the touched entity, if any.
    ///
    /// Unknown tags are ignored. A collectible tag without an entity cannot
    /// be acted upon and is dropped as well.
    pub fn from_tag(tag: &str, entity: Option<EntityId>) -> Option<Self> {
        match (ContactKind::classify(tag)?, entity) {
            (ContactKind::Collectible, Some(id)) => Some(Contact::Collectible(id)),
            (ContactKind::Collectible, None) => {
                tracing::warn!(tag, "collectible contact without an entity");
                None
            }
            (ContactKind::Boundary, _) => Some(Contact::Boundary),
        }
    }

    pub fn kind(&self) -> ContactKind {
        match self {
            Contact::Collectible(_) => ContactKind::Collectible,
            Contact::Boundary => ContactKind::Boundary,
        }
    }
}

/// A physics engine as seen by the environment.
///
/// Called synchronously once per tick: apply `actuation` to `body`, advance
/// the simulation and return the contacts that began during this tick.
pub trait PhysicsAdapter {
    fn integrate(
        &mut self,
        body: &mut Kinematics,
        actuation: &Actuation,
        pool: &dyn CollectiblePool,
    ) -> Vec<Contact>;

    /// Forgets per-episode contact state, e.g. after the agent was teleported.
    fn reset(&mut self) {}
}

/// Headless point-mass integrator with yaw-only rotation.
///
/// Semi-implicit Euler with linear drag. The agent picks up the nearest
/// active entity within `pickup_radius` and is kept inside `arena`; touching
/// the arena wall reports a boundary contact on the first tick of contact only.
#[derive(Debug, Clone)]
pub struct PointMassPhysics {
    /// Fixed time step.
    pub dt: f64,
    pub mass: f64,
    /// Moment of inertia about the up axis.
    pub inertia: f64,
    /// Fraction of velocity lost per second.
    pub linear_drag: f64,
    /// Fraction of angular velocity lost per second.
    pub angular_drag: f64,
    /// Distance at which an entity counts as touched.
    pub pickup_radius: f64,
    /// Walls the agent cannot leave.
    pub arena: Region,
    touching_boundary: bool,
}

impl PointMassPhysics {
    pub fn new(arena: Region) -> Self {
        Self {
            dt: 0.02,
            mass: 1.0,
            inertia: 1.0,
            linear_drag: 0.5,
            angular_drag: 2.0,
            pickup_radius: 0.75,
            arena,
            touching_boundary: false,
        }
    }

    fn damping(&self, drag: f64) -> f64 {
        (1.0 - drag * self.dt).max(0.0)
    }

    /// Clamps the body into the arena, stopping motion into the wall.
    /// Returns true if the body was against a wall.
    fn confine(&self, body: &mut Kinematics) -> bool {
        let clamped = self.arena.clamp(body.position);
        if clamped == body.position {
            return false;
        }
        let hit = body.position.cmpne(clamped);
        body.velocity = DVec3::select(hit, DVec3::ZERO, body.velocity);
        body.position = clamped;
        true
    }
}

impl PhysicsAdapter for PointMassPhysics {
    fn integrate(
        &mut self,
        body: &mut Kinematics,
        actuation: &Actuation,
        pool: &dyn CollectiblePool,
    ) -> Vec<Contact> {
        let dt = self.dt;

        body.velocity += actuation.force / self.mass * dt;
        body.velocity *= self.damping(self.linear_drag);
        body.position += body.velocity * dt;

        // Only yaw: project torque onto the body's up axis.
        let up = body.up();
        let yaw_torque = actuation.torque.dot(up);
        body.angular_velocity += up * (yaw_torque / self.inertia * dt);
        body.angular_velocity *= self.damping(self.angular_drag);
        let spin = body.angular_velocity * dt;
        if spin != DVec3::ZERO {
            body.orientation = (DQuat::from_scaled_axis(spin) * body.orientation).normalize();
        }

        let mut contacts = Vec::new();

        let against_wall = self.confine(body);
        if against_wall && !self.touching_boundary {
            contacts.push(Contact::Boundary);
        }
        self.touching_boundary = against_wall;

        if let Some(id) = pool.nearest_active_to(body.position) {
            let touched = pool
                .active_position(id)
                .is_some_and(|p| p.distance(body.position) <= self.pickup_radius);
            if touched {
                contacts.push(Contact::Collectible(id));
            }
        }

        contacts
    }

    fn reset(&mut self) {
        self.touching_boundary = false;
    }
}
