//! The collection environment.
//!
//! One tick runs in a fixed order:
//! act → integrate (physics adapter) → dispatch contacts → heal target →
//! observe and shape reward.

use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::agent::AgentState;
use crate::config::EnvConfig;
use crate::error::{ConfigError, EnvError, PoolError};
use crate::locator::NearestTargetLocator;
use crate::metrics::EpisodeStats;
use crate::observation::{Observation, TargetReading};
use crate::physics::{Actuation, Contact, PhysicsAdapter};
use crate::pool::{CollectiblePool, ObjectPool};
use crate::reward::{RewardComputer, RewardLedger};
use crate::types::{Action, EntityId};
use crate::generate_id;


/// Where the environment is in its lifecycle.
///
/// There is no terminal phase: an external driver decides when an episode
/// is over and starts the next one with [`AgentEnvironment::begin_episode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, no episode begun yet.
    Idle,
    /// Inside an episode.
    Active,
}

/// Result of a single tick.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Observation after the tick.
    pub observation: Observation,
    /// Reward earned during the tick.
    pub reward: f64,
    /// Contacts the physics adapter reported.
    pub contacts: Vec<Contact>,
    /// Ticks stepped in the current episode, including this one.
    pub tick: u64,
    /// Active entities left in the pool.
    pub active_entities: usize,
}

/// A single agent collecting entities from a pool.
///
/// # Lifecycle
///
/// 1. Build with [`AgentEnvironment::new`] (or [`with_pool`](Self::with_pool)).
///    The pool is scattered once at construction.
/// 2. Call [`begin_episode`](Self::begin_episode).
/// 3. Call [`step`](Self::step) once per tick, or drive the individual
///    operations ([`apply_action`](Self::apply_action), the contact handlers
///    and [`collect_observations`](Self::collect_observations)) from an
///    external engine.
/// 4. Start over at 2 whenever the driver decides the episode is done.
///
/// # Examples
///
/// ```
/// use glam::DVec3;
/// use robocollect::{Action, AgentEnvironment, EnvConfig, PointMassPhysics, Region};
///
/// let config = EnvConfig { pool_capacity: 10, ..EnvConfig::default() };
/// let arena = Region::new(DVec3::new(-12.0, 0.0, -12.0), DVec3::new(12.0, 2.0, 12.0)).unwrap();
/// let mut physics = PointMassPhysics::new(arena);
/// let mut env = AgentEnvironment::new(config, 42).unwrap();
///
/// env.begin_episode().unwrap();
/// let result = env.step(Action::new(1.0, 0.0), &mut physics).unwrap();
/// assert_eq!(result.tick, 1);
/// assert_eq!(result.observation.as_slice().len(), robocollect::OBSERVATION_DIM);
/// ```
#[derive(Debug)]
pub struct AgentEnvironment<P: CollectiblePool = ObjectPool> {
    /// Environment configuration.
    pub config: EnvConfig,
    pool: P,
    agent: AgentState,
    phase: Phase,
    actuation: Actuation,
    rewards: RewardLedger,
    stats: EpisodeStats,
    rng: StdRng,
    /// Base seed; episode `k` runs on `seed + k`.
    seed: u64,
    episodes_begun: u64,
}

impl AgentEnvironment<ObjectPool> {
    /// Creates an environment with a pool sized and placed from `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Environment and reward configuration
    /// * `seed` - Random seed for reproducible episodes
    pub fn new(config: EnvConfig, seed: u64) -> Result<Self, EnvError> {
        let pool = ObjectPool::new(config.pool_capacity, config.pool_region)?;
        Self::with_pool(config, pool, seed)
    }
}

impl<P: CollectiblePool> AgentEnvironment<P> {
    /// Creates an environment around an existing pool.
    ///
    /// The pool is scattered once here, so play mode has something to
    /// collect without ever redistributing.
    pub fn with_pool(config: EnvConfig, mut pool: P, seed: u64) -> Result<Self, EnvError> {
        check_config(&config, &pool)?;

        let mut rng = StdRng::seed_from_u64(seed);
        pool.distribute_all(&mut rng);
        let agent = AgentState::new(config.agent_region.center());

        Ok(Self {
            config,
            pool,
            agent,
            phase: Phase::Idle,
            actuation: Actuation::default(),
            rewards: RewardLedger::default(),
            stats: EpisodeStats::new(String::new()),
            rng,
            seed,
            episodes_begun: 0,
        })
    }

    /// Starts a new episode.
    ///
    /// Safe to call at any tick boundary, including in the middle of an
    /// episode: motion is zeroed, the fresh flag set and the target
    /// recomputed from scratch every time.
    ///
    /// In training mode the pool is redistributed, the agent is dropped at a
    /// random point of its reset region and, with probability
    /// `relocate_probability`, the designated pool slot is moved
    /// `relocate_offset` straight ahead of the agent.
    ///
    /// `config` is public, so it is validated again here; on error nothing
    /// changes.
    pub fn begin_episode(&mut self) -> Result<(), EnvError> {
        check_config(&self.config, &self.pool)?;

        self.rng = StdRng::seed_from_u64(self.seed.wrapping_add(self.episodes_begun));
        self.episodes_begun += 1;

        self.agent.reset_episode();
        self.actuation = Actuation::default();
        self.rewards.reset();

        if self.config.training_mode {
            self.pool.distribute_all(&mut self.rng);

            let position = self.config.agent_region.sample(&mut self.rng);
            self.agent.teleport(position);

            if self.rng.gen_bool(self.config.relocate_probability) {
                let slot = EntityId(self.config.relocate_slot);
                let ahead = position
                    + self.agent.body.forward().normalize_or_zero() * self.config.relocate_offset;
                self.pool.relocate(slot, ahead)?;
                tracing::debug!(%slot, ?ahead, "placed entity in front of agent");
            }
        }

        self.refresh_target();
        self.phase = Phase::Active;
        self.stats = EpisodeStats::new(generate_id());

        tracing::info!(
            episode = %self.stats.episode_id,
            training = self.config.training_mode,
            active = self.pool.active_count(),
            position = ?self.agent.body.position,
            target = ?self.agent.target,
            "episode begun"
        );
        Ok(())
    }

    /// Converts an action into force/torque intent for the physics engine.
    ///
    /// The force runs along the agent's forward axis, the torque about its up
    /// axis. Values are not clamped.
    pub fn apply_action(&mut self, action: Action) -> Actuation {
        let body = &self.agent.body;
        self.actuation = Actuation {
            force: body.forward() * (action.forward * self.config.move_force),
            torque: body.up() * (action.turn * self.config.rotation_force),
        };
        self.actuation
    }

    /// Like [`apply_action`](Self::apply_action) for a raw policy output.
    pub fn apply_raw_action(&mut self, values: &[f64]) -> Result<Actuation, EnvError> {
        Ok(self.apply_action(Action::from_slice(values)?))
    }

    /// Builds this tick's observation and, in training mode, shapes reward.
    ///
    /// Without a target the observation is all zeros and no reward is
    /// shaped. With one, the first call after the fresh flag was set only
    /// records a distance baseline; later calls add
    /// `w_orient × dot + w_progress × (previous − current)`.
    pub fn collect_observations(&mut self) -> Observation {
        self.heal_target();

        let Some(position) = self.agent.target.and_then(|id| self.pool.active_position(id))
        else {
            return Observation::empty();
        };

        let reading = TargetReading::measure(&self.agent.body, position);

        if self.config.training_mode {
            if let Some(previous) = self.agent.swap_baseline(reading.distance) {
                let reward = RewardComputer::shaping(
                    &self.config.reward,
                    reading.dot,
                    previous,
                    reading.distance,
                );
                tracing::trace!(reward, dot = reading.dot, distance = reading.distance, "shaped");
                self.add_reward(reward);
            }
        }

        Observation::encode(&self.agent.body, &reading)
    }

    /// Handles the agent touching a collectible entity.
    ///
    /// The entity must be active; touching an inactive one is an error and
    /// leaves the pool untouched.
    pub fn on_collectible_contact(&mut self, id: EntityId) -> Result<(), EnvError> {
        self.pool.collect(id)?;
        self.stats.collected += 1;

        if self.config.training_mode {
            self.add_reward(RewardComputer::collection(&self.config.reward));
            self.agent.fresh = true;
        }

        if self.config.respawn_collected {
            let respawned = self.pool.respawn_inactive(&mut self.rng);
            tracing::debug!(respawned, "respawned collected entities");
        }

        self.refresh_target();
        Ok(())
    }

    /// Handles the agent touching the arena boundary. Never ends the episode.
    pub fn on_boundary_contact(&mut self) {
        self.stats.boundary_hits += 1;
        if self.config.training_mode {
            self.add_reward(RewardComputer::boundary(&self.config.reward));
        }
        tracing::debug!(hits = self.stats.boundary_hits, "boundary contact");
    }

    /// Routes a contact to its handler.
    pub fn dispatch(&mut self, contact: Contact) -> Result<(), EnvError> {
        match contact {
            Contact::Collectible(id) => self.on_collectible_contact(id),
            Contact::Boundary => {
                self.on_boundary_contact();
                Ok(())
            }
        }
    }

    /// Runs one tick against `physics`.
    ///
    /// # Errors
    ///
    /// [`EnvError::EpisodeNotStarted`] before the first
    /// [`begin_episode`](Self::begin_episode), or a pool error if the physics
    /// adapter reports contact with an entity that is not active or reports
    /// the same entity twice. Contacts are checked before any is dispatched,
    /// so a rejected tick applies no reward, collection or tick count; only
    /// the body integrated by `physics` has moved.
    pub fn step<A: PhysicsAdapter + ?Sized>(
        &mut self,
        action: Action,
        physics: &mut A,
    ) -> Result<StepResult, EnvError> {
        if self.phase != Phase::Active {
            return Err(EnvError::EpisodeNotStarted);
        }

        let actuation = self.apply_action(action);
        let contacts = physics.integrate(&mut self.agent.body, &actuation, &self.pool);
        self.check_contacts(&contacts)?;
        for contact in &contacts {
            self.dispatch(*contact)?;
        }

        let observation = self.collect_observations();
        self.stats.ticks += 1;

        Ok(StepResult {
            observation,
            reward: self.rewards.take(),
            contacts,
            tick: self.stats.ticks,
            active_entities: self.pool.active_count(),
        })
    }

    /// Adds to the pending and cumulative reward.
    pub fn add_reward(&mut self, reward: f64) {
        self.rewards.add(reward);
    }

    /// Returns and clears the reward accumulated since the last call.
    pub fn take_reward(&mut self) -> f64 {
        self.rewards.take()
    }

    /// Reward accumulated since the last [`take_reward`](Self::take_reward).
    pub fn pending_reward(&self) -> f64 {
        self.rewards.pending()
    }

    /// Reward accumulated over the whole episode.
    pub fn cumulative_reward(&self) -> f64 {
        self.rewards.cumulative()
    }

    /// Statistics of the current episode.
    pub fn stats(&self) -> EpisodeStats {
        EpisodeStats {
            cumulative_reward: self.rewards.cumulative(),
            ..self.stats.clone()
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Agent kinematics and targeting state.
    pub fn agent(&self) -> &AgentState {
        &self.agent
    }

    /// Current target, if any.
    pub fn target(&self) -> Option<EntityId> {
        self.agent.target
    }

    /// Last actuation handed to the physics engine.
    pub fn actuation(&self) -> Actuation {
        self.actuation
    }

    /// Read-only view of the pool.
    pub fn pool(&self) -> &P {
        &self.pool
    }

    /// Position of the agent.
    pub fn agent_position(&self) -> DVec3 {
        self.agent.body.position
    }

    /// Rejects unknown, inactive or repeated collectible contacts.
    fn check_contacts(&self, contacts: &[Contact]) -> Result<(), PoolError> {
        let mut seen: Vec<EntityId> = Vec::new();
        for contact in contacts {
            let Contact::Collectible(id) = *contact else {
                continue;
            };
            if id.index() >= self.pool.capacity() {
                return Err(PoolError::UnknownEntity(id));
            }
            if seen.contains(&id) || self.pool.active_position(id).is_none() {
                return Err(PoolError::AlreadyCollected(id));
            }
            seen.push(id);
        }
        Ok(())
    }

    fn refresh_target(&mut self) {
        self.agent.target = NearestTargetLocator::locate(&self.pool, self.agent.body.position);
    }

    /// Recomputes the target once if it is missing or the pool deactivated it.
    fn heal_target(&mut self) {
        let valid = self
            .agent
            .target
            .is_some_and(|id| self.pool.active_position(id).is_some());
        if valid {
            return;
        }
        if let Some(stale) = self.agent.target {
            // The baseline belonged to the old target.
            tracing::debug!(%stale, "target no longer active");
            self.agent.fresh = true;
        }
        self.refresh_target();
    }
}

fn check_config<P: CollectiblePool>(config: &EnvConfig, pool: &P) -> Result<(), ConfigError> {
    config.validate()?;
    if config.relocate_slot >= pool.capacity() {
        return Err(ConfigError::RelocateSlotOutOfRange {
            slot: config.relocate_slot,
            capacity: pool.capacity(),
        });
    }
    Ok(())
}
