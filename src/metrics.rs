//! Episode statistics and their aggregation.

use std::fmt;

use crate::environment::AgentEnvironment;
use crate::error::EnvError;
use crate::physics::PhysicsAdapter;
use crate::policy::Policy;
use crate::pool::CollectiblePool;
use crate::Id;

/// Counters for a single episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeStats {
    /// Identifier assigned when the episode began.
    pub episode_id: Id,
    /// Ticks stepped so far.
    pub ticks: u64,
    /// Entities collected.
    pub collected: u32,
    /// Boundary contacts.
    pub boundary_hits: u32,
    /// Total reward emitted this episode.
    pub cumulative_reward: f64,
}

impl EpisodeStats {
    pub fn new(episode_id: Id) -> Self {
        Self {
            episode_id,
            ticks: 0,
            collected: 0,
            boundary_hits: 0,
            cumulative_reward: 0.0,
        }
    }

    /// Collections per 1000 ticks.
    pub fn collection_rate(&self) -> f64 {
        if self.ticks == 0 {
            0.0
        } else {
            self.collected as f64 * 1000.0 / self.ticks as f64
        }
    }
}

impl fmt::Display for EpisodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "episode {}: {} ticks, {} collected, {} boundary hits, reward {:.3}",
            self.episode_id, self.ticks, self.collected, self.boundary_hits, self.cumulative_reward
        )
    }
}

/// Means over several finished episodes.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationMetrics {
    pub mean_collected: f64,
    pub mean_boundary_hits: f64,
    pub mean_cumulative_reward: f64,
    /// Mean collections per 1000 ticks.
    pub mean_collection_rate: f64,
    pub n_episodes: usize,
}

impl EvaluationMetrics {
    /// Runs a policy for a number of fixed-length episodes and aggregates
    /// their statistics.
    ///
    /// # Arguments
    ///
    /// * `env` - The environment to evaluate in
    /// * `policy` - The policy to evaluate
    /// * `physics` - Integrator driving the agent
    /// * `n_episodes` - Number of episodes to run
    /// * `horizon` - Ticks per episode
    pub fn evaluate<P, A>(
        env: &mut AgentEnvironment<P>,
        policy: &mut dyn Policy,
        physics: &mut A,
        n_episodes: usize,
        horizon: u64,
    ) -> Result<Self, EnvError>
    where
        P: CollectiblePool,
        A: PhysicsAdapter + ?Sized,
    {
        let mut episodes = Vec::with_capacity(n_episodes);

        for _ in 0..n_episodes {
            env.begin_episode()?;
            physics.reset();
            let mut obs = env.collect_observations();

            for _ in 0..horizon {
                let action = policy.select_action(&obs);
                obs = env.step(action, physics)?.observation;
            }

            let stats = env.stats();
            tracing::debug!(%stats, policy = policy.name(), "episode finished");
            episodes.push(stats);
        }

        Ok(Self::from_episodes(&episodes))
    }

    /// Aggregates episode statistics. An empty slice yields all-zero means.
    pub fn from_episodes(episodes: &[EpisodeStats]) -> Self {
        Self {
            mean_collected: mean_of(episodes, |s| s.collected as f64),
            mean_boundary_hits: mean_of(episodes, |s| s.boundary_hits as f64),
            mean_cumulative_reward: mean_of(episodes, |s| s.cumulative_reward),
            mean_collection_rate: mean_of(episodes, EpisodeStats::collection_rate),
            n_episodes: episodes.len(),
        }
    }
}

fn mean_of(episodes: &[EpisodeStats], f: impl Fn(&EpisodeStats) -> f64) -> f64 {
    if episodes.is_empty() {
        return 0.0;
    }
    episodes.iter().map(f).sum::<f64>() / episodes.len() as f64
}

impl fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Evaluation Metrics ({} episodes) ===",
            self.n_episodes
        )?;
        writeln!(f, "  Mean collected:          {:.2}", self.mean_collected)?;
        writeln!(
            f,
            "  Mean collection rate:    {:.2} / 1000 ticks",
            self.mean_collection_rate
        )?;
        writeln!(f, "  Mean boundary hits:      {:.2}", self.mean_boundary_hits)?;
        writeln!(
            f,
            "  Mean cumulative reward:  {:.3}",
            self.mean_cumulative_reward
        )
    }
}
