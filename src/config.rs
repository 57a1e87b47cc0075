//! Configuration for the collection environment.

use glam::DVec3;

use crate::error::ConfigError;
use crate::types::Region;

/// Reward shaping constants.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardConfig {
    /// Weight of the facing term `forward · direction`.
    pub orientation_weight: f64,
    /// Weight of the approach term `previous − current` distance.
    pub progress_weight: f64,
    /// Flat bonus for collecting an entity.
    pub collection_bonus: f64,
    /// Reward added on touching the arena boundary (negative).
    pub boundary_penalty: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            orientation_weight: 0.02,
            progress_weight: 0.5,
            collection_bonus: 0.2,
            boundary_penalty: -0.5,
        }
    }
}

/// Configuration for the collection environment.
///
/// Controls actuation strength, the training/play switch, pool sizing and
/// placement, the episode-start relocation trick and reward shaping.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvConfig {
    // --- Actuation ---
    /// Force applied along the forward axis per unit of forward action.
    pub move_force: f64,
    /// Torque applied about the up axis per unit of turn action.
    pub rotation_force: f64,

    // --- Mode ---
    /// Training mode resets the scene every episode and emits rewards.
    pub training_mode: bool,

    // --- Pool ---
    /// Number of collectible entities.
    pub pool_capacity: usize,
    /// Region the entities are scattered in.
    pub pool_region: Region,
    /// Region the agent is placed in at episode start.
    pub agent_region: Region,
    /// Re-scatter collected entities right after each collection.
    pub respawn_collected: bool,

    // --- Episode-start relocation ---
    /// Probability of placing an entity directly in front of the agent.
    pub relocate_probability: f64,
    /// Pool slot that gets relocated.
    pub relocate_slot: usize,
    /// Distance in front of the agent the relocated entity is placed at.
    pub relocate_offset: f64,

    // --- Reward shaping ---
    pub reward: RewardConfig,
}

impl EnvConfig {
    /// Checks every field for values the environment cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !(0.0..=1.0).contains(&self.relocate_probability) {
            return Err(ConfigError::InvalidProbability(self.relocate_probability));
        }
        if self.relocate_slot >= self.pool_capacity {
            return Err(ConfigError::RelocateSlotOutOfRange {
                slot: self.relocate_slot,
                capacity: self.pool_capacity,
            });
        }
        let scalars = [
            ("move_force", self.move_force),
            ("rotation_force", self.rotation_force),
            ("relocate_offset", self.relocate_offset),
            ("orientation_weight", self.reward.orientation_weight),
            ("progress_weight", self.reward.progress_weight),
            ("collection_bonus", self.reward.collection_bonus),
            ("boundary_penalty", self.reward.boundary_penalty),
        ];
        if let Some((name, _)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite(*name));
        }
        self.pool_region.validate()?;
        self.agent_region.validate()
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            move_force: 1.0,
            rotation_force: 1.0,
            training_mode: true,
            pool_capacity: 100,
            pool_region: Region {
                min: DVec3::new(-10.0, 0.25, -10.0),
                max: DVec3::new(10.0, 0.25, 10.0),
            },
            agent_region: Region {
                min: DVec3::new(-8.0, 0.0, -8.0),
                max: DVec3::new(8.0, 0.0, 8.0),
            },
            respawn_collected: false,
            relocate_probability: 0.5,
            relocate_slot: 0,
            relocate_offset: 2.0,
            reward: RewardConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = EnvConfig::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.training_mode);
        assert_eq!(cfg.relocate_probability, 0.5);
        assert_eq!(cfg.relocate_offset, 2.0);
    }

    #[test]
    fn default_reward_constants() {
        let r = RewardConfig::default();
        assert_eq!(r.orientation_weight, 0.02);
        assert_eq!(r.progress_weight, 0.5);
        assert_eq!(r.collection_bonus, 0.2);
        assert_eq!(r.boundary_penalty, -0.5);
    }

    #[test]
    fn rejects_bad_probability() {
        let cfg = EnvConfig {
            relocate_probability: 1.2,
            ..EnvConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidProbability(1.2)));
    }

    #[test]
    fn rejects_zero_capacity() {
        let cfg = EnvConfig {
            pool_capacity: 0,
            ..EnvConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn rejects_slot_outside_pool() {
        let cfg = EnvConfig {
            pool_capacity: 4,
            relocate_slot: 4,
            ..EnvConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::RelocateSlotOutOfRange {
                slot: 4,
                capacity: 4
            })
        );
    }

    #[test]
    fn rejects_non_finite_force() {
        let cfg = EnvConfig {
            move_force: f64::NAN,
            ..EnvConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NonFinite("move_force")));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_roundtrips_through_json() {
        let cfg = EnvConfig {
            pool_capacity: 12,
            training_mode: false,
            ..EnvConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: EnvConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
