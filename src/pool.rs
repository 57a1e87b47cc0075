//! Collectible entity management: placement, collection and respawn.

use glam::DVec3;
use rand::RngCore;

use crate::error::{ConfigError, PoolError};
use crate::types::{EntityId, Region};

/// A collectible entity living in an [`ObjectPool`] slot.
///
/// Entities exist for the whole lifetime of the pool and are only ever
/// activated or deactivated.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectibleEntity {
    /// Slot identity.
    pub id: EntityId,
    /// Position in world space.
    pub position: DVec3,
    /// Whether the entity is in play.
    pub active: bool,
    /// Linear velocity.
    pub velocity: DVec3,
    /// Angular velocity.
    pub angular_velocity: DVec3,
}

impl CollectibleEntity {
    fn dormant(id: EntityId, position: DVec3) -> Self {
        Self {
            id,
            position,
            active: false,
            velocity: DVec3::ZERO,
            angular_velocity: DVec3::ZERO,
        }
    }
}

/// The operations the environment and physics adapters may perform on a pool.
///
/// Everything else about the pool stays private to it; in particular the
/// active count can only move through these calls.
pub trait CollectiblePool {
    /// Scatters every entity uniformly over the placement region and
    /// activates it.
    fn distribute_all(&mut self, rng: &mut dyn RngCore);

    /// Deactivates an active entity and stops its motion.
    fn collect(&mut self, id: EntityId) -> Result<(), PoolError>;

    /// Moves an entity without touching its active flag.
    fn relocate(&mut self, id: EntityId, position: DVec3) -> Result<(), PoolError>;

    /// Closest active entity to `point`, lowest slot first on ties.
    fn nearest_active_to(&self, point: DVec3) -> Option<EntityId>;

    /// Position of `id` if it exists and is active.
    fn active_position(&self, id: EntityId) -> Option<DVec3>;

    /// Re-scatters and reactivates every inactive entity, returning how many.
    fn respawn_inactive(&mut self, rng: &mut dyn RngCore) -> usize;

    /// Number of active entities.
    fn active_count(&self) -> usize;

    /// Total number of slots.
    fn capacity(&self) -> usize;
}

/// Fixed-size pool of collectible entities.
///
/// # Examples
///
/// ```
/// use glam::DVec3;
/// use rand::{rngs::StdRng, SeedableRng};
/// use robocollect::{CollectiblePool, ObjectPool, Region};
///
/// let mut pool = ObjectPool::new(5, Region::cube(10.0)).unwrap();
/// assert_eq!(pool.active_count(), 0);
///
/// pool.distribute_all(&mut StdRng::seed_from_u64(3));
/// assert_eq!(pool.active_count(), 5);
///
/// let nearest = pool.nearest_active_to(DVec3::ZERO).unwrap();
/// pool.collect(nearest).unwrap();
/// assert_eq!(pool.active_count(), 4);
/// assert!(pool.collect(nearest).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ObjectPool {
    entities: Vec<CollectibleEntity>,
    region: Region,
    active_count: usize,
}

impl ObjectPool {
    /// Allocates `capacity` inactive entities parked at the region's min corner.
    ///
    /// Fails if `region` could not be sampled from.
    pub fn new(capacity: usize, region: Region) -> Result<Self, ConfigError> {
        region.validate()?;
        let entities = (0..capacity)
            .map(|i| CollectibleEntity::dormant(EntityId(i), region.min))
            .collect();
        Ok(Self {
            entities,
            region,
            active_count: 0,
        })
    }

    /// Placement region.
    pub fn region(&self) -> Region {
        self.region
    }

    /// All entities in slot order.
    pub fn entities(&self) -> &[CollectibleEntity] {
        &self.entities
    }

    /// Looks up a slot.
    pub fn entity(&self, id: EntityId) -> Option<&CollectibleEntity> {
        self.entities.get(id.index())
    }

    fn slot_mut(&mut self, id: EntityId) -> Result<&mut CollectibleEntity, PoolError> {
        self.entities
            .get_mut(id.index())
            .ok_or(PoolError::UnknownEntity(id))
    }

    /// Places the slot at a fresh sample and marks it active, counting it only
    /// if it was inactive before.
    fn activate_at(&mut self, index: usize, position: DVec3) {
        let entity = &mut self.entities[index];
        entity.position = position;
        if !entity.active {
            entity.active = true;
            self.active_count += 1;
        }
    }
}

impl CollectiblePool for ObjectPool {
    fn distribute_all(&mut self, rng: &mut dyn RngCore) {
        for i in 0..self.entities.len() {
            let position = self.region.sample(rng);
            self.activate_at(i, position);
        }
        debug_assert_eq!(self.active_count, self.entities.len());
    }

    fn collect(&mut self, id: EntityId) -> Result<(), PoolError> {
        let entity = self.slot_mut(id)?;
        if !entity.active {
            return Err(PoolError::AlreadyCollected(id));
        }
        entity.velocity = DVec3::ZERO;
        entity.angular_velocity = DVec3::ZERO;
        entity.active = false;
        self.active_count -= 1;
        tracing::debug!(%id, remaining = self.active_count, "collected entity");
        Ok(())
    }

    fn relocate(&mut self, id: EntityId, position: DVec3) -> Result<(), PoolError> {
        self.slot_mut(id)?.position = position;
        Ok(())
    }

    fn nearest_active_to(&self, point: DVec3) -> Option<EntityId> {
        let mut best: Option<(f64, EntityId)> = None;
        for entity in self.entities.iter().filter(|e| e.active) {
            let distance = entity.position.distance(point);
            match best {
                Some((closest, _)) if distance >= closest => {}
                _ => best = Some((distance, entity.id)),
            }
        }
        best.map(|(_, id)| id)
    }

    fn active_position(&self, id: EntityId) -> Option<DVec3> {
        self.entity(id).filter(|e| e.active).map(|e| e.position)
    }

    fn respawn_inactive(&mut self, rng: &mut dyn RngCore) -> usize {
        let mut respawned = 0;
        for i in 0..self.entities.len() {
            if !self.entities[i].active {
                let position = self.region.sample(rng);
                self.activate_at(i, position);
                respawned += 1;
            }
        }
        respawned
    }

    fn active_count(&self) -> usize {
        self.active_count
    }

    fn capacity(&self) -> usize {
        self.entities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_pool(n: usize) -> ObjectPool {
        ObjectPool::new(n, Region::cube(10.0)).unwrap()
    }

    fn counted_active(pool: &ObjectPool) -> usize {
        pool.entities().iter().filter(|e| e.active).count()
    }

    /// Pool with every slot active at a hand-picked position.
    fn pool_at(positions: &[DVec3]) -> ObjectPool {
        let mut pool = ObjectPool::new(positions.len(), Region::cube(100.0)).unwrap();
        pool.distribute_all(&mut StdRng::seed_from_u64(0));
        for (i, p) in positions.iter().enumerate() {
            pool.relocate(EntityId(i), *p).unwrap();
        }
        pool
    }

    #[test]
    fn new_pool_is_inactive() {
        let pool = make_pool(8);
        assert_eq!(pool.capacity(), 8);
        assert_eq!(pool.active_count(), 0);
        assert!(pool.entities().iter().all(|e| !e.active));
    }

    #[test]
    fn unusable_region_is_rejected() {
        let inverted = Region {
            min: DVec3::ONE,
            max: DVec3::ZERO,
        };
        assert_eq!(
            ObjectPool::new(3, inverted).unwrap_err(),
            ConfigError::InvertedRegion { axis: "x" }
        );

        let unbounded = Region {
            min: DVec3::new(0.0, -f64::MAX, 0.0),
            max: DVec3::new(1.0, f64::MAX, 1.0),
        };
        assert_eq!(
            ObjectPool::new(3, unbounded).unwrap_err(),
            ConfigError::UnboundedRegion { axis: "y" }
        );
    }

    #[test]
    fn distribute_activates_inside_region() {
        let region = Region::new(DVec3::new(-3.0, 1.0, 2.0), DVec3::new(4.0, 2.0, 9.0)).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for n in [1, 5, 40, 250] {
            let mut pool = ObjectPool::new(n, region).unwrap();
            pool.distribute_all(&mut rng);
            assert_eq!(pool.active_count(), n);
            assert_eq!(counted_active(&pool), n);
            assert!(pool.entities().iter().all(|e| region.contains(e.position)));
        }
    }

    #[test]
    fn redistribute_does_not_overcount() {
        let mut pool = make_pool(6);
        let mut rng = StdRng::seed_from_u64(2);
        pool.distribute_all(&mut rng);
        pool.collect(EntityId(1)).unwrap();
        pool.distribute_all(&mut rng);
        pool.distribute_all(&mut rng);
        assert_eq!(pool.active_count(), 6);
    }

    #[test]
    fn collect_stops_and_deactivates() {
        let mut pool = make_pool(3);
        pool.distribute_all(&mut StdRng::seed_from_u64(5));
        pool.entities[2].velocity = DVec3::new(1.0, 2.0, 3.0);
        pool.entities[2].angular_velocity = DVec3::new(0.0, 4.0, 0.0);

        pool.collect(EntityId(2)).unwrap();

        let e = pool.entity(EntityId(2)).unwrap();
        assert!(!e.active);
        assert_eq!(e.velocity, DVec3::ZERO);
        assert_eq!(e.angular_velocity, DVec3::ZERO);
        assert_eq!(pool.active_count(), 2);
        assert_eq!(counted_active(&pool), 2);
    }

    #[test]
    fn double_collect_is_an_error() {
        let mut pool = make_pool(3);
        pool.distribute_all(&mut StdRng::seed_from_u64(5));
        pool.collect(EntityId(0)).unwrap();
        assert_eq!(
            pool.collect(EntityId(0)),
            Err(PoolError::AlreadyCollected(EntityId(0)))
        );
        assert_eq!(pool.active_count(), 2);
    }

    #[test]
    fn collect_unknown_slot_is_an_error() {
        let mut pool = make_pool(2);
        assert_eq!(
            pool.collect(EntityId(9)),
            Err(PoolError::UnknownEntity(EntityId(9)))
        );
    }

    #[test]
    fn relocate_keeps_active_flag() {
        let mut pool = make_pool(2);
        pool.relocate(EntityId(1), DVec3::new(1.0, 1.0, 1.0)).unwrap();
        assert!(!pool.entity(EntityId(1)).unwrap().active);
        assert_eq!(pool.active_count(), 0);
        assert!(pool.relocate(EntityId(2), DVec3::ZERO).is_err());
    }

    #[test]
    fn nearest_picks_unique_minimum() {
        let pool = pool_at(&[
            DVec3::new(9.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(0.0, 5.0, 0.0),
        ]);
        assert_eq!(pool.nearest_active_to(DVec3::ZERO), Some(EntityId(1)));
    }

    #[test]
    fn nearest_breaks_ties_by_lowest_index() {
        let pool = pool_at(&[
            DVec3::new(7.0, 0.0, 0.0),
            DVec3::new(0.0, 3.0, 0.0),
            DVec3::new(3.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, -3.0),
        ]);
        assert_eq!(pool.nearest_active_to(DVec3::ZERO), Some(EntityId(1)));
    }

    #[test]
    fn nearest_skips_inactive_including_slot_zero() {
        let mut pool = pool_at(&[
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(6.0, 0.0, 0.0),
            DVec3::new(4.0, 0.0, 0.0),
        ]);
        pool.collect(EntityId(0)).unwrap();
        assert_eq!(pool.nearest_active_to(DVec3::ZERO), Some(EntityId(2)));
    }

    #[test]
    fn nearest_with_nothing_active_is_none() {
        let mut pool = pool_at(&[DVec3::ONE, DVec3::ZERO]);
        pool.collect(EntityId(0)).unwrap();
        pool.collect(EntityId(1)).unwrap();
        assert_eq!(pool.nearest_active_to(DVec3::ZERO), None);
        assert_eq!(make_pool(4).nearest_active_to(DVec3::ZERO), None);
    }

    #[test]
    fn active_position_hides_inactive() {
        let mut pool = pool_at(&[DVec3::new(1.0, 2.0, 3.0)]);
        assert_eq!(
            pool.active_position(EntityId(0)),
            Some(DVec3::new(1.0, 2.0, 3.0))
        );
        pool.collect(EntityId(0)).unwrap();
        assert_eq!(pool.active_position(EntityId(0)), None);
        assert_eq!(pool.active_position(EntityId(5)), None);
    }

    #[test]
    fn respawn_restores_only_inactive() {
        let mut pool = make_pool(5);
        let mut rng = StdRng::seed_from_u64(9);
        pool.distribute_all(&mut rng);
        let untouched = pool.entity(EntityId(0)).unwrap().position;
        pool.collect(EntityId(3)).unwrap();
        pool.collect(EntityId(4)).unwrap();

        assert_eq!(pool.respawn_inactive(&mut rng), 2);
        assert_eq!(pool.active_count(), 5);
        assert_eq!(pool.entity(EntityId(0)).unwrap().position, untouched);
        assert_eq!(pool.respawn_inactive(&mut rng), 0);
    }
}
