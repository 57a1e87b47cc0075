//! Nearest-target search over a collectible pool.

use glam::DVec3;

use crate::pool::CollectiblePool;
use crate::types::EntityId;

/// A located target: which entity, where it is and how far away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetFix {
    pub id: EntityId,
    pub position: DVec3,
    pub distance: f64,
}

/// Stateless nearest-active-entity query.
///
/// Plain linear scan in Euclidean distance; pools are small enough that no
/// spatial index pays for itself. Nothing is cached between calls.
pub struct NearestTargetLocator;

impl NearestTargetLocator {
    /// Returns the closest active entity to `point`, or `None` when the pool
    /// has nothing active.
    pub fn locate(pool: &dyn CollectiblePool, point: DVec3) -> Option<EntityId> {
        pool.nearest_active_to(point)
    }

    /// Like [`locate`](Self::locate) but also resolves position and distance.
    pub fn fix(pool: &dyn CollectiblePool, point: DVec3) -> Option<TargetFix> {
        let id = Self::locate(pool, point)?;
        let position = pool.active_position(id)?;
        Some(TargetFix {
            id,
            position,
            distance: position.distance(point),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::ObjectPool;
    use crate::types::Region;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn locate_matches_brute_force() {
        let mut pool = ObjectPool::new(60, Region::cube(20.0)).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        pool.distribute_all(&mut rng);
        for i in (0..60).step_by(3) {
            pool.collect(EntityId(i)).unwrap();
        }

        let point = DVec3::new(4.0, 13.0, 7.5);
        let expected = pool
            .entities()
            .iter()
            .filter(|e| e.active)
            .min_by(|a, b| {
                a.position
                    .distance(point)
                    .total_cmp(&b.position.distance(point))
            })
            .map(|e| e.id);
        assert_eq!(NearestTargetLocator::locate(&pool, point), expected);
    }

    #[test]
    fn fix_reports_distance() {
        let mut pool = ObjectPool::new(1, Region::cube(1.0)).unwrap();
        pool.distribute_all(&mut StdRng::seed_from_u64(0));
        pool.relocate(EntityId(0), DVec3::new(3.0, 4.0, 0.0)).unwrap();

        let fix = NearestTargetLocator::fix(&pool, DVec3::ZERO).unwrap();
        assert_eq!(fix.id, EntityId(0));
        assert!((fix.distance - 5.0).abs() < 1e-10);
    }

    #[test]
    fn empty_pool_has_no_fix() {
        let pool = ObjectPool::new(3, Region::cube(1.0)).unwrap();
        assert!(NearestTargetLocator::locate(&pool, DVec3::ZERO).is_none());
        assert!(NearestTargetLocator::fix(&pool, DVec3::ZERO).is_none());
    }
}
