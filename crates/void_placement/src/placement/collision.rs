//! Raycast against scene geometry.

use glam::Vec3;

use super::{PlacementConfig, PlacementDetail, PlacementResult, PlacementStrategy, StrategyKind};
use crate::host::GeometryQuery;

#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionStrategy;

impl PlacementStrategy for CollisionStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Collision
    }

    fn calculate(
        &self,
        origin: Vec3,
        end: Vec3,
        geometry: &dyn GeometryQuery,
        config: &PlacementConfig,
    ) -> PlacementResult {
        match geometry.cast_ray(origin, end, config.layer_mask, &config.exclude) {
            Some(hit) => PlacementResult {
                hit: true,
                point: hit.point,
                normal: hit.normal.try_normalize().unwrap_or(Vec3::Y),
                detail: PlacementDetail::Collision {
                    node: hit.node,
                    distance: origin.distance(hit.point),
                },
            },
            None => PlacementResult::miss(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{NodeId, RayHit};

    /// Ground at y = 0 on layer 1, honouring mask and exclusions.
    struct Ground;

    impl GeometryQuery for Ground {
        fn cast_ray(&self, origin: Vec3, end: Vec3, mask: u32, exclude: &[NodeId]) -> Option<RayHit> {
            if mask & 1 == 0 || exclude.contains(&NodeId(1)) {
                return None;
            }
            let dir = end - origin;
            if dir.y >= 0.0 {
                return None;
            }
            let t = -origin.y / dir.y;
            Some(RayHit {
                point: origin + dir * t,
                normal: Vec3::Y * 2.0,
                node: Some(NodeId(1)),
            })
        }
    }

    #[test]
    fn test_hit_reports_normal_and_node() {
        let result = CollisionStrategy.calculate(
            Vec3::new(2.3, 10.0, 4.7),
            Vec3::new(2.3, -10.0, 4.7),
            &Ground,
            &PlacementConfig::default(),
        );
        assert!(result.hit);
        assert_eq!(result.point, Vec3::new(2.3, 0.0, 4.7));
        assert_eq!(result.normal, Vec3::Y);
        assert_eq!(
            result.detail,
            PlacementDetail::Collision { node: Some(NodeId(1)), distance: 10.0 }
        );
    }

    #[test]
    fn test_mask_and_exclude_miss() {
        let origin = Vec3::new(0.0, 10.0, 0.0);
        let end = Vec3::new(0.0, -10.0, 0.0);

        let masked = PlacementConfig {
            layer_mask: 0b10,
            ..Default::default()
        };
        let result = CollisionStrategy.calculate(origin, end, &Ground, &masked);
        assert!(!result.hit);
        assert_eq!(result.normal, Vec3::Y);

        let excluded = PlacementConfig {
            exclude: vec![NodeId(1)],
            ..Default::default()
        };
        assert!(!CollisionStrategy.calculate(origin, end, &Ground, &excluded).hit);
    }
}
