//! Intersection with a horizontal plane.

use glam::Vec3;

use super::{PlacementConfig, PlacementDetail, PlacementResult, PlacementStrategy, StrategyKind};
use crate::geometry::{ray_plane, Ray};
use crate::host::GeometryQuery;

/// Projects onto `y = plane_height`. The segment end only gives the
/// direction; the plane is hit at any distance in front of the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaneStrategy;

impl PlacementStrategy for PlaneStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Plane
    }

    fn calculate(
        &self,
        origin: Vec3,
        end: Vec3,
        _geometry: &dyn GeometryQuery,
        config: &PlacementConfig,
    ) -> PlacementResult {
        let ray = Ray::from_points(origin, end);
        if !ray.is_valid() {
            return PlacementResult::miss();
        }

        let plane_point = Vec3::new(0.0, config.plane_height, 0.0);
        match ray_plane(&ray, plane_point, Vec3::Y) {
            Some(t) => PlacementResult {
                hit: true,
                point: ray.at(t),
                normal: Vec3::Y,
                detail: PlacementDetail::Plane {
                    height: config.plane_height,
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
    use approx::assert_abs_diff_eq;

    struct Empty;

    impl GeometryQuery for Empty {
        fn cast_ray(&self, _: Vec3, _: Vec3, _: u32, _: &[NodeId]) -> Option<RayHit> {
            None
        }
    }

    fn config(height: f32) -> PlacementConfig {
        PlacementConfig {
            plane_height: height,
            ..Default::default()
        }
    }

    #[test]
    fn test_hits_configured_height() {
        let result = PlaneStrategy.calculate(
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(4.0, 9.0, 0.0),
            &Empty,
            &config(2.0),
        );
        assert!(result.hit);
        assert_abs_diff_eq!(result.point.y, 2.0, epsilon = 1e-4);
        assert_abs_diff_eq!(result.point.x, 32.0, epsilon = 1e-3);
        assert_eq!(result.normal, Vec3::Y);
    }

    #[test]
    fn test_parallel_and_behind_miss() {
        let parallel = PlaneStrategy.calculate(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(5.0, 1.0, 0.0),
            &Empty,
            &config(0.0),
        );
        assert!(!parallel.hit);

        let behind = PlaneStrategy.calculate(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            &Empty,
            &config(0.0),
        );
        assert!(!behind.hit);

        let degenerate = PlaneStrategy.calculate(Vec3::ONE, Vec3::ONE, &Empty, &config(0.0));
        assert!(!degenerate.hit);
    }
}
