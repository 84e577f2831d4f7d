//! Placement strategies
//!
//! A strategy turns a camera ray into a candidate world point and surface
//! normal. [`PlacementStrategies`] owns one instance of each and tracks
//! which is active.

mod collision;
mod plane;

pub use collision::CollisionStrategy;
pub use plane::PlaneStrategy;

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{PlacementError, Result};
use crate::host::{GeometryQuery, NodeId};

/// Available strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Raycast against scene geometry
    #[default]
    Collision,
    /// Intersect a horizontal plane
    Plane,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 2] = [StrategyKind::Collision, StrategyKind::Plane];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Collision => "collision",
            StrategyKind::Plane => "plane",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "collision" | "raycast" => Ok(StrategyKind::Collision),
            "plane" => Ok(StrategyKind::Plane),
            _ => Err(PlacementError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Inputs shared by every strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementConfig {
    pub layer_mask: u32,
    /// Nodes the ray passes through, usually the objects being moved
    pub exclude: Vec<NodeId>,
    pub plane_height: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            layer_mask: u32::MAX,
            exclude: Vec::new(),
            plane_height: 0.0,
        }
    }
}

/// Strategy-specific extras.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementDetail {
    None,
    Collision { node: Option<NodeId>, distance: f32 },
    Plane { height: f32 },
}

/// Outcome of one strategy query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementResult {
    pub hit: bool,
    pub point: Vec3,
    /// Up when nothing was hit
    pub normal: Vec3,
    pub detail: PlacementDetail,
}

impl PlacementResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec3::ZERO,
            normal: Vec3::Y,
            detail: PlacementDetail::None,
        }
    }
}

/// Converts a ray segment into a placement point.
pub trait PlacementStrategy: fmt::Debug {
    fn kind(&self) -> StrategyKind;

    /// Query along the segment from `origin` to `end`.
    fn calculate(
        &self,
        origin: Vec3,
        end: Vec3,
        geometry: &dyn GeometryQuery,
        config: &PlacementConfig,
    ) -> PlacementResult;
}

/// Holds every strategy and the active selection.
#[derive(Debug)]
pub struct PlacementStrategies {
    strategies: Vec<Box<dyn PlacementStrategy>>,
    active: usize,
}

impl Default for PlacementStrategies {
    fn default() -> Self {
        Self::new(StrategyKind::default())
    }
}

impl PlacementStrategies {
    pub fn new(active: StrategyKind) -> Self {
        let strategies: Vec<Box<dyn PlacementStrategy>> =
            vec![Box::new(CollisionStrategy), Box::new(PlaneStrategy)];
        let active = strategies
            .iter()
            .position(|s| s.kind() == active)
            .unwrap_or(0);
        Self { strategies, active }
    }

    pub fn active(&self) -> StrategyKind {
        self.strategies[self.active].kind()
    }

    /// Switch strategy. Returns false, silently, when already active.
    pub fn set_active(&mut self, kind: StrategyKind) -> bool {
        if self.active() == kind {
            return false;
        }
        match self.strategies.iter().position(|s| s.kind() == kind) {
            Some(index) => {
                self.active = index;
                log::debug!("Placement strategy set to {}", kind);
                true
            }
            None => false,
        }
    }

    pub fn set_active_by_name(&mut self, name: &str) -> Result<bool> {
        let kind = name.parse::<StrategyKind>()?;
        Ok(self.set_active(kind))
    }

    /// Advance to the next strategy and return it.
    pub fn cycle(&mut self) -> StrategyKind {
        self.active = (self.active + 1) % self.strategies.len();
        let kind = self.active();
        log::debug!("Placement strategy cycled to {}", kind);
        kind
    }

    pub fn calculate(
        &self,
        origin: Vec3,
        end: Vec3,
        geometry: &dyn GeometryQuery,
        config: &PlacementConfig,
    ) -> PlacementResult {
        self.strategies[self.active].calculate(origin, end, geometry, config)
    }

    /// Probe a strategy without making it active.
    pub fn calculate_with(
        &self,
        kind: StrategyKind,
        origin: Vec3,
        end: Vec3,
        geometry: &dyn GeometryQuery,
        config: &PlacementConfig,
    ) -> PlacementResult {
        self.strategies
            .iter()
            .find(|s| s.kind() == kind)
            .map(|s| s.calculate(origin, end, geometry, config))
            .unwrap_or_else(PlacementResult::miss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RayHit;

    /// Hits a wall at x = 5 and nothing else.
    struct Wall;

    impl GeometryQuery for Wall {
        fn cast_ray(&self, origin: Vec3, end: Vec3, _mask: u32, _exclude: &[NodeId]) -> Option<RayHit> {
            let dir = end - origin;
            if dir.x <= 0.0 {
                return None;
            }
            let t = (5.0 - origin.x) / dir.x;
            (0.0..=1.0).contains(&t).then(|| RayHit {
                point: origin + dir * t,
                normal: Vec3::NEG_X,
                node: Some(NodeId(3)),
            })
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Plane".parse::<StrategyKind>().unwrap(), StrategyKind::Plane);
        assert_eq!("collision".parse::<StrategyKind>().unwrap(), StrategyKind::Collision);
        assert!(matches!(
            "magnet".parse::<StrategyKind>(),
            Err(PlacementError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_set_active_is_idempotent() {
        let mut strategies = PlacementStrategies::new(StrategyKind::Collision);
        assert!(!strategies.set_active(StrategyKind::Collision));
        assert!(strategies.set_active(StrategyKind::Plane));
        assert!(!strategies.set_active(StrategyKind::Plane));
        assert_eq!(strategies.active(), StrategyKind::Plane);
    }

    #[test]
    fn test_set_by_name() {
        let mut strategies = PlacementStrategies::default();
        assert!(strategies.set_active_by_name("plane").unwrap());
        assert!(strategies.set_active_by_name("bogus").is_err());
        assert_eq!(strategies.active(), StrategyKind::Plane);
    }

    #[test]
    fn test_cycle_wraps() {
        let mut strategies = PlacementStrategies::default();
        assert_eq!(strategies.cycle(), StrategyKind::Plane);
        assert_eq!(strategies.cycle(), StrategyKind::Collision);
    }

    #[test]
    fn test_calculate_with_does_not_switch() {
        let strategies = PlacementStrategies::new(StrategyKind::Collision);
        let config = PlacementConfig::default();
        let origin = Vec3::new(0.0, 10.0, 0.0);
        let end = Vec3::new(10.0, -10.0, 0.0);

        let active = strategies.calculate(origin, end, &Wall, &config);
        assert!(active.hit);
        assert_eq!(active.normal, Vec3::NEG_X);

        let probe = strategies.calculate_with(StrategyKind::Plane, origin, end, &Wall, &config);
        assert!(probe.hit);
        assert_eq!(probe.normal, Vec3::Y);
        assert_eq!(strategies.active(), StrategyKind::Collision);
    }
}
