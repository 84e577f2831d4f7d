//! Host-facing types and traits.
//!
//! The engine never owns the scene. Everything it needs from the outside
//! world (camera, ray queries, target nodes, preview instances) goes
//! through [`SceneHost`], and everything it produces is written back the
//! same way.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::geometry::{Aabb, Ray};

/// Handle to a node in the host scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Position, Euler rotation (degrees) and scale of a host node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeTransform {
    pub position: Vec3,
    pub rotation_degrees: Vec3,
    pub scale: Vec3,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation_degrees: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl NodeTransform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Camera placement for the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFrame {
    pub position: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

impl CameraFrame {
    /// Camera right vector flattened onto the ground plane.
    pub fn flat_right(&self) -> Vec3 {
        Vec3::new(self.right.x, 0.0, self.right.z).normalize_or_zero()
    }

    /// Camera forward vector flattened onto the ground plane.
    ///
    /// Falls back to screen-up when looking straight down.
    pub fn flat_forward(&self) -> Vec3 {
        let flat = Vec3::new(self.forward.x, 0.0, self.forward.z);
        if flat.length_squared() > 1e-6 {
            flat.normalize()
        } else {
            Vec3::new(self.up.x, 0.0, self.up.z).normalize_or_zero()
        }
    }
}

/// Result of a geometry ray query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Hit point in world space
    pub point: Vec3,
    /// Surface normal at hit point
    pub normal: Vec3,
    /// Node that was hit, when the host can tell
    pub node: Option<NodeId>,
}

/// What to place: the host resolves `name` to an asset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshDescriptor {
    pub name: String,
    /// Local bounds; queried from the preview node when absent
    pub bounds: Option<Aabb>,
}

impl MeshDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: None,
        }
    }

    pub fn with_bounds(mut self, bounds: Aabb) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

/// Ray-intersection query against scene geometry.
pub trait GeometryQuery {
    /// Cast a segment from `origin` to `end` against geometry on
    /// `layer_mask`, ignoring any node in `exclude`.
    fn cast_ray(
        &self,
        origin: Vec3,
        end: Vec3,
        layer_mask: u32,
        exclude: &[NodeId],
    ) -> Option<RayHit>;
}

/// Everything the engine needs from the host scene.
pub trait SceneHost: GeometryQuery {
    /// Active camera, or None when no viewport camera exists this tick.
    fn camera(&self) -> Option<CameraFrame>;

    /// World ray through a viewport-local cursor position.
    fn project_ray(&self, cursor: Vec2) -> Option<Ray>;

    /// Viewport size in pixels.
    fn viewport_size(&self) -> Option<Vec2>;

    /// Whether the node still exists.
    fn node_exists(&self, node: NodeId) -> bool;

    fn node_transform(&self, node: NodeId) -> Option<NodeTransform>;

    /// Write a transform. Returns false when the node is gone.
    fn set_node_transform(&mut self, node: NodeId, transform: &NodeTransform) -> bool;

    /// Local-space bounds of the node's geometry.
    fn node_bounds(&self, node: NodeId) -> Option<Aabb>;

    /// Create a preview instance for a placement session.
    fn spawn_preview(&mut self, mesh: &MeshDescriptor) -> Option<NodeId>;

    /// Turn the preview into a real scene instance.
    fn commit_preview(&mut self, node: NodeId);

    /// Remove the preview without placing anything.
    fn discard_preview(&mut self, node: NodeId);

    /// Move the OS cursor to a viewport-local position.
    fn warp_cursor(&mut self, _position: Vec2) {}
}

/// A host borrowed as a plain geometry query.
pub struct HostGeometry<'a>(pub &'a dyn SceneHost);

impl GeometryQuery for HostGeometry<'_> {
    fn cast_ray(&self, origin: Vec3, end: Vec3, layer_mask: u32, exclude: &[NodeId]) -> Option<RayHit> {
        self.0.cast_ray(origin, end, layer_mask, exclude)
    }
}
