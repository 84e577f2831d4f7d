//! In-memory scene host
//!
//! A minimal [`SceneHost`] for the demo binary and for tests: an infinite
//! ground plane, a set of box nodes and a top-down orthographic camera.
//! Cursor pixels map to world X/Z at a fixed scale, so scripted input can
//! aim at exact world points with [`SimulatedScene::cursor_for`].

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};

use crate::geometry::{ray_aabb_with_normal, ray_plane, Aabb, Ray};
use crate::host::{CameraFrame, GeometryQuery, MeshDescriptor, NodeId, NodeTransform, RayHit, SceneHost};

/// Layer bit of the ground plane.
pub const GROUND_LAYER: u32 = 1;
/// Layer bit boxes are added on by default.
pub const PROP_LAYER: u32 = 1 << 1;

/// Height of the simulated camera above the ground.
pub const CAMERA_HEIGHT: f32 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SimNode {
    pub name: String,
    pub transform: NodeTransform,
    /// Local bounds, before scale, rotation and translation
    pub bounds: Aabb,
    pub layer: u32,
    pub preview: bool,
}

impl SimNode {
    /// Bounds in world space. Yaw is applied in quarter turns.
    pub fn world_bounds(&self) -> Aabb {
        let turns = (self.transform.rotation_degrees.y / 90.0).round() as i32;
        self.bounds
            .scaled(self.transform.scale)
            .rotated_quarter_turns(turns)
            .translated(self.transform.position)
    }
}

#[derive(Debug, Clone)]
pub struct SimulatedScene {
    nodes: BTreeMap<NodeId, SimNode>,
    next_id: u64,
    camera: Option<CameraFrame>,
    viewport: Option<Vec2>,
    units_per_pixel: f32,
    /// Every position the engine asked to warp the cursor to
    pub warps: Vec<Vec2>,
    /// Previews that were committed, in order
    pub committed: Vec<NodeId>,
    /// Previews that were discarded, in order
    pub discarded: Vec<NodeId>,
    /// When set, spawning a preview fails
    pub refuse_spawns: bool,
}

impl Default for SimulatedScene {
    fn default() -> Self {
        Self::new(Vec2::new(800.0, 600.0), 0.05)
    }
}

impl SimulatedScene {
    pub fn new(viewport: Vec2, units_per_pixel: f32) -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_id: 1,
            camera: Some(Self::top_down_camera(Vec2::ZERO)),
            viewport: Some(viewport),
            units_per_pixel,
            warps: Vec::new(),
            committed: Vec::new(),
            discarded: Vec::new(),
            refuse_spawns: false,
        }
    }

    /// Camera straight above `center` (world X/Z), looking down.
    pub fn top_down_camera(center: Vec2) -> CameraFrame {
        CameraFrame {
            position: Vec3::new(center.x, CAMERA_HEIGHT, center.y),
            right: Vec3::X,
            up: Vec3::NEG_Z,
            forward: Vec3::NEG_Y,
        }
    }

    pub fn set_camera(&mut self, camera: Option<CameraFrame>) {
        self.camera = camera;
    }

    pub fn set_viewport(&mut self, viewport: Option<Vec2>) {
        self.viewport = viewport;
    }

    pub fn add_box(&mut self, name: impl Into<String>, position: Vec3, bounds: Aabb) -> NodeId {
        self.insert(SimNode {
            name: name.into(),
            transform: NodeTransform::from_position(position),
            bounds,
            layer: PROP_LAYER,
            preview: false,
        })
    }

    pub fn remove_node(&mut self, node: NodeId) -> Option<SimNode> {
        self.nodes.remove(&node)
    }

    pub fn node(&self, node: NodeId) -> Option<&SimNode> {
        self.nodes.get(&node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SimNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Cursor position that projects onto `world` (its X/Z).
    ///
    /// None without a camera or viewport.
    pub fn cursor_for(&self, world: Vec3) -> Option<Vec2> {
        let camera = self.camera?;
        let viewport = self.viewport?;
        let center = viewport * 0.5;
        Some(Vec2::new(
            center.x + (world.x - camera.position.x) / self.units_per_pixel,
            center.y + (world.z - camera.position.z) / self.units_per_pixel,
        ))
    }

    fn insert(&mut self, node: SimNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }
}

impl GeometryQuery for SimulatedScene {
    fn cast_ray(&self, origin: Vec3, end: Vec3, layer_mask: u32, exclude: &[NodeId]) -> Option<RayHit> {
        let ray = Ray::from_points(origin, end);
        if !ray.is_valid() {
            return None;
        }
        let max_distance = origin.distance(end);

        let mut best: Option<(f32, RayHit)> = None;
        let mut consider = |t: f32, hit: RayHit| {
            if t >= 0.0 && t <= max_distance && best.map_or(true, |(b, _)| t < b) {
                best = Some((t, hit));
            }
        };

        if layer_mask & GROUND_LAYER != 0 {
            if let Some(t) = ray_plane(&ray, Vec3::ZERO, Vec3::Y) {
                consider(
                    t,
                    RayHit {
                        point: ray.at(t),
                        normal: Vec3::Y,
                        node: None,
                    },
                );
            }
        }

        for (id, node) in &self.nodes {
            if node.preview || node.layer & layer_mask == 0 || exclude.contains(id) {
                continue;
            }
            if let Some((t, normal)) = ray_aabb_with_normal(&ray, &node.world_bounds()) {
                consider(
                    t,
                    RayHit {
                        point: ray.at(t),
                        normal,
                        node: Some(*id),
                    },
                );
            }
        }

        best.map(|(_, hit)| hit)
    }
}

impl SceneHost for SimulatedScene {
    fn camera(&self) -> Option<CameraFrame> {
        self.camera
    }

    fn project_ray(&self, cursor: Vec2) -> Option<Ray> {
        let camera = self.camera?;
        let viewport = self.viewport?;
        let offset = (cursor - viewport * 0.5) * self.units_per_pixel;
        let origin = camera.position + camera.right * offset.x - camera.up * offset.y;
        Some(Ray::new(origin, camera.forward))
    }

    fn viewport_size(&self) -> Option<Vec2> {
        self.viewport
    }

    fn node_exists(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn node_transform(&self, node: NodeId) -> Option<NodeTransform> {
        self.nodes.get(&node).map(|n| n.transform)
    }

    fn set_node_transform(&mut self, node: NodeId, transform: &NodeTransform) -> bool {
        match self.nodes.get_mut(&node) {
            Some(n) => {
                n.transform = *transform;
                true
            }
            None => false,
        }
    }

    fn node_bounds(&self, node: NodeId) -> Option<Aabb> {
        self.nodes.get(&node).map(|n| n.bounds)
    }

    fn spawn_preview(&mut self, mesh: &MeshDescriptor) -> Option<NodeId> {
        if self.refuse_spawns {
            return None;
        }
        let id = self.insert(SimNode {
            name: mesh.name.clone(),
            transform: NodeTransform::default(),
            bounds: mesh.bounds.unwrap_or(Aabb::UNIT),
            layer: PROP_LAYER,
            preview: true,
        });
        log::debug!("Spawned preview {} for '{}'", id, mesh.name);
        Some(id)
    }

    fn commit_preview(&mut self, node: NodeId) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.preview = false;
            self.committed.push(node);
        }
    }

    fn discard_preview(&mut self, node: NodeId) {
        if self.nodes.remove(&node).is_some() {
            self.discarded.push(node);
        }
    }

    fn warp_cursor(&mut self, position: Vec2) {
        self.warps.push(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_round_trip() {
        let scene = SimulatedScene::default();
        let cursor = scene.cursor_for(Vec3::new(2.3, 0.0, 4.7)).unwrap();
        assert!((cursor - Vec2::new(446.0, 394.0)).length() < 1e-3);

        let ray = scene.project_ray(cursor).unwrap();
        assert!((ray.origin.x - 2.3).abs() < 1e-4);
        assert!((ray.origin.z - 4.7).abs() < 1e-4);
        assert_eq!(ray.direction, Vec3::NEG_Y);
    }

    #[test]
    fn test_ray_hits_box_before_ground() {
        let mut scene = SimulatedScene::default();
        let id = scene.add_box("crate", Vec3::new(0.0, 1.0, 0.0), Aabb::UNIT);
        let hit = scene
            .cast_ray(Vec3::new(0.0, 50.0, 0.0), Vec3::new(0.0, -50.0, 0.0), u32::MAX, &[])
            .unwrap();
        assert_eq!(hit.node, Some(id));
        assert!((hit.point.y - 1.5).abs() < 1e-4);
        assert_eq!(hit.normal, Vec3::Y);

        let ground = scene
            .cast_ray(Vec3::new(0.0, 50.0, 0.0), Vec3::new(0.0, -50.0, 0.0), u32::MAX, &[id])
            .unwrap();
        assert_eq!(ground.node, None);
        assert!(ground.point.y.abs() < 1e-4);
    }

    #[test]
    fn test_layer_mask_filters() {
        let mut scene = SimulatedScene::default();
        scene.add_box("crate", Vec3::ZERO, Aabb::UNIT);
        let origin = Vec3::new(0.0, 50.0, 0.0);
        let end = Vec3::new(0.0, -50.0, 0.0);
        assert!(scene.cast_ray(origin, end, 0, &[]).is_none());
        assert_eq!(scene.cast_ray(origin, end, GROUND_LAYER, &[]).unwrap().node, None);
    }

    #[test]
    fn test_previews_are_not_hit() {
        let mut scene = SimulatedScene::default();
        let preview = scene.spawn_preview(&MeshDescriptor::new("lamp")).unwrap();
        let hit = scene
            .cast_ray(Vec3::new(0.0, 50.0, 0.0), Vec3::new(0.0, -50.0, 0.0), u32::MAX, &[])
            .unwrap();
        assert_eq!(hit.node, None);

        scene.commit_preview(preview);
        assert_eq!(scene.committed, vec![preview]);
        assert!(!scene.node(preview).unwrap().preview);
    }

    #[test]
    fn test_no_camera_no_ray() {
        let mut scene = SimulatedScene::default();
        scene.set_camera(None);
        assert!(scene.project_ray(Vec2::new(10.0, 10.0)).is_none());
        assert!(scene.cursor_for(Vec3::ZERO).is_none());
    }
}
