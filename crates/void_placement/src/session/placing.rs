//! Placement session: a preview instance follows the cursor over the scene.

use glam::Vec3;

use super::controls::{Controls, Frame, Role};
use super::StepOutcome;
use crate::config::Settings;
use crate::geometry::{ray_plane, Aabb};
use crate::host::{HostGeometry, MeshDescriptor, NodeId, NodeTransform, SceneHost};
use crate::input::Action;
use crate::modal::ModalState;
use crate::placement::{PlacementConfig, PlacementStrategies};
use crate::transform::{CarriedTransform, TransformState};

/// Length of the cursor ray segment handed to strategies.
pub const RAY_LENGTH: f32 = 10_000.0;

#[derive(Debug, Clone)]
pub struct PlacingSession {
    preview: NodeId,
    mesh: MeshDescriptor,
    pub(crate) controls: Controls,
    /// Last point under the cursor, before offsets and snapping
    surface_point: Option<Vec3>,
}

impl PlacingSession {
    pub(crate) fn new(
        preview: NodeId,
        mesh: MeshDescriptor,
        bounds: Option<Aabb>,
        carried: &CarriedTransform,
        settings: &Settings,
    ) -> Self {
        let state = TransformState::from_carried(carried, settings.snap.clone());
        let controls = Controls::new(Role::Placing, state, ModalState::Idle).with_bounds(bounds, Vec3::ONE, 0.0);
        Self {
            preview,
            mesh,
            controls,
            surface_point: None,
        }
    }

    pub fn preview(&self) -> NodeId {
        self.preview
    }

    pub fn mesh(&self) -> &MeshDescriptor {
        &self.mesh
    }

    pub fn transform(&self) -> &TransformState {
        &self.controls.state
    }

    pub fn modal(&self) -> &ModalState {
        &self.controls.modal
    }

    pub fn surface_point(&self) -> Option<Vec3> {
        self.surface_point
    }

    pub(crate) fn step(
        &mut self,
        host: &mut dyn SceneHost,
        frame: &Frame<'_>,
        strategies: &mut PlacementStrategies,
    ) -> StepOutcome {
        if !host.node_exists(self.preview) {
            log::warn!("Placement preview {} disappeared", self.preview);
            return StepOutcome::lost();
        }

        if frame.snapshot.just_pressed(Action::CycleStrategy) {
            strategies.cycle();
        }

        let controls = self.controls.process(frame);
        if let Some(target) = controls.warp_to {
            host.warp_cursor(target);
        }

        self.update_position(host, frame, strategies);

        if !self.write(host) {
            log::warn!("Placement preview {} rejected its transform", self.preview);
            return StepOutcome::lost();
        }

        StepOutcome {
            enter_consumed: controls.enter_consumed,
            wheel_consumed: controls.wheel_consumed,
            lost: false,
        }
    }

    fn update_position(&mut self, host: &dyn SceneHost, frame: &Frame<'_>, strategies: &PlacementStrategies) {
        let fine = frame.snapshot.modifiers.fine;

        if !self.controls.position_frozen() {
            // Without a camera, viewport and cursor nothing moves this tick
            let ray = match (frame.camera, frame.viewport, frame.snapshot.cursor) {
                (Some(_), Some(_), Some(cursor)) => host.project_ray(cursor),
                _ => None,
            };

            if let Some(ray) = ray.filter(|r| r.is_valid()) {
                let max_distance = frame.settings.modal.constraint_max_distance;
                if let Some(point) = self.controls.constrained_point(&ray, max_distance, fine) {
                    self.controls.state.position = point;
                    return;
                }

                let config = PlacementConfig {
                    layer_mask: frame.settings.placement.layer_mask,
                    exclude: vec![self.preview],
                    plane_height: frame.settings.placement.plane_height,
                };
                let end = ray.at(RAY_LENGTH);
                let result = strategies.calculate(ray.origin, end, &HostGeometry(host), &config);

                if result.hit {
                    self.surface_point = Some(result.point);
                    self.controls.state.base_height = result.point.y;
                    self.controls.state.surface_normal = result.normal;
                } else {
                    // Fall back to the last surface height; parallel rays hold position
                    let base = Vec3::new(0.0, self.controls.state.base_height, 0.0);
                    if let Some(t) = ray_plane(&ray, base, Vec3::Y) {
                        self.surface_point = Some(ray.at(t));
                        self.controls.state.surface_normal = Vec3::Y;
                    }
                }
            }
        }

        if self.controls.constraint().is_some() {
            return;
        }
        if let Some(surface) = self.surface_point {
            let state = &self.controls.state;
            let point = surface + state.total_offset();
            self.controls.state.position = self.controls.snap_point(point, fine);
        }
    }

    /// Push the current transform to the preview. False when the node is gone.
    pub(crate) fn write(&self, host: &mut dyn SceneHost) -> bool {
        let state = &self.controls.state;
        let transform = NodeTransform {
            position: state.position,
            rotation_degrees: state.rotation.degrees(),
            scale: state.scale.apply(Vec3::ONE),
        };
        host.set_node_transform(self.preview, &transform)
    }
}
