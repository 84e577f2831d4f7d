//! Transform session: existing nodes move, rotate and scale together.
//!
//! Targets move rigidly with the pivot (their centroid at entry), rotate
//! in place by the accumulated delta, and scale relative to their own
//! pre-session scale.

use glam::Vec3;

use super::controls::{Controls, Frame, Role};
use super::StepOutcome;
use crate::config::Settings;
use crate::geometry::Aabb;
use crate::host::{NodeId, NodeTransform, SceneHost};
use crate::modal::{ModalKind, ModalState};
use crate::transform::{wrap_degrees, Axis, TransformState};

/// A node under transformation and its transform at entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetState {
    pub node: NodeId,
    pub original: NodeTransform,
}

impl TargetState {
    /// Transform for this target given the session's pivot and deltas.
    fn transformed(&self, pivot_delta: Vec3, state: &TransformState) -> NodeTransform {
        let rotation = self.original.rotation_degrees + state.rotation.degrees();
        NodeTransform {
            position: self.original.position + pivot_delta,
            rotation_degrees: Vec3::new(
                wrap_degrees(rotation.x),
                wrap_degrees(rotation.y),
                wrap_degrees(rotation.z),
            ),
            scale: state.scale.apply(self.original.scale),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformSession {
    targets: Vec<TargetState>,
    pivot_start: Vec3,
    pub(crate) controls: Controls,
}

impl TransformSession {
    /// `targets` must be non-empty.
    pub(crate) fn new(targets: Vec<TargetState>, bounds: Option<Aabb>, settings: &Settings) -> Self {
        let count = targets.len().max(1) as f32;
        let pivot_start = targets.iter().map(|t| t.original.position).sum::<Vec3>() / count;

        let mut state = TransformState::new(settings.snap.clone());
        state.position = pivot_start;
        state.base_height = pivot_start.y;

        // Edge snapping only makes sense for a single box
        let (bounds, base_scale, base_yaw) = match targets.as_slice() {
            [single] => (
                bounds,
                single.original.scale,
                single.original.rotation_degrees[Axis::Y.index()],
            ),
            _ => (None, Vec3::ONE, 0.0),
        };

        let controls = Controls::new(Role::Transforming, state, ModalState::active(ModalKind::Position))
            .with_bounds(bounds, base_scale, base_yaw);

        Self {
            targets,
            pivot_start,
            controls,
        }
    }

    pub fn targets(&self) -> &[TargetState] {
        &self.targets
    }

    pub fn pivot_start(&self) -> Vec3 {
        self.pivot_start
    }

    pub fn transform(&self) -> &TransformState {
        &self.controls.state
    }

    pub fn modal(&self) -> &ModalState {
        &self.controls.modal
    }

    /// Drop targets that no longer exist in the host scene.
    fn retain_valid(&mut self, host: &dyn SceneHost) {
        self.targets.retain(|t| {
            let alive = host.node_exists(t.node);
            if !alive {
                log::warn!("Transform target {} disappeared, dropping it", t.node);
            }
            alive
        });
    }

    pub(crate) fn step(&mut self, host: &mut dyn SceneHost, frame: &Frame<'_>) -> StepOutcome {
        self.retain_valid(host);
        if self.targets.is_empty() {
            return StepOutcome::lost();
        }

        let controls = self.controls.process(frame);
        if let Some(target) = controls.warp_to {
            host.warp_cursor(target);
        }

        self.update_position(host, frame);
        self.apply(host);

        StepOutcome {
            enter_consumed: controls.enter_consumed,
            wheel_consumed: controls.wheel_consumed,
            lost: self.targets.is_empty(),
        }
    }

    fn update_position(&mut self, host: &dyn SceneHost, frame: &Frame<'_>) {
        let fine = frame.snapshot.modifiers.fine;

        if !self.controls.position_frozen() && self.controls.constraint().is_some() {
            let ray = match (frame.camera, frame.viewport, frame.snapshot.cursor) {
                (Some(_), Some(_), Some(cursor)) => host.project_ray(cursor),
                _ => None,
            };
            let max_distance = frame.settings.modal.constraint_max_distance;
            if let Some(point) = ray
                .filter(|r| r.is_valid())
                .and_then(|r| self.controls.constrained_drag(&r, max_distance, fine))
            {
                if point != self.controls.state.position {
                    self.controls.moved = true;
                }
                self.controls.state.position = point;
                // Keep the drag in step so clearing the constraint does not jump
                self.controls.drag = point - self.pivot_start - self.controls.state.total_offset();
            }
            return;
        }

        let pivot = self.pivot_start + self.controls.drag + self.controls.state.total_offset();
        self.controls.state.position = if self.controls.moved {
            self.controls.snap_point(pivot, fine)
        } else {
            pivot
        };
    }

    /// Write every target's transform, dropping any the host rejects.
    pub(crate) fn apply(&mut self, host: &mut dyn SceneHost) {
        let delta = self.controls.state.position - self.pivot_start;
        let state = &self.controls.state;
        self.targets.retain(|t| {
            let ok = host.set_node_transform(t.node, &t.transformed(delta, state));
            if !ok {
                log::warn!("Transform target {} rejected its transform, dropping it", t.node);
            }
            ok
        });
    }

    /// Put every target back where it was at entry.
    pub(crate) fn restore(&self, host: &mut dyn SceneHost) {
        for target in &self.targets {
            if host.node_exists(target.node) {
                host.set_node_transform(target.node, &target.original);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::ScaleState;

    #[test]
    fn test_target_transform_is_relative() {
        let target = TargetState {
            node: NodeId(1),
            original: NodeTransform {
                position: Vec3::new(1.0, 0.0, 1.0),
                rotation_degrees: Vec3::new(0.0, 350.0, 0.0),
                scale: Vec3::new(2.0, 1.0, 1.0),
            },
        };
        let mut state = TransformState::new(Default::default());
        state.rotation.rotate(Axis::Y, 20.0);
        state.scale = {
            let mut s = ScaleState::new();
            s.set_uniform(1.5);
            s
        };
        let t = target.transformed(Vec3::new(0.0, 0.0, 3.0), &state);
        assert_eq!(t.position, Vec3::new(1.0, 0.0, 4.0));
        assert!((t.rotation_degrees.y - 10.0).abs() < 1e-4);
        assert_eq!(t.scale, Vec3::new(3.0, 1.5, 1.5));
    }

    #[test]
    fn test_pivot_is_centroid() {
        let targets = vec![
            TargetState {
                node: NodeId(1),
                original: NodeTransform::from_position(Vec3::new(0.0, 0.0, 0.0)),
            },
            TargetState {
                node: NodeId(2),
                original: NodeTransform::from_position(Vec3::new(4.0, 2.0, 0.0)),
            },
        ];
        let session = TransformSession::new(targets, None, &Settings::default());
        assert_eq!(session.pivot_start(), Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(session.transform().position, Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(session.modal().kind(), Some(ModalKind::Position));
    }
}
