//! Per-session transform state and what survives between sessions.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{RotationState, ScaleState};
use crate::snap::SnapConfig;

/// Which parts of the transform are reset when a session ends.
///
/// All flags default to off, so the last transform carries into the
/// next session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitResetPolicy {
    pub reset_height: bool,
    pub reset_position: bool,
    pub reset_rotation: bool,
    pub reset_scale: bool,
}

/// Transform adjustments carried from one placement session to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CarriedTransform {
    pub height_offset: f32,
    pub manual_offset: Vec3,
    pub rotation: RotationState,
    pub scale: ScaleState,
}

impl CarriedTransform {
    /// Clear whatever the policy asks for.
    pub fn apply_exit_policy(&mut self, policy: &ExitResetPolicy) {
        if policy.reset_height {
            self.height_offset = 0.0;
        }
        if policy.reset_position {
            self.manual_offset = Vec3::ZERO;
        }
        if policy.reset_rotation {
            self.rotation.reset();
        }
        if policy.reset_scale {
            self.scale.reset();
        }
    }
}

/// Working transform of the active session.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformState {
    /// Last computed (snapped) world position of the pivot
    pub position: Vec3,
    /// Height of the surface or pivot the position is built from
    pub base_height: f32,
    /// Accumulated height keys
    pub height_offset: f32,
    /// Accumulated position nudges
    pub manual_offset: Vec3,
    pub rotation: RotationState,
    pub scale: ScaleState,
    pub snap: SnapConfig,
    /// Normal of the surface under the cursor, up when nothing was hit
    pub surface_normal: Vec3,
}

impl TransformState {
    pub fn new(snap: SnapConfig) -> Self {
        Self {
            position: Vec3::ZERO,
            base_height: 0.0,
            height_offset: 0.0,
            manual_offset: Vec3::ZERO,
            rotation: RotationState::new(),
            scale: ScaleState::new(),
            snap,
            surface_normal: Vec3::Y,
        }
    }

    /// Start from adjustments left by a previous session.
    pub fn from_carried(carried: &CarriedTransform, snap: SnapConfig) -> Self {
        Self {
            height_offset: carried.height_offset,
            manual_offset: carried.manual_offset,
            rotation: carried.rotation,
            scale: carried.scale,
            ..Self::new(snap)
        }
    }

    pub fn carried(&self) -> CarriedTransform {
        CarriedTransform {
            height_offset: self.height_offset,
            manual_offset: self.manual_offset,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    /// Offset added on top of the surface or pivot point.
    pub fn total_offset(&self) -> Vec3 {
        self.manual_offset + Vec3::Y * self.height_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Axis;

    fn carried() -> CarriedTransform {
        let mut carried = CarriedTransform {
            height_offset: 2.0,
            manual_offset: Vec3::new(1.0, 0.0, -1.0),
            ..Default::default()
        };
        carried.rotation.rotate(Axis::Y, 90.0);
        carried.scale.set_uniform(3.0);
        carried
    }

    #[test]
    fn test_default_policy_keeps_everything() {
        let mut c = carried();
        c.apply_exit_policy(&ExitResetPolicy::default());
        assert_eq!(c, carried());
    }

    #[test]
    fn test_policy_flags_are_independent() {
        let mut c = carried();
        c.apply_exit_policy(&ExitResetPolicy {
            reset_rotation: true,
            ..Default::default()
        });
        assert!(c.rotation.is_zero());
        assert_eq!(c.scale.uniform(), 3.0);
        assert_eq!(c.height_offset, 2.0);

        let mut c = carried();
        c.apply_exit_policy(&ExitResetPolicy {
            reset_height: true,
            reset_scale: true,
            ..Default::default()
        });
        assert_eq!(c.height_offset, 0.0);
        assert!(c.scale.is_identity());
        assert_eq!(c.manual_offset, Vec3::new(1.0, 0.0, -1.0));
    }

    #[test]
    fn test_state_round_trips_carried() {
        let state = TransformState::from_carried(&carried(), SnapConfig::default());
        assert_eq!(state.carried(), carried());
        assert_eq!(state.total_offset(), Vec3::new(1.0, 2.0, -1.0));
        assert_eq!(state.surface_normal, Vec3::Y);
    }
}
