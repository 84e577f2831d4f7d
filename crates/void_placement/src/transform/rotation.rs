//! Per-axis rotation accumulator.

use glam::Vec3;

use super::Axis;

/// Normalize an angle in degrees into [0, 360).
#[inline]
pub fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Three independent degree accumulators, always wrapped to [0, 360).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationState {
    angles: Vec3,
    last_axis: Axis,
}

impl Default for RotationState {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationState {
    pub fn new() -> Self {
        Self {
            angles: Vec3::ZERO,
            last_axis: Axis::Y,
        }
    }

    /// Rotate one axis by a signed amount and remember it as last used.
    pub fn rotate(&mut self, axis: Axis, degrees: f32) {
        if !degrees.is_finite() {
            return;
        }
        let i = axis.index();
        self.angles[i] = wrap_degrees(self.angles[i] + degrees);
        self.last_axis = axis;
    }

    /// Rotate whichever axis was touched most recently.
    pub fn rotate_last(&mut self, degrees: f32) {
        self.rotate(self.last_axis, degrees);
    }

    /// Set one axis outright.
    pub fn set(&mut self, axis: Axis, degrees: f32) {
        if !degrees.is_finite() {
            return;
        }
        self.angles[axis.index()] = wrap_degrees(degrees);
        self.last_axis = axis;
    }

    pub fn get(&self, axis: Axis) -> f32 {
        self.angles[axis.index()]
    }

    /// All three angles in degrees.
    pub fn degrees(&self) -> Vec3 {
        self.angles
    }

    pub fn last_axis(&self) -> Axis {
        self.last_axis
    }

    pub fn set_last_axis(&mut self, axis: Axis) {
        self.last_axis = axis;
    }

    /// Zero all three axes.
    pub fn reset(&mut self) {
        self.angles = Vec3::ZERO;
    }

    pub fn is_zero(&self) -> bool {
        self.angles == Vec3::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(-15.0), 345.0);
        assert_eq!(wrap_degrees(725.0), 5.0);
        assert!(wrap_degrees(-1e-9) < 360.0);
    }

    #[test]
    fn test_full_turn_returns_home() {
        let mut rotation = RotationState::new();
        rotation.rotate(Axis::X, 37.0);
        for _ in 0..24 {
            rotation.rotate(Axis::Y, 15.0);
        }
        for _ in 0..7 {
            rotation.rotate(Axis::Z, -51.428_57);
        }
        assert_abs_diff_eq!(rotation.get(Axis::X), 37.0, epsilon = 1e-3);
        assert_abs_diff_eq!(rotation.get(Axis::Y), 0.0, epsilon = 1e-3);
        let z = rotation.get(Axis::Z);
        assert!(z < 1e-3 || z > 360.0 - 1e-3, "z = {}", z);
    }

    #[test]
    fn test_always_in_range() {
        let mut rotation = RotationState::new();
        for i in 0..500 {
            rotation.rotate(Axis::Y, (i as f32) * -7.3);
            let y = rotation.get(Axis::Y);
            assert!((0.0..360.0).contains(&y));
        }
    }

    #[test]
    fn test_last_axis_tracking() {
        let mut rotation = RotationState::new();
        assert_eq!(rotation.last_axis(), Axis::Y);
        rotation.rotate(Axis::Z, 10.0);
        rotation.rotate_last(5.0);
        assert_eq!(rotation.get(Axis::Z), 15.0);
        rotation.reset();
        assert!(rotation.is_zero());
        assert_eq!(rotation.last_axis(), Axis::Z);
    }
}
