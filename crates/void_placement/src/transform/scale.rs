//! Uniform and per-axis scale multiplier.

use glam::Vec3;

use super::Axis;

/// Floor for every scale component.
pub const MIN_SCALE: f32 = 0.01;

#[inline]
fn clamp_scale(value: f32) -> f32 {
    if value.is_finite() {
        value.max(MIN_SCALE)
    } else {
        MIN_SCALE
    }
}

/// Scale multiplier applied on top of a base scale.
///
/// `uniform` mirrors the mean of `per_axis`; both are floor-clamped at
/// [`MIN_SCALE`] so geometry never collapses or inverts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleState {
    uniform: f32,
    per_axis: Vec3,
}

impl Default for ScaleState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScaleState {
    pub fn new() -> Self {
        Self {
            uniform: 1.0,
            per_axis: Vec3::ONE,
        }
    }

    pub fn uniform(&self) -> f32 {
        self.uniform
    }

    pub fn vector(&self) -> Vec3 {
        self.per_axis
    }

    /// Set every axis to the same multiplier.
    pub fn set_uniform(&mut self, value: f32) {
        let value = clamp_scale(value);
        self.uniform = value;
        self.per_axis = Vec3::splat(value);
    }

    /// Set the per-axis multiplier; the uniform value becomes their mean.
    pub fn set_vector(&mut self, value: Vec3) {
        self.per_axis = Vec3::new(
            clamp_scale(value.x),
            clamp_scale(value.y),
            clamp_scale(value.z),
        );
        self.uniform = (self.per_axis.x + self.per_axis.y + self.per_axis.z) / 3.0;
    }

    pub fn set_axis(&mut self, axis: Axis, value: f32) {
        let mut vector = self.per_axis;
        vector[axis.index()] = value;
        self.set_vector(vector);
    }

    /// Add a signed step to the uniform multiplier.
    pub fn adjust_uniform(&mut self, delta: f32) {
        self.set_uniform(self.uniform + delta);
    }

    /// Add a signed step to one axis.
    pub fn adjust_axis(&mut self, axis: Axis, delta: f32) {
        self.set_axis(axis, self.per_axis[axis.index()] + delta);
    }

    /// Multiply every axis by a factor.
    pub fn multiply(&mut self, factor: f32) {
        self.set_vector(self.per_axis * factor);
    }

    /// Final scale for a node: component-wise `base * multiplier`.
    pub fn apply(&self, base: Vec3) -> Vec3 {
        base * self.per_axis
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_identity(&self) -> bool {
        self.per_axis == Vec3::ONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_sets_all_axes() {
        let mut scale = ScaleState::new();
        scale.set_uniform(2.5);
        assert_eq!(scale.vector(), Vec3::splat(2.5));
    }

    #[test]
    fn test_vector_updates_mean() {
        let mut scale = ScaleState::new();
        scale.set_vector(Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(scale.uniform(), 2.0);
    }

    #[test]
    fn test_never_below_floor() {
        let mut scale = ScaleState::new();
        for _ in 0..10_000 {
            scale.adjust_uniform(-0.5);
        }
        assert!(scale.uniform() >= MIN_SCALE);

        scale.multiply(-3.0);
        assert!(scale.vector().min_element() >= MIN_SCALE);

        scale.adjust_axis(Axis::Z, -100.0);
        assert!(scale.vector().z >= MIN_SCALE);

        scale.multiply(f32::NAN);
        assert!(scale.vector().min_element() >= MIN_SCALE);

        scale.set_uniform(0.0);
        assert_eq!(scale.uniform(), MIN_SCALE);
    }

    #[test]
    fn test_apply_is_relative_to_base() {
        let mut scale = ScaleState::new();
        scale.set_vector(Vec3::new(2.0, 1.0, 0.5));
        assert_eq!(scale.apply(Vec3::new(3.0, 3.0, 4.0)), Vec3::new(6.0, 3.0, 2.0));
        assert_eq!(scale.apply(Vec3::ONE), Vec3::new(2.0, 1.0, 0.5));
    }
}
