//! Axis constraints for modal position control.

use glam::Vec3;

use crate::geometry::{closest_line_param_to_ray, ray_plane, Ray};
use crate::transform::Axis;

/// Set of constrained world axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AxisSet {
    x: bool,
    y: bool,
    z: bool,
}

impl AxisSet {
    pub const NONE: Self = Self { x: false, y: false, z: false };
    pub const ALL: Self = Self { x: true, y: true, z: true };

    pub fn single(axis: Axis) -> Self {
        Self::NONE.with(axis)
    }

    /// The two axes spanning the plane whose normal is `normal`.
    pub fn plane(normal: Axis) -> Self {
        let mut set = Self::ALL;
        set.set(normal, false);
        set
    }

    pub fn with(mut self, axis: Axis) -> Self {
        self.set(axis, true);
        self
    }

    pub fn set(&mut self, axis: Axis, on: bool) {
        match axis {
            Axis::X => self.x = on,
            Axis::Y => self.y = on,
            Axis::Z => self.z = on,
        }
    }

    pub fn contains(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn count(&self) -> usize {
        self.x as usize + self.y as usize + self.z as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Axis> + '_ {
        Axis::ALL.into_iter().filter(move |a| self.contains(*a))
    }

    /// The only constrained axis.
    pub fn single_axis(&self) -> Option<Axis> {
        if self.count() == 1 {
            self.iter().next()
        } else {
            None
        }
    }

    /// The axis left free by a two-axis constraint.
    pub fn free_axis(&self) -> Option<Axis> {
        if self.count() == 2 {
            Axis::ALL.into_iter().find(|a| !self.contains(*a))
        } else {
            None
        }
    }
}

impl std::fmt::Display for AxisSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for axis in self.iter() {
            write!(f, "{}", axis)?;
        }
        Ok(())
    }
}

/// Active constraint: which axes, the pivot captured at activation, and when.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisConstraint {
    axes: AxisSet,
    origin: Vec3,
    activated_at: f64,
    /// Where the cursor ray first met the line or plane
    anchor: Option<Vec3>,
}

impl AxisConstraint {
    pub fn new(axes: AxisSet, origin: Vec3, now: f64) -> Self {
        Self {
            axes,
            origin,
            activated_at: now,
            anchor: None,
        }
    }

    pub fn axes(&self) -> AxisSet {
        self.axes
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn activated_at(&self) -> f64 {
        self.activated_at
    }

    /// Apply an axis key tap to `current`.
    ///
    /// A plain tap constrains to the axis, a tap with reverse held
    /// constrains to the plane excluding it. Repeating the same request
    /// clears the constraint; a different request replaces it and keeps
    /// the original pivot.
    pub fn toggle(
        current: Option<&AxisConstraint>,
        axis: Axis,
        plane: bool,
        origin: Vec3,
        now: f64,
    ) -> Option<AxisConstraint> {
        let requested = if plane {
            AxisSet::plane(axis)
        } else {
            AxisSet::single(axis)
        };
        match current {
            Some(c) if c.axes == requested => None,
            Some(c) => Some(AxisConstraint::new(requested, c.origin, now)),
            None => Some(AxisConstraint::new(requested, origin, now)),
        }
    }

    /// Point where `ray` meets the constrained line or plane through the
    /// pivot. None when the ray is parallel to it, the plane is behind the
    /// camera, or every axis is constrained.
    fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        if !ray.is_valid() {
            return None;
        }

        if let Some(axis) = self.axes.single_axis() {
            let dir = axis.unit();
            let s = closest_line_param_to_ray(ray, self.origin, dir).filter(|s| s.is_finite())?;
            return Some(self.origin + dir * s);
        }

        let free = self.axes.free_axis()?;
        let t = ray_plane(ray, self.origin, free.unit())?;
        Some(ray.at(t))
    }

    /// Pivot moved by `offset`, clamped to `max_distance` and kept on the
    /// line or plane.
    fn offset_point(&self, offset: Vec3, max_distance: f32) -> Vec3 {
        // Pinning also keeps float error from drifting off the plane
        self.pin(self.origin + offset.clamp_length_max(max_distance))
    }

    /// Project a cursor ray onto the constrained line or plane.
    ///
    /// Returns the pivot when the projection is degenerate (ray parallel to
    /// the line or plane, plane behind the camera, all axes constrained).
    /// Results are clamped to `max_distance` from the pivot.
    pub fn project(&self, ray: &Ray, max_distance: f32) -> Vec3 {
        match self.intersect(ray) {
            Some(point) => self.offset_point(point - self.origin, max_distance),
            None => self.origin,
        }
    }

    /// Move the pivot by how far the cursor ray's projection has travelled
    /// since the first call after activation, so activation itself never
    /// moves anything. None when the projection is degenerate.
    pub fn drag(&mut self, ray: &Ray, max_distance: f32) -> Option<Vec3> {
        let point = self.intersect(ray)?;
        let anchor = *self.anchor.get_or_insert(point);
        Some(self.offset_point(point - anchor, max_distance))
    }

    /// Reset every unconstrained coordinate of `point` to the pivot.
    pub fn pin(&self, point: Vec3) -> Vec3 {
        let mut out = point;
        for axis in Axis::ALL {
            if !self.axes.contains(axis) {
                out[axis.index()] = self.origin[axis.index()];
            }
        }
        out
    }
}
