//! Ray and bounding-box geometry used by placement and constraints
//!
//! Provides the handful of intersection tests the engine needs:
//! - Ray vs. plane
//! - Ray vs. AABB (slab method, with face normal)
//! - Closest point on an infinite line to a ray

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Below this |cos| a ray is treated as parallel to a plane or line.
pub const PARALLEL_EPSILON: f32 = 1e-4;

/// 3D ray for placement queries
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Ray origin point
    pub origin: Vec3,
    /// Ray direction (normalized, or zero for a degenerate ray)
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray with normalized direction
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Create a ray from two points
    #[inline]
    pub fn from_points(start: Vec3, end: Vec3) -> Self {
        Self::new(start, end - start)
    }

    /// Get a point at distance t along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Check if the ray direction is valid (non-zero length)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.direction.length_squared() > 1e-10
    }
}

/// Axis-Aligned Bounding Box
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Unit cube centred on the origin
    pub const UNIT: Self = Self {
        min: Vec3::splat(-0.5),
        max: Vec3::splat(0.5),
    };

    /// Create from min and max points
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Get the center point
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size (full extents)
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if the AABB is valid (min <= max)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }

    /// Move the box by an offset
    #[inline]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Scale the box about the local origin, keeping min <= max
    pub fn scaled(&self, scale: Vec3) -> Self {
        let a = self.min * scale;
        let b = self.max * scale;
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Rotate the box about the local Y axis by whole quarter turns.
    ///
    /// Positive turns follow the right-handed convention
    /// (x' = z, z' = -x for one turn).
    pub fn rotated_quarter_turns(&self, turns: i32) -> Self {
        let (min, max) = (self.min, self.max);
        match turns.rem_euclid(4) {
            1 => Self::new(
                Vec3::new(min.z, min.y, -max.x),
                Vec3::new(max.z, max.y, -min.x),
            ),
            2 => Self::new(
                Vec3::new(-max.x, min.y, -max.z),
                Vec3::new(-min.x, max.y, -min.z),
            ),
            3 => Self::new(
                Vec3::new(-max.z, min.y, min.x),
                Vec3::new(-min.z, max.y, max.x),
            ),
            _ => *self,
        }
    }

    /// Check if a point is inside
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Ray-Plane intersection
///
/// Plane is defined by a point on the plane and a normal.
/// Returns the distance to intersection, or None if the ray is parallel
/// to the plane or the plane lies behind the ray origin.
pub fn ray_plane(ray: &Ray, plane_point: Vec3, plane_normal: Vec3) -> Option<f32> {
    let denom = plane_normal.dot(ray.direction);

    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = (plane_point - ray.origin).dot(plane_normal) / denom;

    if t >= 0.0 {
        Some(t)
    } else {
        None
    }
}

/// Ray-AABB intersection with the normal of the face that was hit
pub fn ray_aabb_with_normal(ray: &Ray, aabb: &Aabb) -> Option<(f32, Vec3)> {
    let inv_dir = ray.direction.recip();

    let t1 = (aabb.min - ray.origin) * inv_dir;
    let t2 = (aabb.max - ray.origin) * inv_dir;

    let tmin = t1.min(t2).max_element();
    let tmax = t1.max(t2).min_element();

    // tmax < 0: box is behind the origin. tmin > tmax: miss.
    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    let t = if tmin < 0.0 { tmax } else { tmin };
    let point = ray.at(t);

    let epsilon = 1e-4;
    let normal = if (point.x - aabb.min.x).abs() < epsilon {
        Vec3::NEG_X
    } else if (point.x - aabb.max.x).abs() < epsilon {
        Vec3::X
    } else if (point.y - aabb.min.y).abs() < epsilon {
        Vec3::NEG_Y
    } else if (point.y - aabb.max.y).abs() < epsilon {
        Vec3::Y
    } else if (point.z - aabb.min.z).abs() < epsilon {
        Vec3::NEG_Z
    } else {
        Vec3::Z
    };

    Some((t, normal))
}

/// Parameter along `line_dir` of the point on the line closest to the ray.
///
/// `line_dir` must be normalized. Returns None when the ray and line are
/// (nearly) parallel, where the closest point is not unique.
pub fn closest_line_param_to_ray(ray: &Ray, line_origin: Vec3, line_dir: Vec3) -> Option<f32> {
    let b = line_dir.dot(ray.direction);
    let denom = 1.0 - b * b;
    if denom < PARALLEL_EPSILON {
        return None;
    }

    let w0 = line_origin - ray.origin;
    let d = line_dir.dot(w0);
    let e = ray.direction.dot(w0);

    Some((b * e - d) / denom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_ray_plane_hit_and_parallel() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y);
        let t = ray_plane(&ray, Vec3::ZERO, Vec3::Y).unwrap();
        assert_abs_diff_eq!(t, 10.0, epsilon = 1e-5);

        let flat = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert!(ray_plane(&flat, Vec3::ZERO, Vec3::Y).is_none());

        let away = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        assert!(ray_plane(&away, Vec3::ZERO, Vec3::Y).is_none());
    }

    #[test]
    fn test_ray_aabb_top_face() {
        let aabb = Aabb::new(Vec3::NEG_ONE, Vec3::ONE);
        let ray = Ray::new(Vec3::new(0.2, 5.0, -0.3), Vec3::NEG_Y);
        let (t, normal) = ray_aabb_with_normal(&ray, &aabb).unwrap();
        assert_abs_diff_eq!(t, 4.0, epsilon = 1e-5);
        assert_eq!(normal, Vec3::Y);

        let miss = Ray::new(Vec3::new(3.0, 5.0, 0.0), Vec3::NEG_Y);
        assert!(ray_aabb_with_normal(&miss, &aabb).is_none());
    }

    #[test]
    fn test_closest_line_param() {
        // Line along X through origin, ray pointing down at x = 3
        let ray = Ray::new(Vec3::new(3.0, 5.0, 1.0), Vec3::new(0.0, -1.0, -0.2));
        let s = closest_line_param_to_ray(&ray, Vec3::ZERO, Vec3::X).unwrap();
        assert_abs_diff_eq!(s, 3.0, epsilon = 1e-4);

        let parallel = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert!(closest_line_param_to_ray(&parallel, Vec3::ZERO, Vec3::X).is_none());
    }

    #[test]
    fn test_quarter_turns_swap_extents() {
        let aabb = Aabb::new(Vec3::new(-1.0, 0.0, -0.25), Vec3::new(1.0, 2.0, 0.25));
        let turned = aabb.rotated_quarter_turns(1);
        assert_eq!(turned.size(), Vec3::new(0.5, 2.0, 2.0));
        assert_eq!(aabb.rotated_quarter_turns(4), aabb);
        assert_eq!(aabb.rotated_quarter_turns(-1), aabb.rotated_quarter_turns(3));
    }

    #[test]
    fn test_scaled_keeps_order() {
        let aabb = Aabb::UNIT.scaled(Vec3::new(2.0, -1.0, 1.0));
        assert!(aabb.is_valid());
        assert_eq!(aabb.size(), Vec3::new(2.0, 1.0, 1.0));
    }
}
