//! Grid snapping for placement positions.
//!
//! Two modes:
//! - **Pivot**: round the object's origin to the grid.
//! - **Edge**: pull whichever bounding-box face is closest onto the grid,
//!   so objects whose pivot is not on a face still line up with the grid.
//!
//! Y snapping is independent of horizontal snapping and always aligns the
//! bottom of the box in edge mode.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::geometry::Aabb;

/// How positions are aligned to the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapMode {
    #[default]
    Pivot,
    Edge,
}

/// Snap configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Snap X and Z
    pub enabled: bool,
    pub mode: SnapMode,
    /// Horizontal grid step
    pub step: f32,
    /// Snap Y
    pub y_enabled: bool,
    /// Vertical grid step
    pub y_step: f32,
    /// World-space grid origin
    pub offset: Vec3,
    /// Halve every step while the fine modifier is held
    pub half_step_on_fine: bool,
    /// Extents below this always snap their minimum edge
    pub thin_threshold: f32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: SnapMode::Pivot,
            step: 1.0,
            y_enabled: false,
            y_step: 1.0,
            offset: Vec3::ZERO,
            half_step_on_fine: true,
            thin_threshold: 0.01,
        }
    }
}

impl SnapConfig {
    /// Steps in effect this tick, as (horizontal, vertical).
    pub fn effective_steps(&self, fine_held: bool) -> (f32, f32) {
        if fine_held && self.half_step_on_fine {
            (self.step * 0.5, self.y_step * 0.5)
        } else {
            (self.step, self.y_step)
        }
    }
}

/// Round `value` to the nearest multiple of `step` measured from `offset`.
#[inline]
pub fn snap_to_grid(value: f32, step: f32, offset: f32) -> f32 {
    if step > 0.0 && step.is_finite() {
        ((value - offset) / step).round() * step + offset
    } else {
        value
    }
}

/// Move `pivot` so the closer of its two box edges lands on the grid.
fn snap_edges(pivot: f32, min: f32, max: f32, step: f32, offset: f32, thin: f32) -> f32 {
    let min_edge = pivot + min;
    let min_delta = snap_to_grid(min_edge, step, offset) - min_edge;

    // Thin boxes would flip between edges every tick
    if max - min < thin {
        return pivot + min_delta;
    }

    let max_edge = pivot + max;
    let max_delta = snap_to_grid(max_edge, step, offset) - max_edge;

    if min_delta.abs() <= max_delta.abs() {
        pivot + min_delta
    } else {
        pivot + max_delta
    }
}

/// Snap a world point.
///
/// `bounds` is the object's local box (already scaled and turned); edge
/// mode falls back to pivot mode without one.
pub fn snap(point: Vec3, bounds: Option<&Aabb>, config: &SnapConfig, fine_held: bool) -> Vec3 {
    let (step, y_step) = config.effective_steps(fine_held);
    let offset = config.offset;
    let mut out = point;

    let edge_bounds = match config.mode {
        SnapMode::Edge => bounds.filter(|b| b.is_valid()),
        SnapMode::Pivot => None,
    };

    if config.enabled {
        match edge_bounds {
            Some(b) => {
                out.x = snap_edges(point.x, b.min.x, b.max.x, step, offset.x, config.thin_threshold);
                out.z = snap_edges(point.z, b.min.z, b.max.z, step, offset.z, config.thin_threshold);
            }
            None => {
                out.x = snap_to_grid(point.x, step, offset.x);
                out.z = snap_to_grid(point.z, step, offset.z);
            }
        }
    }

    if config.y_enabled {
        out.y = match edge_bounds {
            Some(b) => {
                let bottom = point.y + b.min.y;
                point.y + snap_to_grid(bottom, y_step, offset.y) - bottom
            }
            None => snap_to_grid(point.y, y_step, offset.y),
        };
    }

    out
}

/// Local bounds kept in step with the object's live scale and yaw.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapBounds {
    local: Aabb,
    scale: Vec3,
    quarter_turns: i32,
    effective: Aabb,
}

impl SnapBounds {
    pub fn new(local: Aabb) -> Self {
        Self {
            local,
            scale: Vec3::ONE,
            quarter_turns: 0,
            effective: local,
        }
    }

    /// Box used for snapping this tick.
    pub fn bounds(&self) -> &Aabb {
        &self.effective
    }

    pub fn quarter_turns(&self) -> i32 {
        self.quarter_turns
    }

    /// Update from the live scale and yaw. Returns true when the box changed.
    ///
    /// Yaw is rounded to the nearest quarter turn; the X/Z extents follow
    /// the object's rotated silhouette.
    pub fn sync(&mut self, scale: Vec3, yaw_degrees: f32) -> bool {
        let turns = if yaw_degrees.is_finite() {
            ((yaw_degrees / 90.0).round() as i32).rem_euclid(4)
        } else {
            self.quarter_turns
        };

        if turns == self.quarter_turns && scale == self.scale {
            return false;
        }

        self.quarter_turns = turns;
        self.scale = scale;
        self.effective = self.local.scaled(scale).rotated_quarter_turns(turns);
        true
    }
}
