//! Engine settings.
//!
//! Every section deserializes with defaults for missing keys, so a partial
//! TOML file only overrides what it names:
//!
//! ```toml
//! [increments]
//! rotation = 45.0
//!
//! [snap]
//! mode = "edge"
//! step = 0.5
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::increment::IncrementMultipliers;
use crate::input::{Action, InputTiming, RepeatCategory};
use crate::placement::StrategyKind;
use crate::snap::SnapConfig;
use crate::transform::ExitResetPolicy;

/// Key string per logical action, `"MOD+MOD+KEY"` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub rotate_x: String,
    pub rotate_y: String,
    pub rotate_z: String,
    pub scale_up: String,
    pub scale_down: String,
    pub height_up: String,
    pub height_down: String,
    pub move_forward: String,
    pub move_back: String,
    pub move_left: String,
    pub move_right: String,
    pub mode_position: String,
    pub mode_rotation: String,
    pub mode_scale: String,
    pub confirm_click: String,
    pub confirm_key: String,
    pub cancel_click: String,
    pub cancel_key: String,
    pub cycle_strategy: String,
    pub toggle_snap: String,
    pub reverse: String,
    pub large: String,
    pub fine: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            rotate_x: "X".into(),
            rotate_y: "Y".into(),
            rotate_z: "Z".into(),
            scale_up: "PageUp".into(),
            scale_down: "PageDown".into(),
            height_up: "E".into(),
            height_down: "Q".into(),
            move_forward: "W".into(),
            move_back: "S".into(),
            move_left: "A".into(),
            move_right: "D".into(),
            mode_position: "G".into(),
            mode_rotation: "R".into(),
            mode_scale: "T".into(),
            confirm_click: "MouseLeft".into(),
            confirm_key: "Enter".into(),
            cancel_click: "MouseRight".into(),
            cancel_key: "Escape".into(),
            cycle_strategy: "Tab".into(),
            toggle_snap: "N".into(),
            reverse: "Shift".into(),
            large: "Alt".into(),
            fine: "Ctrl".into(),
        }
    }
}

impl KeyBindings {
    pub fn get(&self, action: Action) -> &str {
        match action {
            Action::RotateX => &self.rotate_x,
            Action::RotateY => &self.rotate_y,
            Action::RotateZ => &self.rotate_z,
            Action::ScaleUp => &self.scale_up,
            Action::ScaleDown => &self.scale_down,
            Action::HeightUp => &self.height_up,
            Action::HeightDown => &self.height_down,
            Action::MoveForward => &self.move_forward,
            Action::MoveBack => &self.move_back,
            Action::MoveLeft => &self.move_left,
            Action::MoveRight => &self.move_right,
            Action::ModePosition => &self.mode_position,
            Action::ModeRotation => &self.mode_rotation,
            Action::ModeScale => &self.mode_scale,
            Action::ConfirmClick => &self.confirm_click,
            Action::ConfirmKey => &self.confirm_key,
            Action::CancelClick => &self.cancel_click,
            Action::CancelKey => &self.cancel_key,
            Action::CycleStrategy => &self.cycle_strategy,
            Action::ToggleSnap => &self.toggle_snap,
            Action::Reverse => &self.reverse,
            Action::Large => &self.large,
            Action::Fine => &self.fine,
        }
    }
}

/// Base step sizes and modifier multipliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncrementSettings {
    /// Degrees per rotation step
    pub rotation: f32,
    /// Multiplier change per scale step
    pub scale: f32,
    /// World units per height step
    pub height: f32,
    /// World units per position nudge
    pub position: f32,
    pub large_multiplier: f32,
    pub fine_multiplier: f32,
}

impl Default for IncrementSettings {
    fn default() -> Self {
        Self {
            rotation: 15.0,
            scale: 0.1,
            height: 0.25,
            position: 1.0,
            large_multiplier: 5.0,
            fine_multiplier: 0.1,
        }
    }
}

impl IncrementSettings {
    pub fn multipliers(&self) -> IncrementMultipliers {
        IncrementMultipliers::new(self.large_multiplier, self.fine_multiplier)
    }

    pub fn base(&self, category: RepeatCategory) -> f32 {
        match category {
            RepeatCategory::Rotation => self.rotation,
            RepeatCategory::Scale => self.scale,
            RepeatCategory::Height => self.height,
            RepeatCategory::Position => self.position,
        }
    }
}

/// Mouse sensitivity for modal controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalSettings {
    /// Degrees per pixel of horizontal motion
    pub rotation_per_pixel: f32,
    /// Multiplier change per pixel of vertical motion
    pub scale_per_pixel: f32,
    /// World units per pixel, per unit of camera distance
    pub position_per_pixel: f32,
    /// Distance from the viewport edge that triggers a cursor warp
    pub warp_margin: f32,
    /// Furthest a constrained projection may move from its pivot
    pub constraint_max_distance: f32,
}

impl Default for ModalSettings {
    fn default() -> Self {
        Self {
            rotation_per_pixel: 0.5,
            scale_per_pixel: 0.01,
            position_per_pixel: 0.0025,
            warp_margin: 24.0,
            constraint_max_distance: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementSettings {
    pub strategy: StrategyKind,
    /// Layers the collision strategy may hit
    pub layer_mask: u32,
    /// Height of the plane strategy's plane
    pub plane_height: f32,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Collision,
            layer_mask: u32::MAX,
            plane_height: 0.0,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bindings: KeyBindings,
    pub increments: IncrementSettings,
    pub snap: SnapConfig,
    pub timing: InputTiming,
    pub modal: ModalSettings,
    pub placement: PlacementSettings,
    pub exit_reset: ExitResetPolicy,
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&content)?;
        log::info!("Loaded placement settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_toml_string()?)?;
        log::info!("Saved placement settings to {:?}", path);
        Ok(())
    }

    /// Copy with every out-of-range value pulled back into range.
    pub fn sanitized(&self) -> Self {
        let mut s = self.clone();
        let defaults = Settings::default();

        let inc = &mut s.increments;
        if !(inc.large_multiplier >= IncrementMultipliers::MIN_LARGE) {
            log::warn!(
                "Large multiplier {} below {}, clamped",
                inc.large_multiplier,
                IncrementMultipliers::MIN_LARGE
            );
            inc.large_multiplier = if inc.large_multiplier.is_nan() {
                defaults.increments.large_multiplier
            } else {
                IncrementMultipliers::MIN_LARGE
            };
        }
        if !(IncrementMultipliers::MIN_FINE..=IncrementMultipliers::MAX_FINE)
            .contains(&inc.fine_multiplier)
        {
            log::warn!("Fine multiplier {} out of range, clamped", inc.fine_multiplier);
            inc.fine_multiplier = if inc.fine_multiplier.is_nan() {
                defaults.increments.fine_multiplier
            } else {
                inc.fine_multiplier
                    .clamp(IncrementMultipliers::MIN_FINE, IncrementMultipliers::MAX_FINE)
            };
        }
        positive(&mut inc.rotation, defaults.increments.rotation, "increments.rotation");
        positive(&mut inc.scale, defaults.increments.scale, "increments.scale");
        positive(&mut inc.height, defaults.increments.height, "increments.height");
        positive(&mut inc.position, defaults.increments.position, "increments.position");

        positive(&mut s.snap.step, defaults.snap.step, "snap.step");
        positive(&mut s.snap.y_step, defaults.snap.y_step, "snap.y_step");
        if !s.snap.offset.is_finite() {
            log::warn!("snap.offset is not finite, reset");
            s.snap.offset = defaults.snap.offset;
        }

        let t = &mut s.timing;
        positive_f64(&mut t.rotation_repeat_ms, defaults.timing.rotation_repeat_ms, "timing.rotation_repeat_ms");
        positive_f64(&mut t.scale_repeat_ms, defaults.timing.scale_repeat_ms, "timing.scale_repeat_ms");
        positive_f64(&mut t.height_repeat_ms, defaults.timing.height_repeat_ms, "timing.height_repeat_ms");
        positive_f64(&mut t.position_repeat_ms, defaults.timing.position_repeat_ms, "timing.position_repeat_ms");
        positive_f64(&mut t.numeric_timeout_ms, defaults.timing.numeric_timeout_ms, "timing.numeric_timeout_ms");
        if !(t.tap_grace_ms >= 0.0 && t.tap_grace_ms.is_finite()) {
            log::warn!("timing.tap_grace_ms {} invalid, reset", t.tap_grace_ms);
            t.tap_grace_ms = defaults.timing.tap_grace_ms;
        }

        let m = &mut s.modal;
        positive(&mut m.rotation_per_pixel, defaults.modal.rotation_per_pixel, "modal.rotation_per_pixel");
        positive(&mut m.scale_per_pixel, defaults.modal.scale_per_pixel, "modal.scale_per_pixel");
        positive(&mut m.position_per_pixel, defaults.modal.position_per_pixel, "modal.position_per_pixel");
        positive(&mut m.constraint_max_distance, defaults.modal.constraint_max_distance, "modal.constraint_max_distance");
        if !(m.warp_margin >= 0.0 && m.warp_margin.is_finite()) {
            log::warn!("modal.warp_margin {} invalid, reset", m.warp_margin);
            m.warp_margin = defaults.modal.warp_margin;
        }

        if !s.placement.plane_height.is_finite() {
            log::warn!("placement.plane_height is not finite, reset");
            s.placement.plane_height = defaults.placement.plane_height;
        }

        s
    }
}

fn positive(value: &mut f32, default: f32, name: &str) {
    if !(*value > 0.0 && value.is_finite()) {
        log::warn!("{} must be positive, got {}; using {}", name, value, default);
        *value = default;
    }
}

fn positive_f64(value: &mut f64, default: f64, name: &str) {
    if !(*value > 0.0 && value.is_finite()) {
        log::warn!("{} must be positive, got {}; using {}", name, value, default);
        *value = default;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snap::SnapMode;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.bindings.rotate_y, "Y");
        assert_eq!(s.bindings.fine, "Ctrl");
        assert_eq!(s.increments.rotation, 15.0);
        assert_eq!(s.timing.tap_grace_ms, 150.0);
        assert_eq!(s.placement.strategy, StrategyKind::Collision);
        assert_eq!(s.placement.layer_mask, u32::MAX);
        assert!(!s.exit_reset.reset_rotation);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let s = Settings::from_toml_str(
            r#"
            [increments]
            rotation = 45.0

            [snap]
            mode = "edge"
            step = 0.5

            [placement]
            strategy = "plane"

            [exit_reset]
            reset_scale = true
            "#,
        )
        .unwrap();
        assert_eq!(s.increments.rotation, 45.0);
        assert_eq!(s.increments.scale, 0.1);
        assert_eq!(s.snap.mode, SnapMode::Edge);
        assert_eq!(s.snap.step, 0.5);
        assert!(s.snap.enabled);
        assert_eq!(s.placement.strategy, StrategyKind::Plane);
        assert!(s.exit_reset.reset_scale);
        assert!(!s.exit_reset.reset_height);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut s = Settings::default();
        s.bindings.rotate_x = "Ctrl+Alt+8".into();
        s.snap.y_enabled = true;
        let text = s.to_toml_string().unwrap();
        assert_eq!(Settings::from_toml_str(&text).unwrap(), s);
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = Settings::from_toml_str("[snap]\nstep = \"wide\"").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_sanitized_clamps() {
        let mut s = Settings::default();
        s.increments.large_multiplier = 0.5;
        s.increments.fine_multiplier = 4.0;
        s.snap.step = 0.0;
        s.timing.rotation_repeat_ms = -10.0;
        s.modal.scale_per_pixel = f32::NAN;

        let s = s.sanitized();
        assert_eq!(s.increments.large_multiplier, 1.0);
        assert_eq!(s.increments.fine_multiplier, 1.0);
        assert_eq!(s.snap.step, 1.0);
        assert_eq!(s.timing.rotation_repeat_ms, 100.0);
        assert_eq!(s.modal.scale_per_pixel, 0.01);
    }

    #[test]
    fn test_sanitized_leaves_valid_settings() {
        let s = Settings::default();
        assert_eq!(s.sanitized(), s);
    }

    #[test]
    fn test_bindings_cover_every_action() {
        let b = KeyBindings::default();
        for action in Action::ALL {
            assert!(!b.get(action).is_empty(), "{} unbound", action);
        }
    }
}
