//! Integration tests for key repeat, modifiers and wheel routing

use approx::assert_abs_diff_eq;
use void_placement::prelude::*;

const DT: f64 = 0.016;

struct Harness {
    engine: PlacementEngine,
    scene: SimulatedScene,
    raw: RawInput,
}

impl Harness {
    fn placing(settings: Settings) -> Self {
        let mut h = Self {
            engine: PlacementEngine::new(settings.clone()),
            scene: SimulatedScene::default(),
            raw: RawInput::new(),
        };
        h.engine
            .start_placement(&mut h.scene, &MeshDescriptor::new("crate"), &settings)
            .unwrap();
        h.raw.cursor = h.scene.cursor_for(Vec3::ZERO);
        h.tick(DT);
        h
    }

    fn tick(&mut self, dt: f64) -> TickReport {
        self.engine.tick(&mut self.scene, &self.raw, dt)
    }

    fn tap(&mut self, key: &str) {
        self.raw.press(key);
        self.tick(DT);
        self.raw.release(key);
        self.tick(DT);
    }

    fn wheel(&mut self, steps: f32) -> TickReport {
        self.raw.wheel_steps = steps;
        let report = self.tick(DT);
        self.raw.wheel_steps = 0.0;
        report
    }

    fn status(&self) -> &StatusPayload {
        self.engine.status()
    }
}

#[test]
fn test_hold_repeats_without_tap() {
    let mut h = Harness::placing(Settings::default());

    h.raw.press("Y");
    h.tick(0.0);
    // Grace (150ms) then two rotation intervals (100ms)
    h.tick(0.36);
    assert_abs_diff_eq!(h.status().rotation.y, 30.0, epsilon = 1e-4);

    h.raw.release("Y");
    h.tick(DT);
    assert_abs_diff_eq!(h.status().rotation.y, 30.0, epsilon = 1e-4);
}

#[test]
fn test_modifiers_scale_the_step() {
    let mut h = Harness::placing(Settings::default());

    h.raw.press("Alt");
    h.tap("Y");
    h.raw.release("Alt");
    h.tick(DT);
    assert_abs_diff_eq!(h.status().rotation.y, 75.0, epsilon = 1e-4);

    h.raw.press("Shift");
    h.tap("Y");
    h.raw.release("Shift");
    h.tick(DT);
    assert_abs_diff_eq!(h.status().rotation.y, 60.0, epsilon = 1e-4);

    // Reverse below zero wraps
    h.raw.press("Shift");
    h.raw.press("Alt");
    h.tap("X");
    assert_abs_diff_eq!(h.status().rotation.x, 285.0, epsilon = 1e-4);
}

#[test]
fn test_wheel_with_held_key_steps_and_suppresses_tap() {
    let mut h = Harness::placing(Settings::default());

    h.raw.press("E");
    h.tick(DT);
    let report = h.wheel(1.0);
    assert!(report.wheel_consumed);
    assert_abs_diff_eq!(report.status.height_offset, 0.25, epsilon = 1e-5);

    h.raw.release("E");
    h.tick(DT);
    assert_abs_diff_eq!(h.status().height_offset, 0.25, epsilon = 1e-5);

    // Wheel down while raising still lowers
    h.raw.press("E");
    h.tick(DT);
    h.wheel(-2.0);
    h.raw.release("E");
    h.tick(DT);
    assert_abs_diff_eq!(h.status().height_offset, -0.25, epsilon = 1e-5);
}

#[test]
fn test_bare_wheel_left_to_host() {
    let mut h = Harness::placing(Settings::default());
    let report = h.wheel(1.0);
    assert!(!report.wheel_consumed);
    assert_eq!(report.status.rotation, Vec3::ZERO);
}

#[test]
fn test_bare_wheel_drives_modal_rotation() {
    let mut h = Harness::placing(Settings::default());
    h.tap("R");
    assert_eq!(h.status().modal, Some(ModalKind::Rotation));

    let report = h.wheel(1.0);
    assert!(report.wheel_consumed);
    assert_abs_diff_eq!(report.status.rotation.y, 15.0, epsilon = 1e-4);

    // Same mode key again returns to free placement
    h.tap("R");
    assert_eq!(h.status().modal, None);
}

#[test]
fn test_move_keys_follow_the_grid() {
    let mut h = Harness::placing(Settings::default());
    assert_eq!(h.status().position, Vec3::ZERO);

    h.tap("D");
    assert_eq!(h.status().position, Vec3::new(1.0, 0.0, 0.0));

    // Screen up is -Z for the top-down camera
    h.tap("W");
    assert_eq!(h.status().position, Vec3::new(1.0, 0.0, -1.0));

    h.tap("S");
    h.tap("A");
    assert_eq!(h.status().position, Vec3::ZERO);
}

#[test]
fn test_custom_bindings_from_toml() {
    let settings = Settings::from_toml_str(
        r#"
        [bindings]
        rotate_y = "U"
        height_up = "Ctrl+Shift+"

        [increments]
        rotation = 45.0
        "#,
    )
    .unwrap();
    let mut h = Harness::placing(settings);

    h.tap("U");
    assert_abs_diff_eq!(h.status().rotation.y, 45.0, epsilon = 1e-4);
    h.tap("Y");
    assert_abs_diff_eq!(h.status().rotation.y, 45.0, epsilon = 1e-4);

    // An unparseable binding never fires
    h.raw.press("Ctrl");
    h.raw.press("Shift");
    h.tap("E");
    assert_eq!(h.status().height_offset, 0.0);
}

#[test]
fn test_repeat_stops_when_modifier_changes() {
    let mut h = Harness::placing(Settings::default());

    h.raw.press("PageUp");
    h.tick(0.0);
    h.tick(0.27);
    assert_abs_diff_eq!(h.status().scale.x, 1.1, epsilon = 1e-4);

    h.raw.press("Alt");
    h.tick(0.5);
    assert_abs_diff_eq!(h.status().scale.x, 1.1, epsilon = 1e-4);
}
