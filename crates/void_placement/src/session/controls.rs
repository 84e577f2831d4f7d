//! Input routing shared by placement and transform sessions.
//!
//! Order within a tick: numeric expiry, mode keys, typed keys, toggles,
//! axis keys, step keys, wheel, then mouse motion. Position itself is
//! resolved by the owning session since it needs scene queries.

use glam::{Vec2, Vec3};

use crate::config::Settings;
use crate::geometry::{Aabb, Ray};
use crate::host::CameraFrame;
use crate::increment::{step, IncrementModifiers, IncrementMultipliers};
use crate::input::{Action, InputSnapshot, NudgeAxis, RepeatCategory, TypedKey, WheelIntent, WheelTarget};
use crate::modal::{AxisConstraint, CursorTracker, ModalKind, ModalState};
use crate::numeric::{NumericEntry, NumericTarget};
use crate::snap::{snap, SnapBounds};
use crate::transform::{Axis, TransformState};

/// Which session the controls belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Placing,
    Transforming,
}

/// Read-only inputs for one tick.
pub(crate) struct Frame<'a> {
    pub snapshot: &'a InputSnapshot,
    pub settings: &'a Settings,
    pub multipliers: IncrementMultipliers,
    pub camera: Option<CameraFrame>,
    pub viewport: Option<Vec2>,
}

impl Frame<'_> {
    fn step(&self, category: RepeatCategory, modifiers: IncrementModifiers) -> f32 {
        step(self.settings.increments.base(category), modifiers, self.multipliers)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct ControlOutcome {
    pub enter_consumed: bool,
    pub wheel_consumed: bool,
    pub warp_to: Option<Vec2>,
}

#[derive(Debug, Clone)]
pub(crate) struct Controls {
    role: Role,
    pub state: TransformState,
    pub modal: ModalState,
    cursor: CursorTracker,
    bounds: Option<SnapBounds>,
    base_scale: Vec3,
    base_yaw: f32,
    /// Unsnapped pivot drag accumulated by mouse motion (transform sessions)
    pub drag: Vec3,
    /// The pivot was moved by the user at least once
    pub moved: bool,
}

impl Controls {
    pub fn new(role: Role, state: TransformState, modal: ModalState) -> Self {
        Self {
            role,
            state,
            modal,
            cursor: CursorTracker::new(),
            bounds: None,
            base_scale: Vec3::ONE,
            base_yaw: 0.0,
            drag: Vec3::ZERO,
            moved: false,
        }
    }

    /// Track `local` bounds for edge snapping, relative to the given
    /// pre-session scale and yaw.
    pub fn with_bounds(mut self, local: Option<Aabb>, base_scale: Vec3, base_yaw: f32) -> Self {
        self.base_scale = base_scale;
        self.base_yaw = base_yaw;
        self.bounds = local.map(SnapBounds::new);
        self.sync_bounds();
        self
    }

    /// The pivot holds still while the mouse drives rotation or scale, or
    /// while a value is being typed.
    pub fn position_frozen(&self) -> bool {
        matches!(self.modal.kind(), Some(ModalKind::Rotation | ModalKind::Scale)) || self.modal.is_typing()
    }

    pub fn constraint(&self) -> Option<&AxisConstraint> {
        self.modal.constraint()
    }

    pub fn snap_point(&self, point: Vec3, fine: bool) -> Vec3 {
        snap(point, self.bounds.as_ref().map(|b| b.bounds()), &self.state.snap, fine)
    }

    /// Constrained position for a cursor ray, snapped along the
    /// constrained axes only.
    pub fn constrained_point(&self, ray: &Ray, max_distance: f32, fine: bool) -> Option<Vec3> {
        let constraint = self.constraint()?;
        let projected = constraint.project(ray, max_distance);
        Some(constraint.pin(self.snap_point(projected, fine)))
    }

    /// Constrained position that follows cursor motion since activation
    /// rather than where the ray lands. None without a constraint or when
    /// the projection is degenerate.
    pub fn constrained_drag(&mut self, ray: &Ray, max_distance: f32, fine: bool) -> Option<Vec3> {
        let constraint = self.modal.as_active_mut()?.constraint.as_mut()?;
        let point = constraint.drag(ray, max_distance)?;
        let constraint = *constraint;
        if point == constraint.origin() {
            return Some(point);
        }
        Some(constraint.pin(self.snap_point(point, fine)))
    }

    /// Overlay text for the pending entry.
    pub fn numeric_text(&self) -> Option<String> {
        self.modal
            .numeric()
            .filter(|n| n.has_input())
            .map(|n| format!("{}: {}", n.target(), n.text()))
    }

    fn numeric_target_for_position(&self, axis: Axis) -> NumericTarget {
        match (self.role, axis) {
            (Role::Placing, Axis::Y) => NumericTarget::Height,
            _ => NumericTarget::Position(axis),
        }
    }

    fn numeric_initial(&self, target: NumericTarget) -> f32 {
        match target {
            NumericTarget::Rotation(axis) => self.state.rotation.get(axis),
            NumericTarget::Scale(None) => self.state.scale.uniform(),
            NumericTarget::Scale(Some(axis)) => self.state.scale.vector()[axis.index()],
            NumericTarget::Height => self.state.height_offset,
            NumericTarget::Position(axis) => match self.role {
                Role::Placing => self.state.manual_offset[axis.index()],
                Role::Transforming => self.state.position[axis.index()],
            },
        }
    }

    /// Arm numeric entry unless something is already being typed.
    fn arm(&mut self, target: NumericTarget, now: f64) {
        let initial = self.numeric_initial(target);
        if let Some(active) = self.modal.as_active_mut() {
            if !active.typing() {
                active.numeric = Some(NumericEntry::new(target, initial, now));
            }
        }
    }

    /// An armed entry with nothing typed follows the live value, so relative
    /// input starts from where mouse or wheel left it.
    fn rebase_numeric(&mut self) {
        let Some(target) = self.modal.numeric().filter(|n| !n.has_input()).map(|n| n.target()) else {
            return;
        };
        let initial = self.numeric_initial(target);
        if let Some(entry) = self.modal.as_active_mut().and_then(|a| a.numeric.as_mut()) {
            entry.rebase(initial);
        }
    }

    fn apply_numeric(&mut self, target: NumericTarget, value: f32) {
        match target {
            NumericTarget::Rotation(axis) => self.state.rotation.set(axis, value),
            NumericTarget::Scale(None) => self.state.scale.set_uniform(value),
            NumericTarget::Scale(Some(axis)) => self.state.scale.set_axis(axis, value),
            NumericTarget::Height => self.state.height_offset = value,
            NumericTarget::Position(axis) => {
                let i = axis.index();
                match self.role {
                    Role::Placing => self.state.manual_offset[i] = value,
                    Role::Transforming => {
                        self.drag[i] += value - self.state.position[i];
                        self.state.position[i] = value;
                        self.moved = true;
                    }
                }
                // The typed value wins over the constraint's projection
                if let Some(active) = self.modal.as_active_mut() {
                    active.constraint = None;
                }
            }
        }
        log::debug!("Numeric entry applied: {} = {}", target, value);
    }

    /// Apply and clear a pending entry. Returns the target when a value
    /// was applied.
    pub fn commit_numeric(&mut self) -> Option<NumericTarget> {
        let entry = self.modal.as_active_mut()?.numeric.take()?;
        let value = entry.resolve()?;
        let target = entry.target();
        self.apply_numeric(target, value);
        self.sync_bounds();
        Some(target)
    }

    /// Drop a pending entry that has input. Returns true when one was dropped.
    pub fn discard_typing(&mut self) -> bool {
        match self.modal.as_active_mut() {
            Some(active) if active.typing() => {
                active.numeric = None;
                log::debug!("Numeric entry cancelled");
                true
            }
            _ => false,
        }
    }

    pub fn process(&mut self, frame: &Frame<'_>) -> ControlOutcome {
        let snapshot = frame.snapshot;
        let now = snapshot.time;
        let mut outcome = ControlOutcome::default();

        self.expire_numeric(now, frame.settings.timing.numeric_timeout());
        self.handle_mode_keys(snapshot, now);
        outcome.enter_consumed = self.handle_typed(snapshot, now);

        if snapshot.just_pressed(Action::ToggleSnap) {
            self.state.snap.enabled = !self.state.snap.enabled;
            log::debug!("Grid snap {}", if self.state.snap.enabled { "enabled" } else { "disabled" });
        }

        self.handle_axis_keys(frame, now);
        self.handle_step_keys(frame);
        outcome.wheel_consumed = self.handle_wheel(frame);
        outcome.warp_to = self.handle_mouse(frame);

        self.sync_bounds();
        outcome
    }

    fn expire_numeric(&mut self, now: f64, timeout: f64) {
        if let Some(active) = self.modal.as_active_mut() {
            if active.typing() && active.numeric.as_ref().is_some_and(|n| n.is_expired(now, timeout)) {
                log::debug!("Numeric entry expired");
                active.numeric = None;
            }
        }
    }

    fn handle_mode_keys(&mut self, snapshot: &InputSnapshot, now: f64) {
        let requested = [
            (Action::ModePosition, ModalKind::Position),
            (Action::ModeRotation, ModalKind::Rotation),
            (Action::ModeScale, ModalKind::Scale),
        ]
        .into_iter()
        .find(|(action, _)| snapshot.just_pressed(*action));

        let Some((_, kind)) = requested else {
            return;
        };

        let now_kind = self.modal.switch(kind);
        self.cursor.reset();
        log::debug!(
            "Modal control: {}",
            now_kind.map(|k| k.to_string()).unwrap_or_else(|| "idle".into())
        );

        match now_kind {
            Some(ModalKind::Rotation) => {
                let axis = self.state.rotation.last_axis();
                self.arm(NumericTarget::Rotation(axis), now);
            }
            Some(ModalKind::Scale) => self.arm(NumericTarget::Scale(None), now),
            _ => {}
        }
    }

    /// Returns true when Enter was taken by numeric entry.
    fn handle_typed(&mut self, snapshot: &InputSnapshot, now: f64) -> bool {
        let Some(kind) = self.modal.kind() else {
            return false;
        };

        let mut enter_consumed = false;
        for key in &snapshot.typed {
            match *key {
                TypedKey::Char(c) => {
                    if self.modal.numeric().is_none() {
                        let target = match kind {
                            ModalKind::Position => self
                                .constraint()
                                .and_then(|c| c.axes().single_axis())
                                .map(|axis| self.numeric_target_for_position(axis)),
                            ModalKind::Rotation => {
                                Some(NumericTarget::Rotation(self.state.rotation.last_axis()))
                            }
                            ModalKind::Scale => Some(NumericTarget::Scale(
                                self.constraint().and_then(|c| c.axes().single_axis()),
                            )),
                        };
                        if let Some(target) = target {
                            self.arm(target, now);
                        }
                    }
                    self.rebase_numeric();
                    if let Some(entry) = self.modal.as_active_mut().and_then(|a| a.numeric.as_mut()) {
                        entry.push(c, now);
                    }
                }
                TypedKey::Backspace => {
                    if let Some(entry) = self.modal.as_active_mut().and_then(|a| a.numeric.as_mut()) {
                        entry.backspace(now);
                    }
                }
                TypedKey::Enter => {
                    if self.modal.is_typing() {
                        self.commit_numeric();
                        enter_consumed = true;
                    }
                }
                // Escape is handled with cancel, before anything else runs
                TypedKey::Escape => {}
            }
        }
        enter_consumed
    }

    fn handle_axis_keys(&mut self, frame: &Frame<'_>, now: f64) {
        let snapshot = frame.snapshot;
        for action in [Action::RotateX, Action::RotateY, Action::RotateZ] {
            let Some(axis) = action.axis() else { continue };
            let taps = u32::from(snapshot.tapped(action));

            match self.modal.kind() {
                Some(kind) => {
                    if taps > 0 {
                        self.toggle_constraint(kind, axis, snapshot.modifiers.reverse, now);
                    }
                }
                None => {
                    let fires = taps + snapshot.repeat_count(action);
                    if fires > 0 {
                        let amount = frame.step(RepeatCategory::Rotation, snapshot.modifiers);
                        for _ in 0..fires {
                            self.state.rotation.rotate(axis, amount);
                        }
                    }
                }
            }
        }
    }

    fn toggle_constraint(&mut self, kind: ModalKind, axis: Axis, reverse: bool, now: f64) {
        let plane = reverse && kind == ModalKind::Position;
        let origin = self.state.position;
        let Some(active) = self.modal.as_active_mut() else {
            return;
        };

        let next = AxisConstraint::toggle(active.constraint.as_ref(), axis, plane, origin, now);
        match &next {
            Some(c) => log::debug!("Axis constraint: {}", c.axes()),
            None => log::debug!("Axis constraint cleared"),
        }
        active.constraint = next;
        let single = next.and_then(|c| c.axes().single_axis());

        match kind {
            ModalKind::Rotation => {
                if let Some(a) = single {
                    self.state.rotation.set_last_axis(a);
                }
                let target = NumericTarget::Rotation(single.unwrap_or(self.state.rotation.last_axis()));
                self.retarget(target, now);
            }
            ModalKind::Scale => self.retarget(NumericTarget::Scale(single), now),
            ModalKind::Position => {}
        }
        self.cursor.reset();
    }

    /// Re-arm for a new target when nothing is typed yet.
    fn retarget(&mut self, target: NumericTarget, now: f64) {
        if !self.modal.is_typing() {
            if let Some(active) = self.modal.as_active_mut() {
                active.numeric = None;
            }
            self.arm(target, now);
        }
    }

    fn scale_axis(&self) -> Option<Axis> {
        if self.modal.kind() == Some(ModalKind::Scale) {
            self.constraint().and_then(|c| c.axes().single_axis())
        } else {
            None
        }
    }

    fn adjust_scale(&mut self, delta: f32) {
        match self.scale_axis() {
            Some(axis) => self.state.scale.adjust_axis(axis, delta),
            None => self.state.scale.adjust_uniform(delta),
        }
    }

    fn nudge(&mut self, camera: Option<&CameraFrame>, axis: NudgeAxis, distance: f32) {
        let Some(dir) = camera.and_then(|c| grid_direction(c, axis)) else {
            return;
        };
        self.state.manual_offset += dir * distance;
        self.moved = true;
    }

    fn handle_step_keys(&mut self, frame: &Frame<'_>) {
        let snapshot = frame.snapshot;
        let modifiers = snapshot.modifiers;

        for action in [
            Action::ScaleUp,
            Action::ScaleDown,
            Action::HeightUp,
            Action::HeightDown,
            Action::MoveForward,
            Action::MoveBack,
            Action::MoveLeft,
            Action::MoveRight,
        ] {
            let fires = u32::from(snapshot.tapped(action)) + snapshot.repeat_count(action);
            if fires == 0 {
                continue;
            }
            let Some(category) = action.category() else { continue };
            let amount = frame.step(category, modifiers) * action.direction();

            for _ in 0..fires {
                match category {
                    RepeatCategory::Scale => self.adjust_scale(amount),
                    RepeatCategory::Height => self.state.height_offset += amount,
                    RepeatCategory::Position => {
                        if let Some(axis) = action.nudge_axis() {
                            self.nudge(frame.camera.as_ref(), axis, amount);
                        }
                    }
                    RepeatCategory::Rotation => {}
                }
            }
        }
    }

    fn handle_wheel(&mut self, frame: &Frame<'_>) -> bool {
        match frame.snapshot.wheel {
            WheelIntent::Idle => false,
            WheelIntent::Step {
                target,
                direction,
                steps,
                modifiers,
                ..
            } => {
                for _ in 0..steps {
                    match target {
                        WheelTarget::Rotate(axis) => {
                            let amount = frame.step(RepeatCategory::Rotation, modifiers) * direction;
                            self.state.rotation.rotate(axis, amount);
                        }
                        WheelTarget::Scale => {
                            self.adjust_scale(frame.step(RepeatCategory::Scale, modifiers) * direction);
                        }
                        WheelTarget::Height => {
                            self.state.height_offset +=
                                frame.step(RepeatCategory::Height, modifiers) * direction;
                        }
                        WheelTarget::Position(axis) => {
                            let amount = frame.step(RepeatCategory::Position, modifiers) * direction;
                            self.nudge(frame.camera.as_ref(), axis, amount);
                        }
                    }
                }
                true
            }
            // A bare wheel drives the active rotation or scale control
            WheelIntent::Unhandled { direction } => {
                let modifiers = frame.snapshot.modifiers;
                match self.modal.kind() {
                    Some(ModalKind::Rotation) => {
                        let amount = frame.step(RepeatCategory::Rotation, modifiers) * direction;
                        match self.constraint().and_then(|c| c.axes().single_axis()) {
                            Some(axis) => self.state.rotation.rotate(axis, amount),
                            None => self.state.rotation.rotate_last(amount),
                        }
                        true
                    }
                    Some(ModalKind::Scale) => {
                        self.adjust_scale(frame.step(RepeatCategory::Scale, modifiers) * direction);
                        true
                    }
                    _ => false,
                }
            }
        }
    }

    /// Whether mouse motion is read as a delta this tick.
    fn delta_driven(&self) -> bool {
        if self.modal.is_typing() {
            return false;
        }
        match self.modal.kind() {
            Some(ModalKind::Rotation | ModalKind::Scale) => true,
            Some(ModalKind::Position) => self.role == Role::Transforming && self.constraint().is_none(),
            None => false,
        }
    }

    fn handle_mouse(&mut self, frame: &Frame<'_>) -> Option<Vec2> {
        if !self.delta_driven() {
            self.cursor.reset();
            return None;
        }

        let modal = &frame.settings.modal;
        let sample = self
            .cursor
            .sample(frame.snapshot.cursor, frame.viewport, modal.warp_margin);
        let delta = sample.delta;

        if delta != Vec2::ZERO {
            match self.modal.kind() {
                Some(ModalKind::Rotation) => {
                    let amount = delta.x * modal.rotation_per_pixel;
                    match self.constraint().and_then(|c| c.axes().single_axis()) {
                        Some(axis) => self.state.rotation.rotate(axis, amount),
                        None => self.state.rotation.rotate_last(amount),
                    }
                }
                Some(ModalKind::Scale) => {
                    // Screen y grows downward; dragging up enlarges
                    self.adjust_scale(-delta.y * modal.scale_per_pixel);
                }
                Some(ModalKind::Position) => {
                    if let Some(camera) = frame.camera {
                        let distance = camera.position.distance(self.state.position).max(1.0);
                        let per_pixel = modal.position_per_pixel * distance;
                        let world = camera.flat_right() * delta.x - camera.flat_forward() * delta.y;
                        self.drag += world * per_pixel;
                        self.moved = true;
                    }
                }
                None => {}
            }
        }

        sample.warp_to
    }

    pub fn sync_bounds(&mut self) {
        if let Some(bounds) = self.bounds.as_mut() {
            let scale = self.state.scale.apply(self.base_scale);
            let yaw = self.base_yaw + self.state.rotation.get(Axis::Y);
            bounds.sync(scale, yaw);
        }
    }
}

/// World-aligned unit step for a camera-relative nudge, so nudges stay on
/// the grid.
fn grid_direction(camera: &CameraFrame, axis: NudgeAxis) -> Option<Vec3> {
    let flat = match axis {
        NudgeAxis::Forward => camera.flat_forward(),
        NudgeAxis::Right => camera.flat_right(),
    };
    if flat == Vec3::ZERO {
        return None;
    }
    Some(if flat.x.abs() >= flat.z.abs() {
        Vec3::new(flat.x.signum(), 0.0, 0.0)
    } else {
        Vec3::new(0.0, 0.0, flat.z.signum())
    })
}
