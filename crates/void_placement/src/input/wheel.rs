//! Mouse-wheel routing while a transform key is held.

use super::action::{Action, NudgeAxis};
use crate::increment::IncrementModifiers;
use crate::transform::Axis;

/// What a wheel step adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelTarget {
    Rotate(Axis),
    Scale,
    Height,
    Position(NudgeAxis),
}

/// Wheel outcome for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WheelIntent {
    /// The wheel did not move
    #[default]
    Idle,
    /// The wheel moved with no transform key held; left to the host
    Unhandled { direction: f32 },
    /// The wheel moved while `owner` was held
    Step {
        owner: Action,
        target: WheelTarget,
        direction: f32,
        steps: u32,
        modifiers: IncrementModifiers,
    },
}

impl WheelIntent {
    pub fn is_consumed(&self) -> bool {
        matches!(self, WheelIntent::Step { .. })
    }
}

/// Highest-priority held key, rotation first, then scale, height, position.
pub fn wheel_owner(mut is_pressed: impl FnMut(Action) -> bool) -> Option<Action> {
    Action::REPEATABLE.into_iter().find(|action| is_pressed(*action))
}

/// Resolve a wheel delta against the held keys.
pub fn resolve_wheel(
    wheel_steps: f32,
    modifiers: IncrementModifiers,
    is_pressed: impl FnMut(Action) -> bool,
) -> WheelIntent {
    if wheel_steps == 0.0 || !wheel_steps.is_finite() {
        return WheelIntent::Idle;
    }
    let direction = wheel_steps.signum();

    let Some(owner) = wheel_owner(is_pressed) else {
        return WheelIntent::Unhandled { direction };
    };

    let target = if let Some(axis) = owner.axis() {
        WheelTarget::Rotate(axis)
    } else if let Some(axis) = owner.nudge_axis() {
        WheelTarget::Position(axis)
    } else if matches!(owner, Action::ScaleUp | Action::ScaleDown) {
        WheelTarget::Scale
    } else {
        WheelTarget::Height
    };

    // Move keys keep their own sign so back + wheel up still walks back
    let direction = match target {
        WheelTarget::Position(_) => direction * owner.direction(),
        _ => direction,
    };

    WheelIntent::Step {
        owner,
        target,
        direction,
        steps: wheel_steps.abs().round().max(1.0) as u32,
        modifiers,
    }
}
