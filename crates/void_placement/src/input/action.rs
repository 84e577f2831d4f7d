//! Logical actions the engine reacts to.

use crate::transform::Axis;

/// Timing class for tap/hold keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatCategory {
    Rotation,
    Scale,
    Height,
    Position,
}

/// Camera-relative nudge direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NudgeAxis {
    Forward,
    Right,
}

/// Every logical input the engine binds to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    RotateX,
    RotateY,
    RotateZ,
    ScaleUp,
    ScaleDown,
    HeightUp,
    HeightDown,
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    ModePosition,
    ModeRotation,
    ModeScale,
    ConfirmClick,
    ConfirmKey,
    CancelClick,
    CancelKey,
    CycleStrategy,
    ToggleSnap,
    Reverse,
    Large,
    Fine,
}

impl Action {
    pub const ALL: [Action; 23] = [
        Action::RotateX,
        Action::RotateY,
        Action::RotateZ,
        Action::ScaleUp,
        Action::ScaleDown,
        Action::HeightUp,
        Action::HeightDown,
        Action::MoveForward,
        Action::MoveBack,
        Action::MoveLeft,
        Action::MoveRight,
        Action::ModePosition,
        Action::ModeRotation,
        Action::ModeScale,
        Action::ConfirmClick,
        Action::ConfirmKey,
        Action::CancelClick,
        Action::CancelKey,
        Action::CycleStrategy,
        Action::ToggleSnap,
        Action::Reverse,
        Action::Large,
        Action::Fine,
    ];

    /// Keys with tap/hold/repeat behaviour, in wheel priority order.
    pub const REPEATABLE: [Action; 11] = [
        Action::RotateX,
        Action::RotateY,
        Action::RotateZ,
        Action::ScaleUp,
        Action::ScaleDown,
        Action::HeightUp,
        Action::HeightDown,
        Action::MoveForward,
        Action::MoveBack,
        Action::MoveLeft,
        Action::MoveRight,
    ];

    /// Settings key for this action.
    pub fn name(self) -> &'static str {
        match self {
            Action::RotateX => "rotate_x",
            Action::RotateY => "rotate_y",
            Action::RotateZ => "rotate_z",
            Action::ScaleUp => "scale_up",
            Action::ScaleDown => "scale_down",
            Action::HeightUp => "height_up",
            Action::HeightDown => "height_down",
            Action::MoveForward => "move_forward",
            Action::MoveBack => "move_back",
            Action::MoveLeft => "move_left",
            Action::MoveRight => "move_right",
            Action::ModePosition => "mode_position",
            Action::ModeRotation => "mode_rotation",
            Action::ModeScale => "mode_scale",
            Action::ConfirmClick => "confirm_click",
            Action::ConfirmKey => "confirm_key",
            Action::CancelClick => "cancel_click",
            Action::CancelKey => "cancel_key",
            Action::CycleStrategy => "cycle_strategy",
            Action::ToggleSnap => "toggle_snap",
            Action::Reverse => "reverse",
            Action::Large => "large",
            Action::Fine => "fine",
        }
    }

    pub fn category(self) -> Option<RepeatCategory> {
        match self {
            Action::RotateX | Action::RotateY | Action::RotateZ => Some(RepeatCategory::Rotation),
            Action::ScaleUp | Action::ScaleDown => Some(RepeatCategory::Scale),
            Action::HeightUp | Action::HeightDown => Some(RepeatCategory::Height),
            Action::MoveForward | Action::MoveBack | Action::MoveLeft | Action::MoveRight => {
                Some(RepeatCategory::Position)
            }
            _ => None,
        }
    }

    /// Axis for the rotate keys, which double as constraint keys.
    pub fn axis(self) -> Option<Axis> {
        match self {
            Action::RotateX => Some(Axis::X),
            Action::RotateY => Some(Axis::Y),
            Action::RotateZ => Some(Axis::Z),
            _ => None,
        }
    }

    /// Signed direction for keys that step a value up or down.
    pub fn direction(self) -> f32 {
        match self {
            Action::ScaleDown | Action::HeightDown | Action::MoveBack | Action::MoveLeft => -1.0,
            _ => 1.0,
        }
    }

    pub fn nudge_axis(self) -> Option<NudgeAxis> {
        match self {
            Action::MoveForward | Action::MoveBack => Some(NudgeAxis::Forward),
            Action::MoveLeft | Action::MoveRight => Some(NudgeAxis::Right),
            _ => None,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeatable_all_have_categories() {
        for action in Action::REPEATABLE {
            assert!(action.category().is_some(), "{} has no category", action);
        }
        assert!(Action::ConfirmKey.category().is_none());
    }

    #[test]
    fn test_names_unique() {
        let mut names: Vec<_> = Action::ALL.iter().map(|a| a.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Action::ALL.len());
    }
}
