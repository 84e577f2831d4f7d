//! Modal control state
//!
//! While a modal control is active, mouse motion drives that control
//! instead of the camera. Constraints and numeric entry only exist inside
//! an active control, so the idle state carries neither.

mod constraint;
mod cursor;

pub use constraint::{AxisConstraint, AxisSet};
pub use cursor::{CursorSample, CursorTracker};

use std::fmt;

use crate::numeric::NumericEntry;

/// Control driven by the mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    Position,
    Rotation,
    Scale,
}

impl fmt::Display for ModalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModalKind::Position => write!(f, "Position"),
            ModalKind::Rotation => write!(f, "Rotation"),
            ModalKind::Scale => write!(f, "Scale"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveModal {
    pub kind: ModalKind,
    pub constraint: Option<AxisConstraint>,
    pub numeric: Option<NumericEntry>,
}

impl ActiveModal {
    pub fn new(kind: ModalKind) -> Self {
        Self {
            kind,
            constraint: None,
            numeric: None,
        }
    }

    /// Numeric entry with at least one keystroke.
    pub fn typing(&self) -> bool {
        self.numeric.as_ref().is_some_and(|n| n.has_input())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ModalState {
    #[default]
    Idle,
    Active(ActiveModal),
}

impl ModalState {
    pub fn active(kind: ModalKind) -> Self {
        ModalState::Active(ActiveModal::new(kind))
    }

    pub fn kind(&self) -> Option<ModalKind> {
        match self {
            ModalState::Idle => None,
            ModalState::Active(active) => Some(active.kind),
        }
    }

    pub fn as_active(&self) -> Option<&ActiveModal> {
        match self {
            ModalState::Idle => None,
            ModalState::Active(active) => Some(active),
        }
    }

    pub fn as_active_mut(&mut self) -> Option<&mut ActiveModal> {
        match self {
            ModalState::Idle => None,
            ModalState::Active(active) => Some(active),
        }
    }

    pub fn constraint(&self) -> Option<&AxisConstraint> {
        self.as_active().and_then(|a| a.constraint.as_ref())
    }

    pub fn numeric(&self) -> Option<&NumericEntry> {
        self.as_active().and_then(|a| a.numeric.as_ref())
    }

    pub fn is_typing(&self) -> bool {
        self.as_active().is_some_and(|a| a.typing())
    }

    /// Handle a mode key. The active mode's key returns to idle, any other
    /// starts that mode with no constraint and no pending entry.
    ///
    /// Returns the new kind, or None when now idle.
    pub fn switch(&mut self, kind: ModalKind) -> Option<ModalKind> {
        if self.kind() == Some(kind) {
            *self = ModalState::Idle;
            None
        } else {
            *self = ModalState::active(kind);
            Some(kind)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::NumericTarget;
    use crate::transform::Axis;
    use glam::Vec3;

    #[test]
    fn test_switch_toggles_back_to_idle() {
        let mut state = ModalState::Idle;
        assert_eq!(state.switch(ModalKind::Rotation), Some(ModalKind::Rotation));
        assert_eq!(state.switch(ModalKind::Rotation), None);
        assert_eq!(state, ModalState::Idle);
    }

    #[test]
    fn test_switch_drops_constraint_and_entry() {
        let mut state = ModalState::active(ModalKind::Position);
        if let Some(active) = state.as_active_mut() {
            active.constraint = Some(AxisConstraint::new(AxisSet::single(Axis::X), Vec3::ZERO, 0.0));
            active.numeric = Some(NumericEntry::new(NumericTarget::Position(Axis::X), 0.0, 0.0));
        }
        state.switch(ModalKind::Scale);
        assert_eq!(state.kind(), Some(ModalKind::Scale));
        assert!(state.constraint().is_none());
        assert!(state.numeric().is_none());
    }

    #[test]
    fn test_typing_needs_input() {
        let mut active = ActiveModal::new(ModalKind::Rotation);
        assert!(!active.typing());
        active.numeric = Some(NumericEntry::new(NumericTarget::Rotation(Axis::Y), 0.0, 0.0));
        assert!(!active.typing());
        if let Some(n) = active.numeric.as_mut() {
            n.push('5', 0.0);
        }
        assert!(active.typing());
    }
}
