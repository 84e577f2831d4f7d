//! Overlay payload handed to the host each tick.

use std::fmt;

use glam::Vec3;

use crate::modal::{AxisSet, ModalKind};
use crate::placement::StrategyKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionKind {
    #[default]
    Inactive,
    Placing,
    Transforming,
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::Inactive => write!(f, "Inactive"),
            SessionKind::Placing => write!(f, "Placing"),
            SessionKind::Transforming => write!(f, "Transforming"),
        }
    }
}

/// What the host should render about the current session.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusPayload {
    pub session: SessionKind,
    pub modal: Option<ModalKind>,
    pub constraint: Option<AxisSet>,
    /// `"Rotate Y: =45"` while typing
    pub numeric: Option<String>,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub height_offset: f32,
    pub strategy: StrategyKind,
    pub snap_enabled: bool,
    pub targets: usize,
}

impl Default for StatusPayload {
    fn default() -> Self {
        Self {
            session: SessionKind::Inactive,
            modal: None,
            constraint: None,
            numeric: None,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            height_offset: 0.0,
            strategy: StrategyKind::default(),
            snap_enabled: false,
            targets: 0,
        }
    }
}

impl fmt::Display for StatusPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.session == SessionKind::Inactive {
            return write!(f, "Inactive");
        }

        write!(f, "{}", self.session)?;
        if self.session == SessionKind::Transforming {
            write!(f, " ({})", self.targets)?;
        }
        match self.modal {
            Some(kind) => write!(f, " | {}", kind)?,
            None => write!(f, " | Free")?,
        }
        if let Some(axes) = self.constraint {
            write!(f, " [{}]", axes)?;
        }
        if let Some(text) = &self.numeric {
            write!(f, " | {}", text)?;
        }

        let p = self.position;
        let r = self.rotation;
        write!(
            f,
            " | pos ({:.2}, {:.2}, {:.2}) rot ({:.1}, {:.1}, {:.1})",
            p.x, p.y, p.z, r.x, r.y, r.z
        )?;
        let s = self.scale;
        if s.x == s.y && s.y == s.z {
            write!(f, " scale {:.2}", s.x)?;
        } else {
            write!(f, " scale ({:.2}, {:.2}, {:.2})", s.x, s.y, s.z)?;
        }
        write!(f, " height {:.2}", self.height_offset)?;

        write!(
            f,
            " | snap {} | {}",
            if self.snap_enabled { "on" } else { "off" },
            self.strategy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Axis;

    #[test]
    fn test_inactive_line() {
        assert_eq!(StatusPayload::default().to_string(), "Inactive");
    }

    #[test]
    fn test_placing_line() {
        let status = StatusPayload {
            session: SessionKind::Placing,
            modal: Some(ModalKind::Position),
            constraint: Some(AxisSet::single(Axis::X)),
            position: Vec3::new(2.0, 0.0, 5.0),
            rotation: Vec3::new(0.0, 15.0, 0.0),
            snap_enabled: true,
            ..Default::default()
        };
        assert_eq!(
            status.to_string(),
            "Placing | Position [X] | pos (2.00, 0.00, 5.00) rot (0.0, 15.0, 0.0) \
             scale 1.00 height 0.00 | snap on | collision"
        );
    }

    #[test]
    fn test_numeric_and_targets() {
        let status = StatusPayload {
            session: SessionKind::Transforming,
            modal: Some(ModalKind::Rotation),
            numeric: Some("Rotate Y: =45".into()),
            scale: Vec3::new(1.0, 2.0, 1.0),
            targets: 3,
            ..Default::default()
        };
        let line = status.to_string();
        assert!(line.starts_with("Transforming (3) | Rotation | Rotate Y: =45"));
        assert!(line.contains("scale (1.00, 2.00, 1.00)"));
    }
}
