//! Typed numeric override for modal controls.
//!
//! `=5` sets a value outright, `5`, `+5` and `-5` adjust the value the
//! target had when entry began. The buffer expires when typing stops for
//! longer than the configured timeout.

use std::fmt;

use crate::transform::Axis;

/// Longest accepted digit string.
const MAX_DIGITS: usize = 16;

/// What a confirmed entry is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericTarget {
    /// Degrees around an axis
    Rotation(Axis),
    /// Uniform multiplier, or one axis of the per-axis multiplier
    Scale(Option<Axis>),
    /// World coordinate along an axis
    Position(Axis),
    /// Height offset in world units
    Height,
}

impl fmt::Display for NumericTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericTarget::Rotation(axis) => write!(f, "Rotate {}", axis),
            NumericTarget::Scale(None) => write!(f, "Scale"),
            NumericTarget::Scale(Some(axis)) => write!(f, "Scale {}", axis),
            NumericTarget::Position(axis) => write!(f, "Move {}", axis),
            NumericTarget::Height => write!(f, "Height"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrefixMode {
    /// Replace the value
    Absolute,
    /// Add to the initial value
    #[default]
    Add,
    /// Subtract from the initial value
    Subtract,
}

/// Buffered keystrokes for one target.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericEntry {
    target: NumericTarget,
    initial: f32,
    prefix: PrefixMode,
    /// Sign of an absolute value
    negative: bool,
    digits: String,
    last_input: f64,
}

impl NumericEntry {
    /// Arm entry for `target`, whose value is currently `initial`.
    pub fn new(target: NumericTarget, initial: f32, now: f64) -> Self {
        Self {
            target,
            initial,
            prefix: PrefixMode::Add,
            negative: false,
            digits: String::new(),
            last_input: now,
        }
    }

    pub fn target(&self) -> NumericTarget {
        self.target
    }

    pub fn initial(&self) -> f32 {
        self.initial
    }

    pub fn prefix(&self) -> PrefixMode {
        self.prefix
    }

    /// Move the baseline to `initial` while nothing has been typed.
    pub fn rebase(&mut self, initial: f32) {
        if !self.has_input() {
            self.initial = initial;
        }
    }

    /// Anything typed yet, prefixes included.
    pub fn has_input(&self) -> bool {
        !self.digits.is_empty() || self.prefix != PrefixMode::Add || self.negative
    }

    /// Feed one character. Returns false when it was rejected.
    pub fn push(&mut self, c: char, now: f64) -> bool {
        let accepted = match c {
            '0'..='9' => {
                if self.digits.len() < MAX_DIGITS {
                    self.digits.push(c);
                    true
                } else {
                    false
                }
            }
            '.' => {
                if self.digits.contains('.') || self.digits.len() >= MAX_DIGITS {
                    false
                } else {
                    self.digits.push('.');
                    true
                }
            }
            '=' if self.digits.is_empty() => {
                self.prefix = PrefixMode::Absolute;
                self.negative = false;
                true
            }
            '+' if self.digits.is_empty() => {
                match self.prefix {
                    PrefixMode::Absolute => self.negative = false,
                    _ => self.prefix = PrefixMode::Add,
                }
                true
            }
            // Minus flips the sign at any point
            '-' => {
                match self.prefix {
                    PrefixMode::Absolute => self.negative = !self.negative,
                    PrefixMode::Add => self.prefix = PrefixMode::Subtract,
                    PrefixMode::Subtract => self.prefix = PrefixMode::Add,
                }
                true
            }
            _ => false,
        };
        if accepted {
            self.last_input = now;
        }
        accepted
    }

    /// Remove the last digit, then the prefix once the digits are gone.
    pub fn backspace(&mut self, now: f64) -> bool {
        let removed = if self.digits.pop().is_some() {
            true
        } else if self.prefix != PrefixMode::Add || self.negative {
            self.prefix = PrefixMode::Add;
            self.negative = false;
            true
        } else {
            false
        };
        if removed {
            self.last_input = now;
        }
        removed
    }

    /// Buffer as shown in the overlay.
    pub fn text(&self) -> String {
        let prefix = match (self.prefix, self.negative) {
            (PrefixMode::Absolute, false) => "=",
            (PrefixMode::Absolute, true) => "=-",
            (PrefixMode::Add, _) => "",
            (PrefixMode::Subtract, _) => "-",
        };
        format!("{}{}", prefix, self.digits)
    }

    /// Typed magnitude, signed for absolute entries.
    pub fn value(&self) -> Option<f32> {
        let value: f32 = self.digits.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        Some(if self.negative { -value } else { value })
    }

    /// Final value for the target, or None when nothing parseable was typed.
    pub fn resolve(&self) -> Option<f32> {
        let value = self.value()?;
        Some(match self.prefix {
            PrefixMode::Absolute => value,
            PrefixMode::Add => self.initial + value,
            PrefixMode::Subtract => self.initial - value,
        })
    }

    pub fn is_expired(&self, now: f64, timeout: f64) -> bool {
        now - self.last_input > timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(initial: f32) -> NumericEntry {
        NumericEntry::new(NumericTarget::Rotation(Axis::Y), initial, 0.0)
    }

    fn typed(initial: f32, text: &str) -> NumericEntry {
        let mut e = entry(initial);
        for c in text.chars() {
            e.push(c, 0.0);
        }
        e
    }

    #[test]
    fn test_relative_by_default() {
        assert_eq!(typed(30.0, "15").resolve(), Some(45.0));
        assert_eq!(typed(30.0, "+15").resolve(), Some(45.0));
        assert_eq!(typed(30.0, "-15").resolve(), Some(15.0));
    }

    #[test]
    fn test_absolute() {
        assert_eq!(typed(30.0, "=90").resolve(), Some(90.0));
        assert_eq!(typed(30.0, "=-2.5").resolve(), Some(-2.5));
        assert_eq!(typed(30.0, "=-2.5").text(), "=-2.5");
    }

    #[test]
    fn test_minus_toggles() {
        let e = typed(10.0, "--4");
        assert_eq!(e.prefix(), PrefixMode::Add);
        assert_eq!(e.resolve(), Some(14.0));
        // trailing minus still flips the sign
        assert_eq!(typed(10.0, "4-").resolve(), Some(6.0));
    }

    #[test]
    fn test_rejects_bad_chars() {
        let mut e = typed(0.0, "1.5");
        assert!(!e.push('.', 0.0));
        assert!(!e.push('=', 0.0));
        assert!(!e.push('x', 0.0));
        assert_eq!(e.text(), "1.5");
    }

    #[test]
    fn test_empty_and_dot_do_not_resolve() {
        assert_eq!(entry(5.0).resolve(), None);
        assert!(!entry(5.0).has_input());
        let e = typed(5.0, "=");
        assert!(e.has_input());
        assert_eq!(e.resolve(), None);
        assert_eq!(typed(5.0, ".").resolve(), None);
        assert_eq!(typed(5.0, ".5").resolve(), Some(5.5));
    }

    #[test]
    fn test_backspace() {
        let mut e = typed(0.0, "=12");
        assert!(e.backspace(0.0));
        assert_eq!(e.text(), "=1");
        assert!(e.backspace(0.0));
        assert!(e.backspace(0.0));
        assert_eq!(e.text(), "");
        assert!(!e.has_input());
        assert!(!e.backspace(0.0));
    }

    #[test]
    fn test_rebase_only_before_input() {
        let mut e = entry(1.0);
        e.rebase(2.0);
        assert_eq!(e.initial(), 2.0);
        e.push('-', 0.0);
        e.rebase(7.0);
        e.push('1', 0.0);
        assert_eq!(e.resolve(), Some(1.0));
    }

    #[test]
    fn test_expiry_tracks_last_keystroke() {
        let mut e = entry(0.0);
        assert!(!e.is_expired(2.0, 3.0));
        e.push('1', 2.5);
        assert!(!e.is_expired(5.0, 3.0));
        assert!(e.is_expired(5.6, 3.0));
    }
}
