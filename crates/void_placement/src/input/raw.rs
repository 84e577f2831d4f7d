//! Raw device state handed in by the host every tick.

use std::collections::HashSet;

use glam::Vec2;

/// Canonical key name: lowercase, with common aliases folded together.
pub fn normalize_key(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    match lower.as_str() {
        "control" | "lctrl" | "rctrl" | "ctl" => "ctrl".to_string(),
        "option" | "lalt" | "ralt" => "alt".to_string(),
        "lshift" | "rshift" => "shift".to_string(),
        "super" | "cmd" | "command" | "win" | "logo" => "meta".to_string(),
        "return" | "kpenter" | "kp_enter" => "enter".to_string(),
        "esc" => "escape".to_string(),
        "minus" | "kp_subtract" | "kpsubtract" => "-".to_string(),
        "plus" | "kp_add" | "kpadd" => "+".to_string(),
        "equal" | "equals" => "=".to_string(),
        "period" | "decimal" | "kp_period" => ".".to_string(),
        "pgup" | "page_up" => "pageup".to_string(),
        "pgdn" | "pgdown" | "page_down" => "pagedown".to_string(),
        _ => lower,
    }
}

/// Mouse buttons the engine cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Key-binding name for a mouse button (`MouseLeft` etc.).
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "mouseleft" | "mouse1" | "lmb" => Some(Self::Left),
            "mouseright" | "mouse2" | "rmb" => Some(Self::Right),
            "mousemiddle" | "mouse3" | "mmb" => Some(Self::Middle),
            _ => None,
        }
    }
}

/// Pressed state per mouse button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseButtons {
    pub left: bool,
    pub right: bool,
    pub middle: bool,
}

impl MouseButtons {
    pub fn is_down(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Left => self.left,
            MouseButton::Right => self.right,
            MouseButton::Middle => self.middle,
        }
    }

    pub fn set(&mut self, button: MouseButton, down: bool) {
        match button {
            MouseButton::Left => self.left = down,
            MouseButton::Right => self.right = down,
            MouseButton::Middle => self.middle = down,
        }
    }
}

/// Raw input for one tick.
#[derive(Debug, Clone, Default)]
pub struct RawInput {
    keys_down: HashSet<String>,
    /// Viewport-local cursor, None when outside the viewport
    pub cursor: Option<Vec2>,
    pub mouse: MouseButtons,
    /// Wheel movement this tick; positive is away from the user
    pub wheel_steps: f32,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: &str) {
        self.keys_down.insert(normalize_key(key));
    }

    pub fn release(&mut self, key: &str) {
        self.keys_down.remove(&normalize_key(key));
    }

    /// `key` must already be normalized.
    pub fn is_key_down(&self, key: &str) -> bool {
        self.keys_down.contains(key)
    }

    pub fn keys_down(&self) -> &HashSet<String> {
        &self.keys_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_aliases() {
        assert_eq!(normalize_key("Control"), "ctrl");
        assert_eq!(normalize_key(" Return "), "enter");
        assert_eq!(normalize_key("Esc"), "escape");
        assert_eq!(normalize_key("Minus"), "-");
        assert_eq!(normalize_key("PageUp"), "pageup");
        assert_eq!(normalize_key("X"), "x");
    }

    #[test]
    fn test_press_release() {
        let mut raw = RawInput::new();
        raw.press("Shift");
        raw.press("X");
        assert!(raw.is_key_down("shift"));
        assert!(raw.is_key_down("x"));
        raw.release("x");
        assert!(!raw.is_key_down("x"));
        raw.release("Shift");
        assert!(raw.keys_down().is_empty());
    }
}
