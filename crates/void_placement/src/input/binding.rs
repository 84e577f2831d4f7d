//! Key-chord parsing and the action binding table.

use std::collections::HashMap;
use std::fmt;

use super::action::Action;
use super::raw::{normalize_key, MouseButton, RawInput};
use crate::config::KeyBindings;

const MODIFIERS: [&str; 4] = ["ctrl", "alt", "shift", "meta"];

/// Main key of a chord.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChordKey {
    Key(String),
    Mouse(MouseButton),
}

/// A key plus the modifiers that must be held with it.
///
/// Extra held modifiers never block a chord, so `X` still fires while
/// Shift is down.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub modifiers: Vec<String>,
    pub key: ChordKey,
}

impl KeyChord {
    /// Parse `"Ctrl+Shift+X"`, `"MouseLeft"`, `"+"` or `"Ctrl++"`.
    ///
    /// Returns None for empty strings, dangling separators and unknown
    /// modifiers.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let (mods, key) = if text == "+" {
            ("", "+")
        } else if let Some(head) = text.strip_suffix("++") {
            (head, "+")
        } else {
            match text.rsplit_once('+') {
                Some((head, key)) => {
                    if head.is_empty() {
                        return None;
                    }
                    (head, key)
                }
                None => ("", text),
            }
        };

        let key = normalize_key(key);
        if key.is_empty() {
            return None;
        }

        let mut modifiers = Vec::new();
        if !mods.is_empty() {
            for part in mods.split('+') {
                let part = normalize_key(part);
                if !MODIFIERS.contains(&part.as_str()) {
                    return None;
                }
                if !modifiers.contains(&part) {
                    modifiers.push(part);
                }
            }
        }

        let key = match MouseButton::from_key_name(&key) {
            Some(button) => ChordKey::Mouse(button),
            None => ChordKey::Key(key),
        };

        Some(Self { modifiers, key })
    }

    pub fn is_down(&self, raw: &RawInput) -> bool {
        let key_down = match &self.key {
            ChordKey::Key(key) => raw.is_key_down(key),
            ChordKey::Mouse(button) => raw.mouse.is_down(*button),
        };
        key_down && self.modifiers.iter().all(|m| raw.is_key_down(m))
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier)?;
        }
        match &self.key {
            ChordKey::Key(key) => write!(f, "{}", key),
            ChordKey::Mouse(button) => write!(f, "mouse{:?}", button),
        }
    }
}

/// Parsed chords for every action.
///
/// Bindings that fail to parse are kept as None and never report pressed.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    chords: HashMap<Action, KeyChord>,
}

impl BindingTable {
    pub fn from_bindings(bindings: &KeyBindings) -> Self {
        let mut chords = HashMap::new();
        for action in Action::ALL {
            let text = bindings.get(action);
            match KeyChord::parse(text) {
                Some(chord) => {
                    chords.insert(action, chord);
                }
                None => {
                    log::warn!("Invalid key binding for {}: '{}'", action, text);
                }
            }
        }
        Self { chords }
    }

    pub fn chord(&self, action: Action) -> Option<&KeyChord> {
        self.chords.get(&action)
    }

    pub fn is_down(&self, action: Action, raw: &RawInput) -> bool {
        self.chords
            .get(&action)
            .map(|chord| chord.is_down(raw))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let chord = KeyChord::parse("X").unwrap();
        assert!(chord.modifiers.is_empty());
        assert_eq!(chord.key, ChordKey::Key("x".into()));
    }

    #[test]
    fn test_parse_modifiers() {
        let chord = KeyChord::parse("Ctrl+Shift+PageUp").unwrap();
        assert_eq!(chord.modifiers, vec!["ctrl".to_string(), "shift".to_string()]);
        assert_eq!(chord.key, ChordKey::Key("pageup".into()));
    }

    #[test]
    fn test_parse_plus_key() {
        assert_eq!(KeyChord::parse("+").unwrap().key, ChordKey::Key("+".into()));
        let chord = KeyChord::parse("Ctrl++").unwrap();
        assert_eq!(chord.modifiers, vec!["ctrl".to_string()]);
        assert_eq!(chord.key, ChordKey::Key("+".into()));
    }

    #[test]
    fn test_parse_mouse() {
        assert_eq!(
            KeyChord::parse("MouseLeft").unwrap().key,
            ChordKey::Mouse(MouseButton::Left)
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!(KeyChord::parse("").is_none());
        assert!(KeyChord::parse("Ctrl+").is_none());
        assert!(KeyChord::parse("+X").is_none());
        assert!(KeyChord::parse("Hyper+X").is_none());
    }

    #[test]
    fn test_extra_modifiers_do_not_block() {
        let chord = KeyChord::parse("X").unwrap();
        let mut raw = RawInput::new();
        raw.press("x");
        raw.press("shift");
        raw.press("ctrl");
        assert!(chord.is_down(&raw));

        let chord = KeyChord::parse("Ctrl+X").unwrap();
        raw.release("ctrl");
        assert!(!chord.is_down(&raw));
    }

    #[test]
    fn test_invalid_binding_never_pressed() {
        let bindings = KeyBindings {
            rotate_x: "Ctrl+".into(),
            ..Default::default()
        };
        let table = BindingTable::from_bindings(&bindings);
        assert!(table.chord(Action::RotateX).is_none());

        let mut raw = RawInput::new();
        raw.press("ctrl");
        raw.press("x");
        assert!(!table.is_down(Action::RotateX, &raw));
        assert!(table.chord(Action::RotateY).is_some());
    }
}
