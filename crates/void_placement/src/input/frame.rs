//! Per-tick input state: edges, tap/hold classification and key repeat.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::action::{Action, RepeatCategory};
use super::binding::BindingTable;
use super::raw::{MouseButton, MouseButtons, RawInput};
use super::wheel::{resolve_wheel, WheelIntent};
use crate::increment::IncrementModifiers;

/// Tap grace and repeat intervals, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputTiming {
    /// Presses released within this window are taps
    pub tap_grace_ms: f64,
    pub rotation_repeat_ms: f64,
    pub scale_repeat_ms: f64,
    pub height_repeat_ms: f64,
    pub position_repeat_ms: f64,
    /// Numeric entry expires after this long without a keystroke
    pub numeric_timeout_ms: f64,
}

impl Default for InputTiming {
    fn default() -> Self {
        Self {
            tap_grace_ms: 150.0,
            rotation_repeat_ms: 100.0,
            scale_repeat_ms: 80.0,
            height_repeat_ms: 80.0,
            position_repeat_ms: 50.0,
            numeric_timeout_ms: 3000.0,
        }
    }
}

impl InputTiming {
    /// Grace period in seconds.
    pub fn grace(&self) -> f64 {
        self.tap_grace_ms / 1000.0
    }

    /// Repeat interval in seconds.
    pub fn repeat_interval(&self, category: RepeatCategory) -> f64 {
        let ms = match category {
            RepeatCategory::Rotation => self.rotation_repeat_ms,
            RepeatCategory::Scale => self.scale_repeat_ms,
            RepeatCategory::Height => self.height_repeat_ms,
            RepeatCategory::Position => self.position_repeat_ms,
        };
        ms / 1000.0
    }

    pub fn numeric_timeout(&self) -> f64 {
        self.numeric_timeout_ms / 1000.0
    }
}

/// State of one action this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeyState {
    pub pressed: bool,
    pub just_pressed: bool,
    pub just_released: bool,
    /// Seconds since the press, zero when up
    pub held_duration: f64,
}

/// A just-pressed key relevant to numeric entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TypedKey {
    Char(char),
    Backspace,
    Enter,
    Escape,
}

impl TypedKey {
    fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "backspace" => Some(Self::Backspace),
            "enter" => Some(Self::Enter),
            "escape" => Some(Self::Escape),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_digit() || ".+-=".contains(c) => {
                        Some(Self::Char(c))
                    }
                    _ => None,
                }
            }
        }
    }
}

/// Everything the session reads about input for one tick.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    /// Seconds since the input state was created
    pub time: f64,
    keys: HashMap<Action, KeyState>,
    pub cursor: Option<Vec2>,
    pub mouse: MouseButtons,
    mouse_just_pressed: MouseButtons,
    pub modifiers: IncrementModifiers,
    /// Keys released within the grace period this tick
    pub taps: Vec<Action>,
    /// Repeat fires this tick; a long tick may fire the same key more than once
    pub repeats: Vec<(Action, u32)>,
    pub wheel: WheelIntent,
    pub typed: Vec<TypedKey>,
}

impl InputSnapshot {
    pub fn key(&self, action: Action) -> KeyState {
        self.keys.get(&action).copied().unwrap_or_default()
    }

    pub fn pressed(&self, action: Action) -> bool {
        self.key(action).pressed
    }

    pub fn just_pressed(&self, action: Action) -> bool {
        self.key(action).just_pressed
    }

    pub fn just_released(&self, action: Action) -> bool {
        self.key(action).just_released
    }

    pub fn mouse_just_pressed(&self, button: MouseButton) -> bool {
        self.mouse_just_pressed.is_down(button)
    }

    pub fn tapped(&self, action: Action) -> bool {
        self.taps.contains(&action)
    }

    pub fn repeat_count(&self, action: Action) -> u32 {
        self.repeats
            .iter()
            .filter(|(a, _)| *a == action)
            .map(|(_, n)| *n)
            .sum()
    }
}

#[derive(Debug, Clone)]
struct KeyTimer {
    pressed_at: f64,
    pending_tap: bool,
    holding: bool,
    fired: u32,
    hold_modifiers: IncrementModifiers,
    /// Wheel was used while held; ignored until released
    interrupted: bool,
    /// Repeat stopped by another key or a modifier change
    repeat_cancelled: bool,
}

impl KeyTimer {
    fn new(now: f64) -> Self {
        Self {
            pressed_at: now,
            pending_tap: true,
            holding: false,
            fired: 0,
            hold_modifiers: IncrementModifiers::NONE,
            interrupted: false,
            repeat_cancelled: false,
        }
    }
}

/// Turns raw device state into an [`InputSnapshot`] once per tick.
#[derive(Debug, Clone, Default)]
pub struct InputFrameState {
    timing: InputTiming,
    now: f64,
    previous: HashSet<Action>,
    previous_keys: HashSet<String>,
    previous_mouse: MouseButtons,
    pressed_at: HashMap<Action, f64>,
    timers: HashMap<Action, KeyTimer>,
    repeating: Option<Action>,
    snapshot: InputSnapshot,
}

impl InputFrameState {
    pub fn new(timing: InputTiming) -> Self {
        Self {
            timing,
            ..Default::default()
        }
    }

    pub fn timing(&self) -> &InputTiming {
        &self.timing
    }

    pub fn set_timing(&mut self, timing: InputTiming) {
        self.timing = timing;
    }

    pub fn time(&self) -> f64 {
        self.now
    }

    pub fn snapshot(&self) -> &InputSnapshot {
        &self.snapshot
    }

    /// Key currently firing repeats, if any.
    pub fn repeating(&self) -> Option<Action> {
        self.repeating
    }

    /// Advance by `dt` seconds and rebuild the snapshot.
    pub fn update(&mut self, raw: &RawInput, bindings: &BindingTable, dt: f64) -> &InputSnapshot {
        if dt.is_finite() && dt > 0.0 {
            self.now += dt;
        }
        let now = self.now;

        let current: HashSet<Action> = Action::ALL
            .into_iter()
            .filter(|action| bindings.is_down(*action, raw))
            .collect();

        let modifiers = IncrementModifiers {
            reverse: current.contains(&Action::Reverse),
            large: current.contains(&Action::Large),
            fine: current.contains(&Action::Fine),
        };

        let mut keys = HashMap::with_capacity(current.len());
        for action in Action::ALL {
            let down = current.contains(&action);
            let was = self.previous.contains(&action);
            if down && !was {
                self.pressed_at.insert(action, now);
            }
            let held_duration = if down {
                self.pressed_at.get(&action).map(|t| now - t).unwrap_or(0.0)
            } else {
                self.pressed_at.remove(&action);
                0.0
            };
            if down || was {
                keys.insert(
                    action,
                    KeyState {
                        pressed: down,
                        just_pressed: down && !was,
                        just_released: !down && was,
                        held_duration,
                    },
                );
            }
        }

        let mut typed: Vec<TypedKey> = raw
            .keys_down()
            .iter()
            .filter(|k| !self.previous_keys.contains(*k))
            .filter_map(|k| TypedKey::from_key_name(k))
            .collect();
        typed.sort();

        let mouse = raw.mouse;
        let mouse_just_pressed = MouseButtons {
            left: mouse.left && !self.previous_mouse.left,
            right: mouse.right && !self.previous_mouse.right,
            middle: mouse.middle && !self.previous_mouse.middle,
        };

        let mut taps = Vec::new();
        let mut repeats = Vec::new();
        for action in Action::REPEATABLE {
            let down = current.contains(&action);
            let was = self.previous.contains(&action);
            if down && !was {
                self.timers.insert(action, KeyTimer::new(now));
            } else if !down && was {
                if let Some(timer) = self.timers.remove(&action) {
                    if timer.pending_tap && !timer.interrupted {
                        taps.push(action);
                    }
                }
                if self.repeating == Some(action) {
                    self.repeating = None;
                }
            }
        }

        let wheel = self.resolve_wheel_with(raw.wheel_steps, modifiers, &current);

        for action in Action::REPEATABLE {
            if current.contains(&action) {
                if let Some(fires) = self.advance_hold(action, modifiers) {
                    repeats.push((action, fires));
                }
            }
        }

        self.previous = current;
        self.previous_keys = raw.keys_down().clone();
        self.previous_mouse = mouse;

        self.snapshot = InputSnapshot {
            time: now,
            keys,
            cursor: raw.cursor,
            mouse,
            mouse_just_pressed,
            modifiers,
            taps,
            repeats,
            wheel,
            typed,
        };
        &self.snapshot
    }

    /// Resolve a wheel delta against the keys held in the last snapshot.
    ///
    /// The owning key loses its pending tap and stays silent until it is
    /// released and pressed again.
    pub fn resolve_wheel(&mut self, wheel_steps: f32) -> WheelIntent {
        let held = self.previous.clone();
        let modifiers = self.snapshot.modifiers;
        self.resolve_wheel_with(wheel_steps, modifiers, &held)
    }

    fn resolve_wheel_with(
        &mut self,
        wheel_steps: f32,
        modifiers: IncrementModifiers,
        held: &HashSet<Action>,
    ) -> WheelIntent {
        let intent = resolve_wheel(wheel_steps, modifiers, |action| held.contains(&action));
        if let WheelIntent::Step { owner, .. } = intent {
            if let Some(timer) = self.timers.get_mut(&owner) {
                timer.interrupted = true;
                timer.pending_tap = false;
                timer.holding = false;
            }
            if self.repeating == Some(owner) {
                self.repeating = None;
            }
        }
        intent
    }

    /// Hold demotion and repeat counting for one held key.
    fn advance_hold(&mut self, action: Action, modifiers: IncrementModifiers) -> Option<u32> {
        let grace = self.timing.grace();
        let interval = self.timing.repeat_interval(action.category()?);
        let now = self.now;

        let demoted = {
            let timer = self.timers.get_mut(&action)?;
            if timer.interrupted || timer.repeat_cancelled {
                return None;
            }
            if timer.pending_tap && now - timer.pressed_at >= grace {
                timer.pending_tap = false;
                timer.holding = true;
                timer.fired = 0;
                timer.hold_modifiers = modifiers;
                true
            } else {
                false
            }
        };

        if demoted {
            if let Some(previous) = self.repeating.replace(action) {
                if previous != action {
                    if let Some(timer) = self.timers.get_mut(&previous) {
                        timer.repeat_cancelled = true;
                    }
                }
            }
        }

        if self.repeating != Some(action) {
            return None;
        }

        let timer = self.timers.get_mut(&action)?;
        if !timer.holding {
            return None;
        }
        if timer.hold_modifiers != modifiers {
            log::debug!("Repeat of {} cancelled by modifier change", action);
            timer.repeat_cancelled = true;
            self.repeating = None;
            return None;
        }

        if interval <= 0.0 {
            return None;
        }
        let count = ((now - timer.pressed_at - grace) / interval).floor().max(0.0) as u32;
        if count > timer.fired {
            let fires = count - timer.fired;
            timer.fired = count;
            Some(fires)
        } else {
            None
        }
    }
}
