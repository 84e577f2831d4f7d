//! Input handling
//!
//! The host hands in a [`RawInput`] each tick. [`InputFrameState`] resolves
//! it against the [`BindingTable`] into an [`InputSnapshot`] carrying edges,
//! taps, hold repeats, wheel intent and typed characters.

pub mod action;
pub mod binding;
pub mod frame;
pub mod raw;
pub mod wheel;

pub use action::{Action, NudgeAxis, RepeatCategory};
pub use binding::{BindingTable, ChordKey, KeyChord};
pub use frame::{InputFrameState, InputSnapshot, InputTiming, KeyState, TypedKey};
pub use raw::{normalize_key, MouseButton, MouseButtons, RawInput};
pub use wheel::{resolve_wheel, WheelIntent, WheelTarget};
