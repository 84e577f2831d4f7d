//! Void Placement - Interactive Placement and Transform Engine
//!
//! Places new instances into a scene and transforms existing ones under
//! keyboard and mouse control, the way an editor viewport does.
//!
//! # Features
//!
//! - Tap, hold-to-repeat and wheel input with modifier multipliers
//! - Collision and plane placement strategies
//! - Grid, edge and pivot snapping
//! - Modal position, rotation and scale with axis constraints
//! - Typed numeric values
//! - Multi-target transform with cancel-to-restore
//!
//! # Architecture
//!
//! ```text
//! RawInput ──▶ InputFrameState ──▶ InputSnapshot
//!                                       │
//!                                       ▼
//!                              PlacementEngine::tick
//!                          ┌────────────┴────────────┐
//!                          ▼                         ▼
//!                   PlacingSession           TransformSession
//!                          │                         │
//!                          └──────▶ SceneHost ◀──────┘
//! ```
//!
//! The engine never owns the scene. A host implements [`SceneHost`];
//! [`sim::SimulatedScene`] is an in-memory one.
//!
//! # Example
//!
//! ```ignore
//! use void_placement::prelude::*;
//!
//! let mut scene = SimulatedScene::default();
//! let mut engine = PlacementEngine::new(Settings::default());
//! let settings = engine.settings().clone();
//! engine.start_placement(&mut scene, &MeshDescriptor::new("crate"), &settings)?;
//!
//! let mut raw = RawInput::new();
//! raw.cursor = scene.cursor_for(Vec3::new(2.3, 0.0, 4.7));
//! let report = engine.tick(&mut scene, &raw, 1.0 / 60.0);
//! println!("{}", report.status);
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod increment;
pub mod input;
pub mod modal;
pub mod numeric;
pub mod placement;
pub mod session;
pub mod sim;
pub mod snap;
pub mod transform;

pub mod prelude {
    //! Common imports for hosts driving the engine
    pub use crate::config::{IncrementSettings, KeyBindings, ModalSettings, PlacementSettings, Settings};
    pub use crate::error::{PlacementError, Result, SettingsError};
    pub use crate::geometry::{Aabb, Ray};
    pub use crate::host::{CameraFrame, GeometryQuery, MeshDescriptor, NodeId, NodeTransform, RayHit, SceneHost};
    pub use crate::input::{Action, InputFrameState, InputSnapshot, InputTiming, MouseButton, RawInput};
    pub use crate::modal::{AxisSet, ModalKind, ModalState};
    pub use crate::placement::{PlacementStrategy, StrategyKind};
    pub use crate::session::{PlacementEngine, SessionEnd, SessionKind, SessionMode, StatusPayload, TickReport};
    pub use crate::sim::SimulatedScene;
    pub use crate::snap::{SnapConfig, SnapMode};
    pub use crate::transform::{Axis, ExitResetPolicy};
    pub use glam::{Vec2, Vec3};
}

pub use prelude::*;
