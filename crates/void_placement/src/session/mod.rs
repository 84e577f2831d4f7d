//! Session state machine
//!
//! [`PlacementEngine`] is the single owner of all per-session state. At
//! most one session runs at a time:
//!
//! ```text
//! Inactive ──start_placement──▶ Placing ──confirm/cancel──▶ Inactive
//! Inactive ──start_transform──▶ Transforming ──confirm/cancel──▶ Inactive
//! ```
//!
//! Starting a session always tears down the current one first, as a
//! cancel.

mod controls;
mod placing;
mod status;
mod transforming;

pub use placing::{PlacingSession, RAY_LENGTH};
pub use status::{SessionKind, StatusPayload};
pub use transforming::{TargetState, TransformSession};

use controls::{Controls, Frame};

use crate::config::Settings;
use crate::error::{PlacementError, Result};
use crate::host::{MeshDescriptor, NodeId, SceneHost};
use crate::input::{Action, BindingTable, InputFrameState, RawInput, TypedKey};
use crate::placement::PlacementStrategies;
use crate::transform::CarriedTransform;

/// Current session.
#[derive(Debug, Default)]
pub enum SessionMode {
    #[default]
    Inactive,
    Placing(Box<PlacingSession>),
    Transforming(Box<TransformSession>),
}

impl SessionMode {
    pub fn kind(&self) -> SessionKind {
        match self {
            SessionMode::Inactive => SessionKind::Inactive,
            SessionMode::Placing(_) => SessionKind::Placing,
            SessionMode::Transforming(_) => SessionKind::Transforming,
        }
    }

    fn controls(&self) -> Option<&Controls> {
        match self {
            SessionMode::Inactive => None,
            SessionMode::Placing(s) => Some(&s.controls),
            SessionMode::Transforming(s) => Some(&s.controls),
        }
    }

    fn controls_mut(&mut self) -> Option<&mut Controls> {
        match self {
            SessionMode::Inactive => None,
            SessionMode::Placing(s) => Some(&mut s.controls),
            SessionMode::Transforming(s) => Some(&mut s.controls),
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Confirmed,
    Cancelled,
}

/// Result of one [`PlacementEngine::tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub status: StatusPayload,
    /// The wheel was used by the session; the host should not zoom
    pub wheel_consumed: bool,
    pub ended: Option<SessionEnd>,
}

/// What a session step reports back to the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct StepOutcome {
    pub enter_consumed: bool,
    pub wheel_consumed: bool,
    /// Every target is gone
    pub lost: bool,
}

impl StepOutcome {
    pub fn lost() -> Self {
        Self {
            lost: true,
            ..Default::default()
        }
    }
}

/// Interactive placement and transform engine.
#[derive(Debug)]
pub struct PlacementEngine {
    settings: Settings,
    bindings: BindingTable,
    input: InputFrameState,
    strategies: PlacementStrategies,
    carried: CarriedTransform,
    mode: SessionMode,
    status: StatusPayload,
}

impl Default for PlacementEngine {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl PlacementEngine {
    pub fn new(settings: Settings) -> Self {
        let settings = settings.sanitized();
        let bindings = BindingTable::from_bindings(&settings.bindings);
        let input = InputFrameState::new(settings.timing.clone());
        let strategies = PlacementStrategies::new(settings.placement.strategy);
        let mut engine = Self {
            settings,
            bindings,
            input,
            strategies,
            carried: CarriedTransform::default(),
            mode: SessionMode::Inactive,
            status: StatusPayload::default(),
        };
        engine.refresh_status();
        engine
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings. Bindings are re-parsed; a running session
    /// keeps its snap configuration.
    pub fn set_settings(&mut self, settings: &Settings) {
        let settings = settings.sanitized();
        if settings.bindings != self.settings.bindings {
            self.bindings = BindingTable::from_bindings(&settings.bindings);
        }
        self.input.set_timing(settings.timing.clone());
        self.strategies.set_active(settings.placement.strategy);
        self.settings = settings;
    }

    pub fn strategies(&self) -> &PlacementStrategies {
        &self.strategies
    }

    pub fn strategies_mut(&mut self) -> &mut PlacementStrategies {
        &mut self.strategies
    }

    pub fn input(&self) -> &InputFrameState {
        &self.input
    }

    /// Adjustments the next placement session starts from.
    pub fn carried(&self) -> &CarriedTransform {
        &self.carried
    }

    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.mode, SessionMode::Inactive)
    }

    pub fn status(&self) -> &StatusPayload {
        &self.status
    }

    /// Start placing a new instance of `mesh`.
    pub fn start_placement(
        &mut self,
        host: &mut dyn SceneHost,
        mesh: &MeshDescriptor,
        settings: &Settings,
    ) -> Result<()> {
        self.exit_any_mode(host);
        self.set_settings(settings);

        let preview = host
            .spawn_preview(mesh)
            .ok_or_else(|| PlacementError::PreviewSpawnFailed(mesh.name.clone()))?;
        let bounds = mesh.bounds.or_else(|| host.node_bounds(preview));

        let session = PlacingSession::new(preview, mesh.clone(), bounds, &self.carried, &self.settings);
        self.mode = SessionMode::Placing(Box::new(session));
        log::info!("Placement started: '{}' as {}", mesh.name, preview);
        self.refresh_status();
        Ok(())
    }

    /// Start transforming existing nodes.
    ///
    /// Nodes that do not exist are skipped; it is an error only when none
    /// are left.
    pub fn start_transform(
        &mut self,
        host: &mut dyn SceneHost,
        targets: &[NodeId],
        settings: &Settings,
    ) -> Result<()> {
        self.exit_any_mode(host);
        self.set_settings(settings);

        let first = targets.first().copied().ok_or(PlacementError::NoTargets)?;

        let mut states = Vec::with_capacity(targets.len());
        for &node in targets {
            if states.iter().any(|t: &TargetState| t.node == node) {
                continue;
            }
            match host.node_transform(node).filter(|_| host.node_exists(node)) {
                Some(original) => states.push(TargetState { node, original }),
                None => log::warn!("Skipping missing transform target {}", node),
            }
        }
        if states.is_empty() {
            return Err(PlacementError::TargetNotFound(first));
        }

        let bounds = match states.as_slice() {
            [single] => host.node_bounds(single.node),
            _ => None,
        };
        let count = states.len();
        let session = TransformSession::new(states, bounds, &self.settings);
        self.mode = SessionMode::Transforming(Box::new(session));
        log::info!("Transform started on {} node(s)", count);
        self.refresh_status();
        Ok(())
    }

    /// End the current session. Confirm keeps the current transform,
    /// cancel restores what was there at entry.
    pub fn exit(&mut self, host: &mut dyn SceneHost, confirm: bool) -> Option<SessionEnd> {
        let mode = std::mem::take(&mut self.mode);
        let end = if confirm {
            SessionEnd::Confirmed
        } else {
            SessionEnd::Cancelled
        };

        match mode {
            SessionMode::Inactive => return None,
            SessionMode::Placing(mut session) => {
                let preview = session.preview();
                if confirm {
                    session.controls.commit_numeric();
                    session.write(host);
                    host.commit_preview(preview);
                    log::info!(
                        "Placement confirmed: '{}' at {:?}",
                        session.mesh().name,
                        session.transform().position
                    );
                } else {
                    host.discard_preview(preview);
                    log::info!("Placement cancelled: '{}'", session.mesh().name);
                }
                self.carried = session.transform().carried();
                self.carried.apply_exit_policy(&self.settings.exit_reset);
            }
            SessionMode::Transforming(mut session) => {
                if confirm {
                    session.controls.commit_numeric();
                    session.apply(host);
                    log::info!("Transform confirmed on {} node(s)", session.targets().len());
                } else {
                    session.restore(host);
                    log::info!("Transform cancelled, {} node(s) restored", session.targets().len());
                }
            }
        }

        self.refresh_status();
        Some(end)
    }

    /// Cancel whatever session is running.
    pub fn exit_any_mode(&mut self, host: &mut dyn SceneHost) -> Option<SessionEnd> {
        if self.is_active() {
            self.exit(host, false)
        } else {
            None
        }
    }

    /// Advance one frame.
    pub fn tick(&mut self, host: &mut dyn SceneHost, raw: &RawInput, dt: f64) -> TickReport {
        let snapshot = self.input.update(raw, &self.bindings, dt).clone();

        if !self.is_active() {
            return self.report(false, None);
        }

        // Cancel runs before any transform work this tick
        let escape_typed = snapshot.typed.contains(&TypedKey::Escape);
        let escape_consumed = escape_typed
            && self
                .mode
                .controls_mut()
                .map(|c| c.discard_typing())
                .unwrap_or(false);
        let cancel = snapshot.just_pressed(Action::CancelClick)
            || (snapshot.just_pressed(Action::CancelKey) && !escape_consumed);
        if cancel {
            let ended = self.exit(host, false);
            return self.report(false, ended);
        }

        let frame = Frame {
            snapshot: &snapshot,
            settings: &self.settings,
            multipliers: self.settings.increments.multipliers(),
            camera: host.camera(),
            viewport: host.viewport_size(),
        };

        let outcome = match &mut self.mode {
            SessionMode::Inactive => StepOutcome::default(),
            SessionMode::Placing(session) => session.step(host, &frame, &mut self.strategies),
            SessionMode::Transforming(session) => session.step(host, &frame),
        };

        if outcome.lost {
            log::warn!("All session targets lost, cancelling");
            let ended = self.exit(host, false);
            return self.report(outcome.wheel_consumed, ended);
        }

        let confirm = snapshot.just_pressed(Action::ConfirmClick)
            || (snapshot.just_pressed(Action::ConfirmKey) && !outcome.enter_consumed);
        let ended = if confirm { self.exit(host, true) } else { None };
        self.report(outcome.wheel_consumed, ended)
    }

    fn report(&mut self, wheel_consumed: bool, ended: Option<SessionEnd>) -> TickReport {
        self.refresh_status();
        TickReport {
            status: self.status.clone(),
            wheel_consumed,
            ended,
        }
    }

    fn refresh_status(&mut self) {
        let strategy = self.strategies.active();
        let session = self.mode.kind();
        let targets = match &self.mode {
            SessionMode::Inactive => 0,
            SessionMode::Placing(_) => 1,
            SessionMode::Transforming(s) => s.targets().len(),
        };

        self.status = match self.mode.controls() {
            None => StatusPayload {
                strategy,
                ..StatusPayload::default()
            },
            Some(controls) => {
                let state = &controls.state;
                StatusPayload {
                    session,
                    modal: controls.modal.kind(),
                    constraint: controls.constraint().map(|c| c.axes()),
                    numeric: controls.numeric_text(),
                    position: state.position,
                    rotation: state.rotation.degrees(),
                    scale: state.scale.vector(),
                    height_offset: state.height_offset,
                    strategy,
                    snap_enabled: state.snap.enabled,
                    targets,
                }
            }
        };
    }
}
