//! Error types for the placement engine

use thiserror::Error;

use crate::host::NodeId;

/// Settings loading and saving errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid TOML for the settings schema
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Settings could not be encoded as TOML
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Session lifecycle errors
///
/// Per-tick work never fails; these only surface from explicit
/// enter/exit calls made by the host.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// A transform session was requested with nothing to transform
    #[error("No valid target nodes to transform")]
    NoTargets,

    /// A node handed to the engine does not exist in the host scene
    #[error("Target node not found: {0}")]
    TargetNotFound(NodeId),

    /// The host refused to create a preview instance
    #[error("Failed to spawn placement preview for '{0}'")]
    PreviewSpawnFailed(String),

    /// Strategy name did not match any registered strategy
    #[error("Unknown placement strategy: {0}")]
    UnknownStrategy(String),

    /// Settings problem
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Result type for engine lifecycle operations
pub type Result<T> = std::result::Result<T, PlacementError>;
