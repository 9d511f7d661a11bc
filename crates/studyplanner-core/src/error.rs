//! Core error types for studyplanner-core.
//!
//! Every planner command returns [`Result`], so callers see one taxonomy:
//! bad input, unknown references, illegal task transitions, and the two
//! storage failures (write errors and unreadable stores).

use std::path::PathBuf;
use thiserror::Error;

use crate::task::TaskTransitionError;

/// Core error type for studyplanner-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed or invalid input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced entity does not exist
    #[error("{kind} not found: {key}")]
    NotFound { kind: EntityKind, key: String },

    /// Illegal task status transition
    #[error("Invalid state: {0}")]
    InvalidState(#[from] TaskTransitionError),

    /// Writing the state document failed; in-memory state is ahead of disk
    #[error("Failed to save state to {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The state document exists but cannot be trusted
    #[error("Corrupt state file {path}: {reason}")]
    CorruptState { path: PathBuf, reason: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CoreError {
    pub(crate) fn not_found(kind: EntityKind, key: impl Into<String>) -> Self {
        CoreError::NotFound {
            kind,
            key: key.into(),
        }
    }

    /// Process exit code for front-ends.
    pub fn exit_code(&self) -> i32 {
        match self {
            CoreError::Validation(_) => 2,
            CoreError::NotFound { .. } => 3,
            CoreError::InvalidState(_) => 4,
            CoreError::Persistence { .. } => 5,
            CoreError::CorruptState { .. } => 6,
            CoreError::Config(_) => 1,
        }
    }

    /// Whether the user can fix the problem by correcting the command.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CoreError::Validation(_) | CoreError::NotFound { .. } | CoreError::InvalidState(_)
        )
    }
}

/// Entity named in a [`CoreError::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Subject,
    Task,
    Exam,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Subject => write!(f, "Subject"),
            EntityKind::Task => write!(f, "Task"),
            EntityKind::Exam => write!(f, "Exam"),
        }
    }
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required text field is blank
    #[error("'{field}' must not be empty")]
    Empty { field: &'static str },

    /// Weekly hours must be a positive, finite number
    #[error("hours per week must be positive, got {0}")]
    NonPositiveHours(f64),

    /// Subject names are unique ignoring case
    #[error("a subject named '{0}' already exists")]
    DuplicateSubject(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// No usable data directory
    #[error("Cannot determine data directory: {0}")]
    DataDir(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
