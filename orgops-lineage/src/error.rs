//! Error types for lineage editing and persistence

use crate::editor::SaveBlocker;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for lineage operations
pub type Result<T> = std::result::Result<T, LineageError>;

/// Errors that can occur while editing or persisting lineages
#[derive(Debug, Error)]
pub enum LineageError {
    /// No rows exist for the lineage name
    #[error("lineage not found: {name}")]
    LineageNotFound { name: String },

    /// Another lineage already uses the name
    #[error("lineage already exists: {name}")]
    LineageExists { name: String },

    /// Position id is not in the assignable pool
    #[error("position not found: {id}")]
    PositionNotFound { id: i64 },

    /// Level index past the end of the model
    #[error("level index {index} out of range for {len} levels")]
    LevelOutOfRange { index: usize, len: usize },

    /// The first level anchors the chain and cannot be removed from the editor
    #[error("the root level cannot be removed")]
    RootLevelLocked,

    /// Save attempted while the editor is not ready
    #[error("save blocked: {0}")]
    SaveBlocked(SaveBlocker),

    /// An editor session is already open
    #[error("an editor session is already open")]
    SessionBusy,

    /// No editor session is open
    #[error("no editor session is open")]
    SessionClosed,

    /// Parse error
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Missing required field
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Store lock is held by another process
    #[error("lock busy - another operation in progress")]
    LockBusy,

    /// Store directory has not been initialized
    #[error("store not initialized at {path}")]
    NotInitialized { path: PathBuf },

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LineageError {
    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockBusy)
    }
}

impl From<figment::Error> for LineageError {
    fn from(error: figment::Error) -> Self {
        Self::Config(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LineageError::LineageNotFound {
            name: "Ops Chain".into(),
        };
        assert_eq!(err.to_string(), "lineage not found: Ops Chain");
    }

    #[test]
    fn test_save_blocked_display() {
        let err = LineageError::SaveBlocked(SaveBlocker::UnassignedLevel { level: 2 });
        assert_eq!(err.to_string(), "save blocked: level 2 has no position");
    }

    #[test]
    fn test_invalid_value() {
        let err = LineageError::invalid_value("position_ids[1]", "not a number: abc");
        assert!(err.to_string().contains("position_ids[1]"));
    }

    #[test]
    fn test_retryable() {
        assert!(LineageError::LockBusy.is_retryable());
        assert!(!LineageError::RootLevelLocked.is_retryable());
    }
}
