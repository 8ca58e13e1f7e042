//! CLI-specific error types for tasknest
//!
//! These errors wrap core errors and add CLI-specific error variants.

use thiserror::Error;

use tasknest_core::{CoreError, TaskId};

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Task #{0} not found")]
    TaskNotFound(TaskId),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CliError {
    /// Create a config error with source
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a parse error with source
    pub fn parse_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Parse {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Create a storage error with source
    pub fn storage_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            context: "IO operation failed".to_string(),
            source: err,
        }
    }
}

impl From<confy::ConfyError> for CliError {
    fn from(err: confy::ConfyError) -> Self {
        Self::config_with_source("Failed to load configuration", err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse_with_source("JSON parsing failed", err)
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::TaskNotFound(id) => Self::TaskNotFound(id),
            CoreError::NothingToUndo => Self::NothingToUndo,
            CoreError::Parse { message, source } => Self::Parse { message, source },
            CoreError::Validation { field, message } => Self::Validation { field, message },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_cli_variants() {
        let err: CliError = CoreError::TaskNotFound(TaskId(7)).into();
        assert!(matches!(err, CliError::TaskNotFound(TaskId(7))));
        assert_eq!(err.to_string(), "Task #7 not found");

        let err: CliError = CoreError::validation("text", "empty").into();
        assert!(matches!(err, CliError::Validation { .. }));

        let err: CliError = CoreError::NothingToUndo.into();
        assert!(matches!(err, CliError::NothingToUndo));
    }
}
