//! Error types for Taskmux

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using TaskmuxError
pub type Result<T> = std::result::Result<T, TaskmuxError>;

/// Main error type for Taskmux operations
#[derive(Debug, Error)]
pub enum TaskmuxError {
    /// Task document errors
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Task document errors
#[derive(Debug, Error)]
pub enum DocumentError {
    /// No task document found
    #[error("Task document '{name}' not found in {start} or any parent directory")]
    NotFound { name: String, start: PathBuf },

    /// Document could not be read
    #[error("Failed to read task document {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two tasks share a name
    #[error("Duplicate task '{name}' at line {line}")]
    DuplicateTask { name: String, line: usize },

    /// Task heading with no text
    #[error("Task heading at line {line} has no name")]
    EmptyTaskName { line: usize },

    /// Code fence opened but never closed
    #[error("Code fence opened at line {line} is never closed")]
    UnclosedFence { line: usize },

    /// Requested task does not exist
    #[error("No task named '{0}' in the document")]
    UnknownTask(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}
