//! Error types for task execution

use std::path::PathBuf;

use thiserror::Error;

/// Errors from resolving and running task scripts.
#[derive(Debug, Error)]
pub enum ExecError {
    /// Fence language has no interpreter mapping
    #[error("No interpreter known for language '{0}'")]
    UnknownLanguage(String),

    /// Interpreter binary is not installed
    #[error("Interpreter '{command}' not found on PATH")]
    InterpreterNotFound {
        command: String,
        #[source]
        source: which::Error,
    },

    /// Process could not be spawned
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Piped stream missing after spawn
    #[error("Script process has no {0} pipe")]
    MissingPipe(&'static str),

    /// Process could not be awaited
    #[error("Failed to wait for script process: {0}")]
    Wait(#[source] std::io::Error),

    /// A requirement glob matched nothing
    #[error("Requirement '{pattern}' matched no files under {root}")]
    RequirementUnmet { pattern: String, root: PathBuf },

    /// A requirement glob is malformed
    #[error("Invalid requirement pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// Task has nothing to run
    #[error("Task '{0}' has no runnable script")]
    NoScript(String),

    /// Console failed while the task was streaming
    #[error(transparent)]
    Console(#[from] taskmux_console::ConsoleError),
}
