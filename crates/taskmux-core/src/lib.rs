//! Taskmux Core - Task documents and configuration
//!
//! This crate owns the markdown task document model, document and config
//! discovery, and runner configuration.

pub mod config;
pub mod document;
pub mod error;
pub mod markdown;
pub mod resolver;

pub use config::{
    find_config, load_config, load_config_or_default, validate_config, Config, ConsoleConfig,
    RunnerConfig,
};
pub use document::{Document, Script, Task};
pub use error::{ConfigError, DocumentError, Result, TaskmuxError};
pub use markdown::{load_document, parse_document};
pub use resolver::{find_document, resolve_document, DEFAULT_DOCUMENT_NAME};
