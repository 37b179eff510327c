//! Taskmux Exec - Script spawning and concurrent execution
//!
//! This crate turns parsed tasks into running processes: it picks the
//! interpreter for each fenced script, checks file requirements, and runs
//! tasks under a concurrency limit with their output multiplexed onto a
//! shared console.

pub mod error;
pub mod executor;
pub mod requires;
pub mod runner;

pub use error::ExecError;
pub use executor::{ExecutorOptions, TaskExecutor, TaskOutcome, TaskStatus};
pub use requires::check_requirements;
pub use runner::{interpreter_for, spawn_script, Interpreter, RunningScript};
