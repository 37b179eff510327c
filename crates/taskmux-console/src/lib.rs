//! Taskmux Console - Concurrent output multiplexer
//!
//! This crate merges the stdout and stderr streams of concurrently running
//! tasks onto one destination without interleaving partial lines. Scanners
//! segment each stream into lines, a bounded queue carries the records, and
//! a single router renders them with per-task color decorations.

pub mod bridge;
pub mod decoration;
pub mod error;
pub mod label;
pub mod pool;
pub mod record;
pub mod router;
pub mod scanner;
pub mod splitter;

pub use bridge::ConsoleLogWriter;
pub use decoration::{Decoration, DecorationPair, LOG_DECORATIONS, PALETTE};
pub use error::ConsoleError;
pub use label::{truncate_label, DEFAULT_LABEL_WIDTH};
pub use pool::{DecorationGuard, DecorationPool};
pub use record::{ConsoleRecord, ScannerId, StreamKind};
pub use router::{channel, Console, ConsoleHandle, ConsoleOptions, ConsoleRouter};
pub use scanner::StreamScanner;
pub use splitter::{next_line, Split, Terminator};
