//! Error types for the console

use thiserror::Error;

use crate::record::StreamKind;

/// Errors surfaced by console scanners and the router.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// A task stream could not be read
    #[error("Failed to read task {kind} stream: {source}")]
    Read {
        kind: StreamKind,
        #[source]
        source: std::io::Error,
    },

    /// The console shut down while a scanner still had lines to deliver
    #[error("Console queue closed before the stream finished")]
    QueueClosed,

    /// The console destination rejected a write
    #[error("Failed to write console record: {0}")]
    Write(#[from] std::io::Error),

    /// The router stopped without confirming the queue was drained
    #[error("Console router stopped before close completed")]
    RouterStopped,
}
