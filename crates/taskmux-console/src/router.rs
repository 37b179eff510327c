//! Single-consumer router that serializes task output onto one destination.

use std::io::Write;

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::bridge::ConsoleLogWriter;
use crate::decoration::DecorationPair;
use crate::error::ConsoleError;
use crate::label::{truncate_label, DEFAULT_LABEL_WIDTH};
use crate::record::{ConsoleRecord, StreamKind};
use crate::scanner::StreamScanner;

/// Tuning knobs for a console channel.
#[derive(Debug, Clone)]
pub struct ConsoleOptions {
    /// Records buffered between scanners and the router.
    pub queue_capacity: usize,
    /// Width labels are truncated to.
    pub label_width: usize,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            label_width: DEFAULT_LABEL_WIDTH,
        }
    }
}

/// Producer half of a console.
///
/// Hands out stream scanners and log writers that all feed the same queue.
/// Dropping the last producer handle is what lets the router finish, so the
/// console is closed by consuming it with [`Console::close`].
#[derive(Debug)]
pub struct Console {
    queue: mpsc::Sender<ConsoleRecord>,
    done: oneshot::Receiver<()>,
    label_width: usize,
}

impl Console {
    /// Cloneable handle for creating scanners away from the owning task.
    ///
    /// Handles keep the queue open, so the router does not finish until
    /// every handle and scanner made from one is dropped.
    pub fn handle(&self) -> ConsoleHandle {
        ConsoleHandle {
            queue: self.queue.clone(),
            label_width: self.label_width,
        }
    }

    /// Scanner for one stream of one task.
    pub fn scanner(&self, pair: DecorationPair, kind: StreamKind, label: &str) -> StreamScanner {
        self.handle().scanner(pair, kind, label)
    }

    /// Writer that routes the process's own log lines through the console.
    pub fn log_writer(&self, label: &str) -> ConsoleLogWriter {
        self.handle().log_writer(label)
    }

    /// Shut the console down and wait for the router to drain.
    ///
    /// Callers stop creating scanners and wait for running scans to finish
    /// first; every record queued before this call is rendered before it
    /// returns.
    pub async fn close(self) -> Result<(), ConsoleError> {
        let Console { queue, done, .. } = self;
        drop(queue);
        done.await.map_err(|_| ConsoleError::RouterStopped)
    }
}

/// Cloneable producer handle onto a console.
#[derive(Debug, Clone)]
pub struct ConsoleHandle {
    queue: mpsc::Sender<ConsoleRecord>,
    label_width: usize,
}

impl ConsoleHandle {
    /// Scanner for one stream of one task.
    ///
    /// The label is truncated here, once, so every record the scanner emits
    /// carries the final rendered form.
    pub fn scanner(&self, pair: DecorationPair, kind: StreamKind, label: &str) -> StreamScanner {
        let label = truncate_label(label, self.label_width).into_owned();
        StreamScanner::new(self.queue.clone(), pair, kind, label)
    }

    /// Writer that routes the process's own log lines through the console.
    ///
    /// The writer only holds the queue weakly; it never keeps the router
    /// alive on its own.
    pub fn log_writer(&self, label: &str) -> ConsoleLogWriter {
        let label = truncate_label(label, self.label_width).into_owned();
        ConsoleLogWriter::new(&self.queue, label)
    }
}

/// Consumer half of a console: the only writer to the destination.
#[derive(Debug)]
pub struct ConsoleRouter<W> {
    queue: mpsc::Receiver<ConsoleRecord>,
    done: oneshot::Sender<()>,
    dest: W,
}

impl<W: Write> ConsoleRouter<W> {
    /// Render records until every producer is gone and the queue is drained.
    pub async fn route(mut self) -> Result<(), ConsoleError> {
        let mut routed = 0usize;
        while let Some(record) = self.queue.recv().await {
            render(&mut self.dest, &record)?;
            self.dest.flush().map_err(ConsoleError::Write)?;
            routed += 1;
        }
        debug!(records = routed, "Console queue drained");
        // The producer half may already be gone; nothing to signal then.
        let _ = self.done.send(());
        Ok(())
    }
}

/// Create a connected console and router over `dest`.
pub fn channel<W: Write>(dest: W, options: ConsoleOptions) -> (Console, ConsoleRouter<W>) {
    let (queue_tx, queue_rx) = mpsc::channel(options.queue_capacity);
    let (done_tx, done_rx) = oneshot::channel();
    (
        Console {
            queue: queue_tx,
            done: done_rx,
            label_width: options.label_width,
        },
        ConsoleRouter {
            queue: queue_rx,
            done: done_tx,
            dest,
        },
    )
}

/// Write one record as `<label> <text>\n`, both halves in the decoration
/// the record's stream maps to.
fn render<W: Write>(dest: &mut W, record: &ConsoleRecord) -> Result<(), ConsoleError> {
    let decoration = record.pair.for_stream(record.kind);
    writeln!(
        dest,
        "{} {}",
        decoration.paint(record.label()),
        decoration.paint(record.text())
    )?;
    Ok(())
}
