//! Routes the process's own log output through the console.

use std::io::{self, Write};

use tokio::sync::mpsc;
use tracing_subscriber::fmt::MakeWriter;

use crate::decoration::LOG_DECORATIONS;
use crate::record::{ConsoleRecord, ScannerId, StreamKind};
use crate::splitter::{next_line, Split, Terminator};

/// `io::Write` adapter that turns log lines into console records.
///
/// The writer holds only a weak handle on the queue, so a subscriber
/// installed for the life of the process never keeps the console open after
/// its producer half is closed. Lines that cannot be queued fall back to
/// plain stderr instead of being dropped.
#[derive(Debug, Clone)]
pub struct ConsoleLogWriter {
    queue: mpsc::WeakSender<ConsoleRecord>,
    sender: ScannerId,
    label: String,
}

impl ConsoleLogWriter {
    pub(crate) fn new(queue: &mpsc::Sender<ConsoleRecord>, label: String) -> Self {
        Self {
            queue: queue.downgrade(),
            sender: ScannerId::next(),
            label,
        }
    }

    fn record(&self, text: &str, terminator: Terminator) -> ConsoleRecord {
        ConsoleRecord {
            sender: self.sender,
            terminator,
            pair: LOG_DECORATIONS,
            kind: StreamKind::Stderr,
            label: self.label.clone(),
            text: text.to_string(),
        }
    }
}

impl Write for ConsoleLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut rest: &[u8] = buf;
        while let Split::Line {
            consumed,
            text,
            terminator,
        } = next_line(rest, true)
        {
            let text = String::from_utf8_lossy(text);
            let record = self.record(&text, terminator);
            let queued = self
                .queue
                .upgrade()
                .and_then(|queue| queue.try_send(record).ok())
                .is_some();
            if !queued {
                // Router gone or queue full; the log line still has to land
                // somewhere.
                let mut stderr = io::stderr().lock();
                writeln!(stderr, "{} {}", self.label, text)?;
            }
            rest = &rest[consumed..];
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for ConsoleLogWriter {
    type Writer = ConsoleLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_line_becomes_a_record() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut writer = ConsoleLogWriter::new(&tx, "taskmux".to_string());
        writer.write_all(b"Starting 3 tasks\n").unwrap();

        let record = rx.try_recv().unwrap();
        assert_eq!(record.label(), "taskmux");
        assert_eq!(record.text(), "Starting 3 tasks");
        assert_eq!(record.kind(), StreamKind::Stderr);
        assert_eq!(record.terminator(), Terminator::Lf);
    }

    #[test]
    fn test_multi_line_write_emits_one_record_per_line() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut writer = ConsoleLogWriter::new(&tx, "log".to_string());
        writer.write_all(b"first\nsecond\n").unwrap();

        assert_eq!(rx.try_recv().unwrap().text(), "first");
        assert_eq!(rx.try_recv().unwrap().text(), "second");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_write_after_console_close_still_succeeds() {
        let (tx, rx) = mpsc::channel(8);
        let mut writer = ConsoleLogWriter::new(&tx, "orphan".to_string());
        drop(rx);
        drop(tx);

        // All strong queue handles are gone; the write falls back to stderr
        // and must not error.
        assert!(writer.write_all(b"left behind\n").is_ok());
    }

    #[test]
    fn test_make_writer_clones_share_the_queue() {
        let (tx, mut rx) = mpsc::channel(8);
        let writer = ConsoleLogWriter::new(&tx, "shared".to_string());

        let mut clone = writer.make_writer();
        clone.write_all(b"via clone\n").unwrap();

        assert_eq!(rx.try_recv().unwrap().text(), "via clone");
    }
}
