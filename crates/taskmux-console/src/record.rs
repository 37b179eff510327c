//! Records carried from stream scanners to the console router.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::decoration::DecorationPair;
use crate::splitter::Terminator;

/// Which process stream a record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the scanner that produced a record.
///
/// Ids are process-unique, so records from two scanners never compare equal
/// on sender even when their labels collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScannerId(u64);

impl ScannerId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        ScannerId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// One complete line of task output, ready to render.
#[derive(Debug, Clone)]
pub struct ConsoleRecord {
    pub(crate) sender: ScannerId,
    pub(crate) terminator: Terminator,
    pub(crate) pair: DecorationPair,
    pub(crate) kind: StreamKind,
    pub(crate) label: String,
    pub(crate) text: String,
}

impl ConsoleRecord {
    /// Scanner that produced this record.
    pub fn sender(&self) -> ScannerId {
        self.sender
    }

    /// Terminator that closed the line in the source stream.
    pub fn terminator(&self) -> Terminator {
        self.terminator
    }

    /// Stream the line was read from.
    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    /// Label rendered in front of the line.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Line text, without its terminator.
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_ids_are_unique() {
        let ids: Vec<ScannerId> = (0..8).map(|_| ScannerId::next()).collect();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_stream_kind_display() {
        assert_eq!(StreamKind::Stdout.to_string(), "stdout");
        assert_eq!(StreamKind::Stderr.to_string(), "stderr");
    }
}
