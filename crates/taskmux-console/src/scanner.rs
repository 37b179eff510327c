//! Per-stream line scanners feeding the console queue.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;

use crate::decoration::DecorationPair;
use crate::error::ConsoleError;
use crate::record::{ConsoleRecord, ScannerId, StreamKind};
use crate::splitter::{next_line, Split, Terminator};

/// Bytes pulled from a stream per read.
const READ_CHUNK: usize = 8 * 1024;

/// Reads one process stream and turns it into console records.
///
/// A scanner is bound to one stream of one task: it carries the task's
/// decoration pair, the stream kind, and the already-truncated label.
/// [`StreamScanner::scan`] consumes the scanner, so each stream is scanned
/// at most once.
#[derive(Debug)]
pub struct StreamScanner {
    queue: mpsc::Sender<ConsoleRecord>,
    id: ScannerId,
    pair: DecorationPair,
    kind: StreamKind,
    label: String,
}

impl StreamScanner {
    pub(crate) fn new(
        queue: mpsc::Sender<ConsoleRecord>,
        pair: DecorationPair,
        kind: StreamKind,
        label: String,
    ) -> Self {
        Self {
            queue,
            id: ScannerId::next(),
            pair,
            kind,
            label,
        }
    }

    /// Identity stamped on every record this scanner produces.
    pub fn id(&self) -> ScannerId {
        self.id
    }

    /// Drain `reader` into the console, one record per line.
    ///
    /// Returns once the reader reports end of input and every line,
    /// including an unterminated tail, has been handed to the router.
    pub async fn scan<R>(self, mut reader: R) -> Result<(), ConsoleError>
    where
        R: AsyncRead + Unpin,
    {
        let mut pending = Vec::with_capacity(READ_CHUNK);
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            let n = reader
                .read(&mut chunk)
                .await
                .map_err(|source| ConsoleError::Read {
                    kind: self.kind,
                    source,
                })?;
            if n == 0 {
                break;
            }
            pending.extend_from_slice(&chunk[..n]);
            self.flush_lines(&mut pending, false).await?;
        }

        self.flush_lines(&mut pending, true).await
    }

    /// Send every complete line in `pending` to the router.
    async fn flush_lines(
        &self,
        pending: &mut Vec<u8>,
        at_end: bool,
    ) -> Result<(), ConsoleError> {
        loop {
            let (consumed, record) = match next_line(pending, at_end) {
                Split::Line {
                    consumed,
                    text,
                    terminator,
                } => (consumed, self.record(text, terminator)),
                Split::Incomplete => return Ok(()),
            };
            pending.drain(..consumed);
            self.queue
                .send(record)
                .await
                .map_err(|_| ConsoleError::QueueClosed)?;
        }
    }

    /// Build the record for one split line.
    ///
    /// Panics if the splitter hands back text containing a terminator byte.
    /// That is a segmentation defect, not an input condition, so it aborts
    /// instead of rendering a corrupt line.
    fn record(&self, text: &[u8], terminator: Terminator) -> ConsoleRecord {
        let text = String::from_utf8_lossy(text).into_owned();
        assert!(
            !text.contains(['\r', '\n']),
            "line splitter produced text with an embedded terminator"
        );
        ConsoleRecord {
            sender: self.id,
            terminator,
            pair: self.pair,
            kind: self.kind,
            label: self.label.clone(),
            text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use tokio::io::ReadBuf;

    use crate::decoration::PALETTE;

    struct FailingReader;

    impl AsyncRead for FailingReader {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "boom")))
        }
    }

    fn make_scanner(
        kind: StreamKind,
        label: &str,
    ) -> (StreamScanner, mpsc::Receiver<ConsoleRecord>) {
        let (tx, rx) = mpsc::channel(256);
        let scanner = StreamScanner::new(tx, PALETTE[0], kind, label.to_string());
        (scanner, rx)
    }

    #[tokio::test]
    async fn test_scan_emits_one_record_per_line() {
        let (scanner, mut rx) = make_scanner(StreamKind::Stdout, "build");
        scanner
            .scan(b"alpha\nbeta\r\ngamma".as_slice())
            .await
            .unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.text(), "alpha");
        assert_eq!(first.terminator(), Terminator::Lf);

        let second = rx.recv().await.unwrap();
        assert_eq!(second.text(), "beta");
        assert_eq!(second.terminator(), Terminator::CrLf);

        let third = rx.recv().await.unwrap();
        assert_eq!(third.text(), "gamma");
        assert_eq!(third.terminator(), Terminator::Lf);

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_records_preserve_stream_order() {
        let (scanner, mut rx) = make_scanner(StreamKind::Stdout, "order");
        let input: String = (0..100).map(|i| format!("line {i}\n")).collect();
        scanner.scan(input.as_bytes()).await.unwrap();

        for i in 0..100 {
            let record = rx.recv().await.unwrap();
            assert_eq!(record.text(), format!("line {i}"));
        }
    }

    #[tokio::test]
    async fn test_records_carry_scanner_identity() {
        let (scanner, mut rx) = make_scanner(StreamKind::Stderr, "ident");
        let id = scanner.id();
        scanner.scan(b"only\n".as_slice()).await.unwrap();

        let record = rx.recv().await.unwrap();
        assert_eq!(record.sender(), id);
        assert_eq!(record.kind(), StreamKind::Stderr);
        assert_eq!(record.label(), "ident");
    }

    #[tokio::test]
    async fn test_unterminated_tail_is_flushed() {
        let (scanner, mut rx) = make_scanner(StreamKind::Stdout, "tail");
        scanner.scan(b"no newline here".as_slice()).await.unwrap();

        let record = rx.recv().await.unwrap();
        assert_eq!(record.text(), "no newline here");
        assert_eq!(record.terminator(), Terminator::Lf);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced_not_dropped() {
        let (scanner, mut rx) = make_scanner(StreamKind::Stdout, "bytes");
        scanner
            .scan(b"caf\xC3\xA9\nbad\xFFbyte\n".as_slice())
            .await
            .unwrap();

        assert_eq!(rx.recv().await.unwrap().text(), "caf\u{e9}");
        assert_eq!(rx.recv().await.unwrap().text(), "bad\u{FFFD}byte");
    }

    #[tokio::test]
    async fn test_read_failure_is_surfaced() {
        let (scanner, _rx) = make_scanner(StreamKind::Stderr, "fail");
        let err = scanner.scan(FailingReader).await.unwrap_err();
        assert!(matches!(
            err,
            ConsoleError::Read {
                kind: StreamKind::Stderr,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_closed_queue_is_surfaced() {
        let (scanner, rx) = make_scanner(StreamKind::Stdout, "closed");
        drop(rx);
        let err = scanner.scan(b"line\n".as_slice()).await.unwrap_err();
        assert!(matches!(err, ConsoleError::QueueClosed));
    }
}
