//! Line segmentation over raw byte streams.
//!
//! Task output arrives as arbitrary byte chunks that may mix `\n`, `\r`, and
//! `\r\n` line endings. The splitter finds the earliest terminator, reports
//! which convention closed the line, and refuses to classify a trailing `\r`
//! until the byte after it has arrived (it could still grow into `\r\n`).

/// Which line-ending convention closed a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminator {
    /// `\n`
    Lf,
    /// `\r` not followed by `\n`
    Cr,
    /// `\r\n`
    CrLf,
}

/// Outcome of scanning a buffer for the next line boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split<'a> {
    /// A complete line. Consume `consumed` bytes from the front of the
    /// buffer; `text` is the line content with all terminator bytes stripped.
    Line {
        consumed: usize,
        text: &'a [u8],
        terminator: Terminator,
    },
    /// No line can be produced from the bytes seen so far.
    Incomplete,
}

/// Scan `buf` for the next logical line.
///
/// The earliest terminator byte wins, so `text` can never carry a stray `\r`
/// or `\n` from a later line ending. With `at_end` false, a `\r` in the final
/// position yields [`Split::Incomplete`]: the `\r` vs `\r\n` decision needs a
/// byte that has not arrived yet. With `at_end` true, that `\r` closes a CR
/// line, and any terminator-less remainder is emitted as one final line with
/// a synthetic LF terminator. An empty buffer is always `Incomplete`.
pub fn next_line(buf: &[u8], at_end: bool) -> Split<'_> {
    let cr = buf.iter().position(|&b| b == b'\r');
    let lf = buf.iter().position(|&b| b == b'\n');

    match (cr, lf) {
        (Some(cr), lf) if lf.map_or(true, |lf| cr < lf) => {
            if cr + 1 < buf.len() {
                if buf[cr + 1] == b'\n' {
                    Split::Line {
                        consumed: cr + 2,
                        text: &buf[..cr],
                        terminator: Terminator::CrLf,
                    }
                } else {
                    Split::Line {
                        consumed: cr + 1,
                        text: &buf[..cr],
                        terminator: Terminator::Cr,
                    }
                }
            } else if at_end {
                // The stream ends on a bare `\r`.
                Split::Line {
                    consumed: cr + 1,
                    text: &buf[..cr],
                    terminator: Terminator::Cr,
                }
            } else {
                Split::Incomplete
            }
        }
        (_, Some(lf)) => Split::Line {
            consumed: lf + 1,
            text: &buf[..lf],
            terminator: Terminator::Lf,
        },
        (None, None) if at_end && !buf.is_empty() => Split::Line {
            consumed: buf.len(),
            text: buf,
            terminator: Terminator::Lf,
        },
        _ => Split::Incomplete,
    }
}
