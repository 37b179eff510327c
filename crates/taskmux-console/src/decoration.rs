//! Color decorations that tell task streams apart on the shared console.

use console::{Color, Style};

use crate::record::StreamKind;

/// How one stream of one task is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoration {
    pub foreground: Color,
    pub background: Option<Color>,
    pub bold: bool,
}

impl Decoration {
    /// Build the terminal style for this decoration.
    ///
    /// Styling is forced so a record renders the same escape codes whether
    /// the console's destination is a terminal or a capture buffer.
    pub fn style(&self) -> Style {
        let mut style = Style::new().force_styling(true).fg(self.foreground);
        if let Some(background) = self.background {
            style = style.bg(background);
        }
        if self.bold {
            style = style.bold();
        }
        style
    }

    /// Wrap `text` in this decoration's escape codes.
    pub fn paint(&self, text: &str) -> String {
        self.style().apply_to(text).to_string()
    }
}

/// The stdout and stderr decorations a task holds as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecorationPair {
    pub stdout: Decoration,
    pub stderr: Decoration,
}

impl DecorationPair {
    /// Decoration for one of the pair's streams.
    pub fn for_stream(&self, kind: StreamKind) -> Decoration {
        match kind {
            StreamKind::Stdout => self.stdout,
            StreamKind::Stderr => self.stderr,
        }
    }
}

/// Color pairs handed out to tasks, in assignment order.
///
/// Stdout lines use a bold foreground on the default background. Stderr
/// lines from the same task keep the task's hue but invert it into a filled
/// background, so errors stand out without breaking the task's color.
pub const PALETTE: [DecorationPair; 6] = [
    DecorationPair {
        stdout: Decoration {
            foreground: Color::Blue,
            background: None,
            bold: true,
        },
        stderr: Decoration {
            foreground: Color::White,
            background: Some(Color::Blue),
            bold: true,
        },
    },
    DecorationPair {
        stdout: Decoration {
            foreground: Color::Yellow,
            background: None,
            bold: true,
        },
        stderr: Decoration {
            foreground: Color::Black,
            background: Some(Color::Yellow),
            bold: true,
        },
    },
    DecorationPair {
        stdout: Decoration {
            foreground: Color::Cyan,
            background: None,
            bold: true,
        },
        stderr: Decoration {
            foreground: Color::Black,
            background: Some(Color::Cyan),
            bold: true,
        },
    },
    DecorationPair {
        stdout: Decoration {
            foreground: Color::Magenta,
            background: None,
            bold: true,
        },
        stderr: Decoration {
            foreground: Color::White,
            background: Some(Color::Magenta),
            bold: true,
        },
    },
    DecorationPair {
        stdout: Decoration {
            foreground: Color::Green,
            background: None,
            bold: true,
        },
        stderr: Decoration {
            foreground: Color::White,
            background: Some(Color::Green),
            bold: true,
        },
    },
    DecorationPair {
        stdout: Decoration {
            foreground: Color::Red,
            background: None,
            bold: true,
        },
        stderr: Decoration {
            foreground: Color::White,
            background: Some(Color::Red),
            bold: true,
        },
    },
];

/// Neutral decoration for the runner's own log lines.
pub const LOG_DECORATIONS: DecorationPair = DecorationPair {
    stdout: Decoration {
        foreground: Color::White,
        background: None,
        bold: false,
    },
    stderr: Decoration {
        foreground: Color::White,
        background: None,
        bold: false,
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_pairs_are_distinct() {
        for (i, a) in PALETTE.iter().enumerate() {
            for b in &PALETTE[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_stderr_half_fills_background() {
        for pair in &PALETTE {
            assert!(pair.stdout.background.is_none());
            assert!(pair.stderr.background.is_some());
        }
    }

    #[test]
    fn test_paint_wraps_text_in_escape_codes() {
        let painted = PALETTE[0].stdout.paint("build");
        assert!(painted.starts_with("\u{1b}["));
        assert!(painted.contains("build"));
        assert!(painted.ends_with("\u{1b}[0m"));
    }

    #[test]
    fn test_for_stream_selects_half() {
        let pair = PALETTE[1];
        assert_eq!(pair.for_stream(StreamKind::Stdout), pair.stdout);
        assert_eq!(pair.for_stream(StreamKind::Stderr), pair.stderr);
    }
}
