//! Core display types shared by the view and the renderer.

use unicode_width::UnicodeWidthChar;

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield for efficient storage and comparison.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::UNDERLINE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const UNDERLINE = 1 << 2;
        const INVERSE = 1 << 3;
    }
}

// =============================================================================
// Spans and Lines
// =============================================================================

/// A run of text with one set of attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub attrs: Attr,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attrs: Attr::empty(),
        }
    }

    pub fn styled(text: impl Into<String>, attrs: Attr) -> Self {
        Self {
            text: text.into(),
            attrs,
        }
    }

    /// Display width in terminal cells.
    pub fn width(&self) -> usize {
        string_width(&self.text)
    }
}

/// One screen row.
///
/// `fill` is the attribute set used for the cells after the last span, so a
/// status bar can be painted edge to edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub spans: Vec<Span>,
    pub fill: Attr,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            spans: vec![Span::plain(text)],
            fill: Attr::empty(),
        }
    }

    pub fn push(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }

    pub fn with_fill(mut self, fill: Attr) -> Self {
        self.fill = fill;
        self
    }

    pub fn width(&self) -> usize {
        self.spans.iter().map(Span::width).sum()
    }

    /// Cut the line to at most `max` cells. Wide characters that would
    /// straddle the edge are dropped.
    pub fn truncate(mut self, max: usize) -> Self {
        let mut used = 0;
        let mut kept = Vec::with_capacity(self.spans.len());
        for span in self.spans.drain(..) {
            if used >= max {
                break;
            }
            let mut text = String::new();
            for ch in span.text.chars() {
                let w = char_width(ch);
                if used + w > max {
                    used = max;
                    break;
                }
                used += w;
                text.push(ch);
            }
            kept.push(Span { text, attrs: span.attrs });
        }
        self.spans = kept;
        self
    }
}

// =============================================================================
// Width helpers
// =============================================================================

/// Cell width of a char. Control characters (tabs included) count as one.
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(1)
}

/// Cell width of a string.
pub fn string_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}
