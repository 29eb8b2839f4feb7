//! Line-diff renderer.
//!
//! Keeps the previous frame and only rewrites rows that changed. Each pass is
//! wrapped in a synchronized update and flushed once.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate};
use crossterm::queue;

use super::view::Frame;
use crate::types::{Attr, Line};

pub struct LineRenderer {
    previous: Option<Vec<Line>>,
    width: u16,
}

impl LineRenderer {
    pub fn new() -> Self {
        Self {
            previous: None,
            width: 0,
        }
    }

    /// Draw `frame`, writing only rows that differ from the last one drawn.
    ///
    /// Returns true if any row was written.
    pub fn render<W: Write>(&mut self, out: &mut W, frame: &Frame, width: u16) -> io::Result<bool> {
        if width != self.width {
            self.invalidate();
            self.width = width;
        }

        queue!(out, BeginSynchronizedUpdate, Hide)?;
        if self.previous.is_none() {
            queue!(out, Clear(ClearType::All))?;
        }

        let mut has_changes = false;
        for (row, line) in frame.lines.iter().enumerate() {
            let changed = match &self.previous {
                Some(prev) => prev.get(row) != Some(line),
                None => true,
            };
            if changed {
                has_changes = true;
                write_line(out, row as u16, line, width)?;
            }
        }

        if let Some((col, row)) = frame.cursor {
            queue!(out, MoveTo(col, row), Show)?;
        }
        queue!(out, EndSynchronizedUpdate)?;
        out.flush()?;

        self.previous = Some(frame.lines.clone());
        Ok(has_changes)
    }

    /// Forget the previous frame. The next render is a full redraw.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

impl Default for LineRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn write_line<W: Write>(out: &mut W, row: u16, line: &Line, width: u16) -> io::Result<()> {
    queue!(out, MoveTo(0, row))?;
    for span in &line.spans {
        set_attrs(out, span.attrs)?;
        queue!(out, Print(&span.text))?;
    }

    let rest = (width as usize).saturating_sub(line.width());
    if line.fill.is_empty() {
        queue!(out, SetAttribute(Attribute::Reset), Clear(ClearType::UntilNewLine))?;
    } else if rest > 0 {
        set_attrs(out, line.fill)?;
        queue!(out, Print(" ".repeat(rest)))?;
    }
    queue!(out, SetAttribute(Attribute::Reset))
}

fn set_attrs<W: Write>(out: &mut W, attrs: Attr) -> io::Result<()> {
    queue!(out, SetAttribute(Attribute::Reset))?;
    if attrs.contains(Attr::BOLD) {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if attrs.contains(Attr::DIM) {
        queue!(out, SetAttribute(Attribute::Dim))?;
    }
    if attrs.contains(Attr::UNDERLINE) {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    if attrs.contains(Attr::INVERSE) {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    Ok(())
}
