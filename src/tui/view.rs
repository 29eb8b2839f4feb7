//! View - the session laid out as screen lines.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ @article{a,                                  │  content (scrollable)
//! │     author = {Ada Lovelace},                 │
//! │ ...                                          │
//! │ > /love/i                                    │  search bar
//! │ Esc Close  ^B Case  Enter Submit  1/3  error │  footer
//! └──────────────────────────────────────────────┘
//! ```

use crate::pipeline::Rendered;
use crate::session::Session;
use crate::types::{string_width, Attr, Line, Span};

/// Rows taken by the search bar and the footer.
pub const CHROME_ROWS: usize = 2;

const PROMPT: &str = "> /";
const TAB: &str = "    ";

const KEY_HINTS: [(&str, &str); 3] = [("Esc", "Close"), ("^B", "Case"), ("Enter", "Submit")];

/// A composed screen: one [`Line`] per row plus where the cursor goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<Line>,
    pub cursor: Option<(u16, u16)>,
}

/// Content rows available at a terminal height.
pub fn content_rows(height: u16) -> usize {
    (height as usize).saturating_sub(CHROME_ROWS)
}

/// Lay out the session for a `width` x `height` terminal.
pub fn compose(session: &Session, width: u16, height: u16) -> Frame {
    let rows = content_rows(height);
    let width = width as usize;
    let height = height as usize;
    let pipeline = session.pipeline();
    let rendered = pipeline.rendered();

    let mut lines = content(&rendered, session.scroll_offset(), rows, width);

    let query = session.query();
    let search_row = lines.len();
    lines.push(search_bar(&query.text(), pipeline.case_insensitive()).truncate(width));

    let error = pipeline.error().map(|err| err.summary().to_string());
    lines.push(footer(&rendered, error.as_deref(), width));
    lines.truncate(height);

    let cursor = (search_row < height).then(|| {
        let before: String = query.text().chars().take(query.cursor()).collect();
        let col = (string_width(PROMPT) + string_width(&before)).min(width.saturating_sub(1));
        (col as u16, search_row as u16)
    });

    Frame { lines, cursor }
}

fn content(rendered: &Rendered, offset: usize, rows: usize, width: usize) -> Vec<Line> {
    let mut lines: Vec<Line> = rendered
        .text
        .lines()
        .skip(offset)
        .take(rows)
        .map(|text| Line::plain(text.replace('\t', TAB)).truncate(width))
        .collect();
    lines.resize(rows, Line::new());
    lines
}

fn search_bar(query: &str, case_insensitive: bool) -> Line {
    let indicator = if case_insensitive { "/i" } else { "/" };
    Line::new()
        .push(Span::styled(PROMPT, Attr::BOLD))
        .push(Span::plain(query))
        .push(Span::styled(indicator, Attr::DIM))
}

fn footer(rendered: &Rendered, error: Option<&str>, width: usize) -> Line {
    let mut line = Line::new().with_fill(Attr::INVERSE);
    for (key, label) in KEY_HINTS {
        line = line
            .push(Span::styled(format!(" {key}"), Attr::INVERSE | Attr::BOLD))
            .push(Span::styled(format!(" {label} "), Attr::INVERSE));
    }
    line = line.push(Span::styled(
        format!(" {}/{} ", rendered.shown, rendered.total),
        Attr::INVERSE | Attr::DIM,
    ));
    if rendered.error.is_some() {
        line = line.push(Span::styled(" render failed ", Attr::INVERSE | Attr::BOLD));
    }

    if let Some(message) = error {
        let message = format!("{message} ");
        let gap = width.saturating_sub(line.width() + string_width(&message)).max(1);
        line = line
            .push(Span::styled(" ".repeat(gap), Attr::INVERSE))
            .push(Span::styled(message, Attr::INVERSE | Attr::UNDERLINE));
    }

    line.truncate(width)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::bibtex::parse;
    use crate::config::FilterConfig;
    use crate::input::{Action, Edit};
    use crate::record::{Record, RecordSet};

    fn session() -> Session {
        let records = parse(
            "@article{a, author = {Ada Lovelace}}\n@book{b, author = {john smith}}\n",
        )
        .unwrap();
        Session::new(records, FilterConfig::default().with_quiet_interval(Duration::ZERO))
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_layout_rows() {
        let s = session();
        let frame = compose(&s, 60, 10);
        assert_eq!(frame.lines.len(), 10);
        assert_eq!(text(&frame.lines[0]), "@article{a,");
        assert_eq!(text(&frame.lines[8]), "> //i");
        assert!(text(&frame.lines[9]).contains("2/2"));
        assert_eq!(frame.cursor, Some((3, 8)));
    }

    #[test]
    fn test_search_bar_follows_query_and_case() {
        let mut s = session();
        for ch in "smith".chars() {
            s.handle(Action::Edit(Edit::Insert(ch)), Instant::now());
        }
        s.handle(Action::ToggleCase, Instant::now());

        let frame = compose(&s, 60, 10);
        assert_eq!(text(&frame.lines[8]), "> /smith/");
        assert_eq!(frame.cursor, Some((8, 8)));
        assert!(text(&frame.lines[9]).contains("1/2"));
    }

    #[test]
    fn test_error_shown_underlined_in_footer() {
        let mut s = session();
        s.handle(Action::Edit(Edit::Insert('(')), Instant::now());

        let frame = compose(&s, 100, 6);
        let footer = &frame.lines[5];
        let last = footer.spans.last().unwrap();
        assert!(last.attrs.contains(Attr::UNDERLINE));
        assert!(last.text.contains("unclosed group"));
        assert_eq!(footer.width(), 100);
    }

    #[test]
    fn test_tiny_terminal() {
        let s = session();
        let frame = compose(&s, 5, 1);
        assert_eq!(frame.lines.len(), 1);
        assert_eq!(text(&frame.lines[0]), "> //i");
        assert_eq!(frame.cursor, Some((3, 0)));
    }

    #[test]
    fn test_narrow_footer_crops_error() {
        let mut s = session();
        s.handle(Action::Edit(Edit::Insert('(')), Instant::now());

        let frame = compose(&s, 45, 6);
        let footer = &frame.lines[5];
        let last = footer.spans.last().unwrap();
        assert_eq!(last.text, "unclo");
        assert!(last.attrs.contains(Attr::UNDERLINE));
        assert_eq!(footer.width(), 45);
    }

    #[test]
    fn test_render_failure_marker() {
        let records = RecordSet::new(vec![
            Record::new("misc", "good").with_field("title", "Fine"),
            Record::new("misc", "broken").with_field("note", "a } b"),
        ]);
        let mut s = Session::new(records, FilterConfig::default().with_quiet_interval(Duration::ZERO));
        for ch in "good".chars() {
            s.handle(Action::Edit(Edit::Insert(ch)), Instant::now());
        }
        assert!(!text(&compose(&s, 80, 6).lines[5]).contains("render failed"));

        s.handle(Action::Edit(Edit::Clear), Instant::now());
        let frame = compose(&s, 80, 6);
        assert!(text(&frame.lines[5]).contains("render failed"));
        assert_eq!(text(&frame.lines[0]), "@misc{good,");
    }
}
