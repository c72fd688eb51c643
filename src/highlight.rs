//! Match highlighting
//!
//! Splits a field into plain and highlighted segments around case-insensitive
//! occurrences of the search term. The term is always escaped before it is
//! compiled, so characters like `.`, `*` or `(` in user input match themselves.

use regex::{Regex, RegexBuilder};
use tracing::debug;

/// A slice of the original field, flagged when it is an occurrence of the term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub matched: bool,
}

impl<'a> Segment<'a> {
    fn plain(text: &'a str) -> Self {
        Self { text, matched: false }
    }

    fn hit(text: &'a str) -> Self {
        Self { text, matched: true }
    }
}

/// Compiled search term, reused across every cell of a frame.
#[derive(Debug, Clone)]
pub struct Highlighter {
    pattern: Regex,
}

impl Highlighter {
    /// `None` when there is nothing to highlight.
    pub fn new(term: &str) -> Option<Self> {
        if term.is_empty() {
            return None;
        }

        match RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => Some(Self { pattern }),
            Err(e) => {
                // Only reachable when the escaped term exceeds the regex size limit
                debug!("highlight disabled for term of {} bytes: {e}", term.len());
                None
            }
        }
    }

    /// Segments of `text`, in order. Concatenating them gives back `text`.
    pub fn segments<'a>(&self, text: &'a str) -> Vec<Segment<'a>> {
        if text.is_empty() {
            return vec![Segment::plain(text)];
        }

        let mut segments = Vec::new();
        let mut last = 0;
        for m in self.pattern.find_iter(text) {
            if m.start() > last {
                segments.push(Segment::plain(&text[last..m.start()]));
            }
            segments.push(Segment::hit(m.as_str()));
            last = m.end();
        }
        if last < text.len() || segments.is_empty() {
            segments.push(Segment::plain(&text[last..]));
        }

        segments
    }
}

/// One-shot helper: segments of `text` highlighted for `term`.
pub fn highlight<'a>(text: &'a str, term: &str) -> Vec<Segment<'a>> {
    match Highlighter::new(term) {
        Some(highlighter) => highlighter.segments(text),
        None => vec![Segment::plain(text)],
    }
}
