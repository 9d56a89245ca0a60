//! Transcript search with a navigable match cursor

/// Byte range of one match within the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

/// One piece of the transcript, split for highlight rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Match { text: &'a str, active: bool },
}

/// Case-insensitive substring search over a transcript.
///
/// Matches are found in a single linear scan (non-overlapping, left to
/// right); the cursor cycles through them modulo the match count.
#[derive(Debug, Clone)]
pub struct TranscriptSearch {
    text: String,
    query: String,
    matches: Vec<MatchSpan>,
    active: usize,
}

impl TranscriptSearch {
    pub fn new<T: Into<String>, Q: Into<String>>(text: T, query: Q) -> Self {
        let text = text.into();
        let query = query.into();
        let matches = scan(&text, &query);
        Self {
            text,
            query,
            matches,
            active: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[MatchSpan] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// The active match, as `(index, span)`
    pub fn active(&self) -> Option<(usize, MatchSpan)> {
        self.matches.get(self.active).map(|span| (self.active, *span))
    }

    /// Advance the cursor, wrapping past the last match
    pub fn next(&mut self) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        self.active = (self.active + 1) % self.matches.len();
        Some(self.active)
    }

    /// Step the cursor back, wrapping before the first match
    pub fn prev(&mut self) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        self.active = (self.active + self.matches.len() - 1) % self.matches.len();
        Some(self.active)
    }

    /// Split the transcript into plain and match segments, in order.
    /// Concatenating the segment texts reproduces the transcript exactly.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        let mut segments = Vec::new();
        let mut cursor = 0;

        for (index, span) in self.matches.iter().enumerate() {
            if span.start > cursor {
                segments.push(Segment::Plain(&self.text[cursor..span.start]));
            }
            segments.push(Segment::Match {
                text: &self.text[span.start..span.end],
                active: index == self.active,
            });
            cursor = span.end;
        }

        if cursor < self.text.len() {
            segments.push(Segment::Plain(&self.text[cursor..]));
        }

        segments
    }
}

/// Find every case-insensitive occurrence of `query` in `text`.
/// Spans are byte offsets into the original, untouched text.
fn scan(text: &str, query: &str) -> Vec<MatchSpan> {
    if query.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    let mut start = 0;

    while start < text.len() {
        match match_at(&text[start..], query) {
            Some(len) => {
                matches.push(MatchSpan {
                    start,
                    end: start + len,
                });
                start += len;
            }
            None => {
                start += text[start..]
                    .chars()
                    .next()
                    .map(char::len_utf8)
                    .unwrap_or(1);
            }
        }
    }

    matches
}

/// If `haystack` starts with `needle` (ignoring case), return the number
/// of haystack bytes the match covers.
fn match_at(haystack: &str, needle: &str) -> Option<usize> {
    let mut haystack_chars = haystack.chars();
    let mut consumed = 0;

    for needle_char in needle.chars() {
        let haystack_char = haystack_chars.next()?;
        if !chars_eq_ignore_case(haystack_char, needle_char) {
            return None;
        }
        consumed += haystack_char.len_utf8();
    }

    Some(consumed)
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}
