//! Text model primitives: spans, inclusive source ranges, and line/column lookup.

use std::fmt;

use serde::{Deserialize, Serialize};
pub use text_size::{TextRange, TextSize};

/// A half-open byte range `[start, end)` into a source buffer.
///
/// This is the representation produced by the front end.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    pub fn cover(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Returns the text covered by this span, or `None` if it is reversed,
    /// out of bounds, or not on a char boundary.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        if self.start > self.end {
            return None;
        }
        text.get(self.start..self.end)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start, self.end)
    }
}

impl From<Span> for TextRange {
    fn from(span: Span) -> Self {
        let start = u32::try_from(span.start).unwrap_or(u32::MAX);
        let end = u32::try_from(span.end).unwrap_or(u32::MAX).max(start);
        TextRange::new(TextSize::from(start), TextSize::from(end))
    }
}

/// An inclusive byte range `[start, end]` into a source buffer.
///
/// `end` is the offset of the last byte of the construct, not one past it.
/// `SourceRange::default()` is `[0, 0]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: usize,
    pub end: usize,
}

impl SourceRange {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Converts a half-open span into an inclusive range.
    ///
    /// Empty or reversed spans have no inclusive representation.
    #[inline]
    pub fn from_span(span: Span) -> Option<Self> {
        if span.is_empty() {
            return None;
        }
        Some(Self::new(span.start, span.end - 1))
    }

    #[inline]
    pub fn to_span(self) -> Span {
        Span::new(self.start, self.end + 1)
    }

    /// Number of bytes covered; always at least one.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }

    #[inline]
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// `true` if `start <= end` and both offsets lie within a buffer of `len` bytes.
    #[inline]
    pub fn is_within(&self, len: usize) -> bool {
        self.start <= self.end && self.end < len
    }

    /// Returns `text[start..=end]`, or `None` if the range does not fit `text`.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        if !self.is_within(text.len()) {
            return None;
        }
        text.get(self.start..=self.end)
    }
}

impl fmt::Debug for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Zero-based line and byte column.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for LineCol {
    /// Renders the position one-based, the way editors and compilers report it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

/// Pre-computed line start offsets for a particular text snapshot.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    line_ends: Vec<TextSize>,
    text_len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = Vec::with_capacity(32);
        let mut line_ends = Vec::with_capacity(32);
        line_starts.push(TextSize::from(0));

        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    line_ends.push(TextSize::from(i as u32));
                    line_starts.push(TextSize::from((i + 1) as u32));
                    i += 1;
                }
                b'\r' => {
                    line_ends.push(TextSize::from(i as u32));
                    if i + 1 < bytes.len() && bytes[i + 1] == b'\n' {
                        line_starts.push(TextSize::from((i + 2) as u32));
                        i += 2;
                    } else {
                        line_starts.push(TextSize::from((i + 1) as u32));
                        i += 1;
                    }
                }
                _ => i += 1,
            }
        }

        line_ends.push(TextSize::from(text.len() as u32));

        Self {
            line_starts,
            line_ends,
            text_len: TextSize::from(text.len() as u32),
        }
    }

    #[inline]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    #[inline]
    pub fn line_start(&self, line: u32) -> Option<TextSize> {
        self.line_starts.get(line as usize).copied()
    }

    #[inline]
    pub fn line_end(&self, line: u32) -> Option<TextSize> {
        self.line_ends.get(line as usize).copied()
    }

    fn line_index(&self, offset: TextSize) -> usize {
        // Offsets past the end are clamped; callers may pass `text_len` for EOF.
        let offset = offset.min(self.text_len);
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insert) => insert.saturating_sub(1),
        }
    }

    /// Convert a byte offset to a line/column pair.
    pub fn line_col(&self, offset: usize) -> LineCol {
        let offset = TextSize::from(u32::try_from(offset).unwrap_or(u32::MAX)).min(self.text_len);
        let line = self.line_index(offset);
        let line_start = self.line_starts[line];
        let line_end = self.line_ends[line];
        let col = offset.min(line_end) - line_start;
        LineCol {
            line: line as u32,
            col: u32::from(col),
        }
    }

    /// Convert a line/column pair back to a byte offset.
    pub fn offset(&self, line_col: LineCol) -> Option<usize> {
        let start = self.line_start(line_col.line)?;
        let end = self.line_end(line_col.line)?;
        let offset = start + TextSize::from(line_col.col);
        if offset > end {
            return None;
        }
        Some(u32::from(offset) as usize)
    }
}
