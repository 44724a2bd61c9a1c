//! Source positions for script diagnostics.

use std::fmt;

/// A position in script text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    /// Byte offset from the start of the script
    pub offset: usize,
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed, in characters)
    pub column: u32,
}

impl Location {
    /// The first character of a script.
    pub const START: Self = Self {
        offset: 0,
        line: 1,
        column: 1,
    };

    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self { offset, line, column }
    }

    /// Locate a byte offset inside `source`.
    pub fn of(source: &str, offset: usize) -> Self {
        Self::START.advance(source, offset)
    }

    /// Move forward to `offset`, counting only the text in between.
    ///
    /// Offsets behind `self` are located from the start of `source`.
    pub fn advance(self, source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        if offset < self.offset {
            return Self::of(source, offset);
        }

        let mut next = self;
        for c in source.get(self.offset..offset).unwrap_or_default().chars() {
            if c == '\n' {
                next.line += 1;
                next.column = 1;
            } else {
                next.column += 1;
            }
        }
        next.offset = offset;
        next
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open byte range of script text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The text this span covers.
    pub fn slice<'s>(&self, source: &'s str) -> &'s str {
        source
            .get(self.start.offset..self.end.offset)
            .unwrap_or_default()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}
