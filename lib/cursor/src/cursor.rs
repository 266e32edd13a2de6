use std::str::Chars;

mod span;
pub use span::*;

#[derive(Clone)]
pub struct Cursor<'a> {
    source: &'a str,
    chars: Chars<'a>,
    line: Line,
    col: Col,
}

// Shows where the cursor stands and what is left, never the consumed prefix.
impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("at", &format_args!("{}:{}", self.line, self.col))
            .field("remaining", &self.chars.as_str())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, derive_more::Display)]
pub struct Line(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, derive_more::Display)]
pub struct Col(pub usize);

/// A point in the input: byte offset plus the human readable line/column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: Line,
    pub col: Col,
}

impl Default for Position {
    fn default() -> Self {
        Self { offset: 0, line: Line(1), col: Col(1) }
    }
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, chars: source.chars(), line: Line(1), col: Col(1) }
    }

    pub fn line(&self) -> Line {
        self.line
    }

    pub fn col(&self) -> Col {
        self.col
    }

    pub fn offset(&self) -> usize {
        self.source.len() - self.chars.as_str().len()
    }

    pub fn position(&self) -> Position {
        Position { offset: self.offset(), line: self.line, col: self.col }
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    pub fn peek_next(&self) -> Option<char> {
        self.chars.clone().nth(1)
    }

    /// Consumes the next char only if it equals `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.next();
            true
        } else {
            false
        }
    }

    /// Consumes chars while `predicate` holds and returns how many were eaten.
    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while self.peek().is_some_and(&predicate) {
            self.next();
            count += 1;
        }
        count
    }

    pub fn slice_until(&self, end: &Cursor<'a>) -> &'a str {
        assert!(std::ptr::eq(self.source, end.source), "cursors over different inputs");
        &self.source[self.offset()..end.offset()]
    }

    pub fn span_until(&self, end: &Cursor<'a>) -> Span {
        Span::new(self.position(), end.position())
    }
}

impl<'a> From<&'a str> for Cursor<'a> {
    fn from(source: &'a str) -> Self {
        Self::new(source)
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line.0 += 1;
            self.col = Col(1);
        } else {
            self.col.0 += 1;
        }
        Some(c)
    }
}
