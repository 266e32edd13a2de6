use crate::{Col, Line, Position};

/// Half-open region of the input covered by a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    start: Position,
    end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        assert!(start.offset <= end.offset);
        Self { start, end }
    }

    pub fn line(&self) -> Line {
        self.start.line
    }

    pub fn col(&self) -> Col {
        self.start.col
    }
}
