use std::fmt::Display;

use cursor::{Col, Line, Span};
use number::Number;

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub data: TokenData,
    pub lexeme: &'a str,
    pub span: Span,
}

impl<'a> Token<'a> {
    pub fn new(data: TokenData, lexeme: &'a str, span: impl Into<Span>) -> Token<'a> {
        Self { data, lexeme, span: span.into() }
    }

    pub fn line(&self) -> Line {
        self.span.line()
    }

    pub fn col(&self) -> Col {
        self.span.col()
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.data {
            TokenData::Eof => write!(f, "end of input"),
            _ => write!(f, "'{}'", self.lexeme),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenData {
    // Literals.
    Number(Number),
    /// Digits without a decimal point that do not fit in an `i64`.
    IntegerTooLarge,
    /// `9223372036854775808`, which only fits in an `i64` after a unary minus.
    MinIntMagnitude,

    // Single-character tokens.
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LeftParen,
    RightParen,

    // Two-character tokens.
    DoubleStar,
    DoubleSlash,

    /// Anything else, including a `.` that is not part of a number.
    Unexpected(char),
    Eof,
}
