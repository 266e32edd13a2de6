use cursor::{Col, Line, Span};

/// The three ways an evaluation can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ErrorKind {
    /// Malformed input, detected before anything is evaluated.
    #[display(fmt = "SyntaxError")]
    Syntax,
    #[display(fmt = "ZeroDivisionError")]
    ZeroDivision,
    /// A result outside the representable numeric range.
    #[display(fmt = "OverflowError")]
    Overflow,
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("{kind} (l. {line}, c. {col}): {message}")]
pub struct CalcError {
    pub kind: ErrorKind,
    pub line: Line,
    pub col: Col,
    pub message: String,
}

impl CalcError {
    pub fn new(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self { kind, line: span.line(), col: span.col(), message: message.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
