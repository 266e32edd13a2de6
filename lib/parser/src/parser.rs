mod expr;
use std::iter::Peekable;

use cursor::Span;
use errors::{CalcError, ErrorKind, Result};
pub use expr::{BinaryOperator, Expr, UnaryOperator};
use number::Number::Int;
use scanner::{Token, TokenData, TokenStream};

use TokenData::*;

/// How deep parentheses, signs and exponents may nest before we give up
/// instead of exhausting the stack. Operator chains such as `1 + 1 + ... + 1`
/// are built in a loop and have no limit.
pub const MAX_NESTING_DEPTH: usize = 200;

#[derive(Debug)]
pub struct ParserError<'a> {
    error: ParserErrorType,
    token: Token<'a>,
}

impl<'a> From<ParserError<'a>> for CalcError {
    fn from(error: ParserError<'a>) -> Self {
        let kind = match error.error {
            ParserErrorType::IntegerTooLarge => ErrorKind::Overflow,
            _ => ErrorKind::Syntax,
        };
        CalcError::new(kind, error.token.span, format!("{}, found {}", error.error, error.token))
    }
}

impl<'a> ParserError<'a> {
    fn new(error: ParserErrorType, token: Token<'a>) -> Self {
        Self { token, error }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParserErrorType {
    ExpectedExpression,
    MissingRightParen,
    UnexpectedTrailingToken,
    UnexpectedCharacter(char),
    TooDeeplyNested,
    IntegerTooLarge,
}

impl std::fmt::Display for ParserErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParserErrorType::ExpectedExpression => write!(f, "Expected an expression"),
            ParserErrorType::MissingRightParen => write!(f, "Missing closing `)` after expression"),
            ParserErrorType::UnexpectedTrailingToken => {
                write!(f, "Expected end of input after expression")
            }
            ParserErrorType::UnexpectedCharacter(c) => write!(f, "Unexpected character `{c}`"),
            ParserErrorType::TooDeeplyNested => write!(f, "Too many nested expressions"),
            ParserErrorType::IntegerTooLarge => write!(f, "Integer literal does not fit in 64 bits"),
        }
    }
}

/// Recursive-descent parser, one method per precedence level:
///
/// ```text
/// expression := term (('+' | '-') term)*
/// term       := unary (('*' | '/' | '//' | '%') unary)*
/// unary      := ('+' | '-') unary | power
/// power      := primary ('**' unary)?
/// primary    := NUMBER | '(' expression ')'
/// ```
#[derive(Debug)]
pub struct Parser<'a> {
    token_stream: Peekable<TokenStream<'a>>,
    depth: usize,
    // First literal that does not fit in an i64. Reported only once the
    // whole input is known to be well-formed.
    oversized_literal: Option<Token<'a>>,
}

impl<'a> Parser<'a> {
    pub fn new(token_stream: TokenStream<'a>) -> Self {
        Self { token_stream: token_stream.peekable(), depth: 0, oversized_literal: None }
    }

    /// Parses exactly one expression; the whole input has to be consumed.
    pub fn parse(mut self) -> Result<Expr> {
        let expr = self.expression()?;
        self.consume_or_error(Eof, ParserErrorType::UnexpectedTrailingToken)?;

        if let Some(token) = self.oversized_literal {
            return Err(ParserError::new(ParserErrorType::IntegerTooLarge, token).into());
        }

        log::debug!("Parsed {}", expr);
        Ok(expr)
    }

    fn expression(&mut self) -> Result<Expr> {
        use BinaryOperator::*;
        let mut expr = self.term()?;

        while let Some((operator, span)) = self.match_binary(&[Add, Subtract]) {
            let right = Box::new(self.term()?);
            expr = Expr::Binary { left: Box::new(expr), operator, span, right };
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr> {
        use BinaryOperator::*;
        let mut expr = self.unary()?;

        while let Some((operator, span)) =
            self.match_binary(&[Multiply, Divide, FloorDivide, Modulo])
        {
            let right = Box::new(self.unary()?);
            expr = Expr::Binary { left: Box::new(expr), operator, span, right };
        }
        Ok(expr)
    }

    // A sign applies to the whole power expression after it: -4 ** 2 == -(4 ** 2).
    fn unary(&mut self) -> Result<Expr> {
        if let Ok(operator) = UnaryOperator::try_from(self.peek()) {
            let span = self.advance().span;

            if operator == UnaryOperator::Minus && self.peek() == MinIntMagnitude {
                let literal = self.advance();
                // Only i64::MIN itself is representable; a power of 2**63 is not.
                if self.peek() != DoubleStar {
                    return Ok(Expr::Literal(Int(i64::MIN)));
                }
                let base = self.oversized(literal);
                let right = Box::new(self.exponent(base)?);
                return Ok(Expr::Unary { operator, span, right });
            }

            let right = Box::new(self.nested(Self::unary)?);
            return Ok(Expr::Unary { operator, span, right });
        }
        self.power()
    }

    fn power(&mut self) -> Result<Expr> {
        let base = self.primary()?;
        self.exponent(base)
    }

    // The exponent goes back through `unary`, which makes `**` right-associative
    // and lets it carry its own sign: 2 ** -3 ** 2 == 2 ** (-(3 ** 2)).
    fn exponent(&mut self, base: Expr) -> Result<Expr> {
        if let Some((operator, span)) = self.match_binary(&[BinaryOperator::Power]) {
            let right = Box::new(self.nested(Self::unary)?);
            return Ok(Expr::Binary { left: Box::new(base), operator, span, right });
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr> {
        let token = self.advance();
        match token.data {
            Number(n) => Ok(Expr::Literal(n)),
            LeftParen => {
                let expr = self.nested(Self::expression)?;
                self.consume_or_error(RightParen, ParserErrorType::MissingRightParen)?;
                Ok(expr)
            }
            IntegerTooLarge | MinIntMagnitude => Ok(self.oversized(token)),
            Unexpected(c) => {
                Err(ParserError::new(ParserErrorType::UnexpectedCharacter(c), token).into())
            }
            _ => Err(ParserError::new(ParserErrorType::ExpectedExpression, token).into()),
        }
    }

    /// Remembers the literal and stands in a placeholder so parsing can go on;
    /// `parse` never returns a tree once this has been called.
    fn oversized(&mut self, token: Token<'a>) -> Expr {
        self.oversized_literal.get_or_insert(token);
        Expr::Literal(Int(0))
    }

    fn nested(&mut self, rule: impl FnOnce(&mut Self) -> Result<Expr>) -> Result<Expr> {
        if self.depth >= MAX_NESTING_DEPTH {
            let token = self.advance();
            return Err(ParserError::new(ParserErrorType::TooDeeplyNested, token).into());
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    fn match_binary(&mut self, operators: &[BinaryOperator]) -> Option<(BinaryOperator, Span)> {
        let operator =
            BinaryOperator::try_from(self.peek()).ok().filter(|op| operators.contains(op))?;
        Some((operator, self.advance().span))
    }

    fn consume_or_error(&mut self, expected: TokenData, error_type: ParserErrorType) -> Result<Token<'a>> {
        let token = self.advance();
        match token.data {
            data if data == expected => Ok(token),
            Unexpected(c) => {
                Err(ParserError::new(ParserErrorType::UnexpectedCharacter(c), token).into())
            }
            _ => Err(ParserError::new(error_type, token).into()),
        }
    }
}

// Helpers
impl<'a> Parser<'a> {
    fn peek(&mut self) -> TokenData {
        self.token_stream.peek().map_or(Eof, |t| t.data)
    }

    fn advance(&mut self) -> Token<'a> {
        self.token_stream.next().expect("parser never reads past Eof")
    }
}

pub fn parse(source: &str) -> Result<Expr> {
    Parser::new(TokenStream::new(source)).parse()
}
