use std::iter::FusedIterator;

use cursor::Cursor;
use number::Number::{Float, Int};

pub mod token;
pub use token::{Token, TokenData};
use TokenData::*;

/// Lazily splits the input into tokens. Scanning never fails: characters that
/// cannot start a token come out as [`TokenData::Unexpected`] and are left for
/// the parser to reject. The stream always ends with exactly one `Eof`.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    cursor: Cursor<'a>,
    finished: bool,
}

impl<'a> TokenStream<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { cursor: Cursor::new(source), finished: false }
    }

    fn number(&mut self, start: &Cursor<'a>) -> TokenData {
        self.cursor.eat_while(|c| c.is_ascii_digit());

        // The fraction must follow the dot immediately, so "12. 5" stops before the dot.
        let has_fraction = self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit());

        if has_fraction {
            self.cursor.next();
            self.cursor.eat_while(|c| c.is_ascii_digit());
            let lexeme = start.slice_until(&self.cursor);
            Number(Float(lexeme.parse().expect("digits with a single dot are a valid float")))
        } else {
            // A run of ASCII digits can only fail to parse by overflowing.
            let lexeme = start.slice_until(&self.cursor);
            match lexeme.parse() {
                Ok(n) => Number(Int(n)),
                Err(_) if lexeme.parse::<u64>() == Ok(1 << 63) => MinIntMagnitude,
                Err(_) => IntegerTooLarge,
            }
        }
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.cursor.eat_while(char::is_whitespace);
        let start = self.cursor.clone();

        let data = match self.cursor.next() {
            None => {
                self.finished = true;
                Eof
            }
            Some('+') => Plus,
            Some('-') => Minus,
            Some('%') => Percent,
            Some('(') => LeftParen,
            Some(')') => RightParen,
            Some('*') => {
                if self.cursor.eat('*') {
                    DoubleStar
                } else {
                    Star
                }
            }
            Some('/') => {
                if self.cursor.eat('/') {
                    DoubleSlash
                } else {
                    Slash
                }
            }
            Some(d) if d.is_ascii_digit() => self.number(&start),
            Some(c) => Unexpected(c),
        };

        let token = Token::new(data, start.slice_until(&self.cursor), start.span_until(&self.cursor));
        log::trace!("Scanned {:?} at {}:{}", token.data, token.line(), token.col());
        Some(token)
    }
}

impl FusedIterator for TokenStream<'_> {}

pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    TokenStream::new(source).collect()
}
