use std::fmt::{self, Display, Formatter};

use cursor::Span;
use number::Number;
use scanner::TokenData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum BinaryOperator {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Subtract,
    #[strum(serialize = "*")]
    Multiply,
    #[strum(serialize = "/")]
    Divide,
    #[strum(serialize = "//")]
    FloorDivide,
    #[strum(serialize = "%")]
    Modulo,
    #[strum(serialize = "**")]
    Power,
}

impl TryFrom<TokenData> for BinaryOperator {
    type Error = TokenData;

    fn try_from(data: TokenData) -> Result<Self, Self::Error> {
        Ok(match data {
            TokenData::Plus => Self::Add,
            TokenData::Minus => Self::Subtract,
            TokenData::Star => Self::Multiply,
            TokenData::Slash => Self::Divide,
            TokenData::DoubleSlash => Self::FloorDivide,
            TokenData::Percent => Self::Modulo,
            TokenData::DoubleStar => Self::Power,
            other => return Err(other),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum UnaryOperator {
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Minus,
}

impl TryFrom<TokenData> for UnaryOperator {
    type Error = TokenData;

    fn try_from(data: TokenData) -> Result<Self, Self::Error> {
        match data {
            TokenData::Plus => Ok(Self::Plus),
            TokenData::Minus => Ok(Self::Minus),
            other => Err(other),
        }
    }
}

/// Every node owns its children; `span` points at the operator token.
///
/// Left-associative chains can make the tree arbitrarily deep, so rendering
/// and dropping walk it with an explicit stack instead of recursing.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Number),
    Unary { operator: UnaryOperator, span: Span, right: Box<Expr> },
    Binary { left: Box<Expr>, operator: BinaryOperator, span: Span, right: Box<Expr> },
}

impl Expr {
    /// Moves every non-literal child onto `pending`, leaving literals behind.
    fn detach_children(&mut self, pending: &mut Vec<Expr>) {
        let mut detach = |child: &mut Box<Expr>| {
            if !matches!(**child, Expr::Literal(_)) {
                pending.push(std::mem::replace(&mut **child, Expr::Literal(Number::Int(0))));
            }
        };
        match self {
            Expr::Literal(_) => {}
            Expr::Unary { right, .. } => detach(right),
            Expr::Binary { left, right, .. } => {
                detach(left);
                detach(right);
            }
        }
    }
}

impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        enum Piece<'e> {
            Node(&'e Expr),
            Text(&'static str),
        }

        let mut pieces = vec![Piece::Node(self)];
        while let Some(piece) = pieces.pop() {
            match piece {
                Piece::Text(text) => write!(f, "{}", text)?,
                Piece::Node(Expr::Literal(value)) => write!(f, "{}", value)?,
                Piece::Node(Expr::Unary { operator, right, .. }) => {
                    write!(f, "({} ", operator)?;
                    pieces.extend([Piece::Text(")"), Piece::Node(right)]);
                }
                Piece::Node(Expr::Binary { left, operator, right, .. }) => {
                    write!(f, "({} ", operator)?;
                    pieces.extend([
                        Piece::Text(")"),
                        Piece::Node(right),
                        Piece::Text(" "),
                        Piece::Node(left),
                    ]);
                }
            }
        }
        Ok(())
    }
}
