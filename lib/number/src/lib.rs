use std::{
    fmt::{self, Display, Formatter},
    ops::{Add, Div, Mul, Neg, Rem, Sub},
};

use errors::ErrorKind;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulo by zero")]
    ModuloByZero,
    #[error("0 cannot be raised to a negative power")]
    ZeroToNegativePower,
    #[error("integer result does not fit in 64 bits")]
    IntegerOverflow,
    #[error("numerical result out of range")]
    FloatOverflow,
    #[error("result is not a real number")]
    NotReal,
}

impl ArithmeticError {
    pub fn kind(self) -> ErrorKind {
        match self {
            Self::DivisionByZero | Self::ModuloByZero | Self::ZeroToNegativePower => {
                ErrorKind::ZeroDivision
            }
            Self::IntegerOverflow | Self::FloatOverflow | Self::NotReal => ErrorKind::Overflow,
        }
    }
}

pub type Result = std::result::Result<Number, ArithmeticError>;

/// A literal without a decimal point is always `Int`, one with a decimal point
/// is always `Float`. Mixing the two in a binary operation yields `Float`.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::From)]
pub enum Number {
    Int(i64),
    Float(f64),
}

use Number::*;

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Int(i) => i as f64,
            Float(f) => f,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Int(i) => i == 0,
            Float(f) => f == 0.0,
        }
    }

    fn is_negative(self) -> bool {
        match self {
            Int(i) => i < 0,
            Float(f) => f < 0.0,
        }
    }

    /// Division rounding the quotient toward negative infinity.
    pub fn floor_div(self, rhs: Self) -> Result {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        match (self, rhs) {
            (Int(a), Int(b)) => {
                let q = a.checked_div(b).ok_or(ArithmeticError::IntegerOverflow)?;
                if a.wrapping_rem(b) != 0 && (a < 0) != (b < 0) {
                    Ok(Int(q - 1))
                } else {
                    Ok(Int(q))
                }
            }
            (a, b) => Ok(Float(float_div_mod(a.as_f64(), b.as_f64()).0)),
        }
    }

    pub fn pow(self, exponent: Self) -> Result {
        if self.is_zero() && exponent.is_negative() {
            return Err(ArithmeticError::ZeroToNegativePower);
        }
        match (self, exponent) {
            (Int(b), Int(e)) if e >= 0 => int_pow(b, e),
            (base, exponent) => {
                let (x, y) = (base.as_f64(), exponent.as_f64());
                let result = x.powf(y);
                if result.is_finite() || !x.is_finite() || !y.is_finite() {
                    Ok(Float(result))
                } else if result.is_nan() {
                    Err(ArithmeticError::NotReal)
                } else {
                    Err(ArithmeticError::FloatOverflow)
                }
            }
        }
    }
}

fn int_pow(base: i64, exponent: i64) -> Result {
    let Ok(exponent) = u32::try_from(exponent) else {
        // Only these bases survive an exponent this large.
        return match base {
            0 | 1 => Ok(Int(base)),
            -1 => Ok(Int(if exponent % 2 == 0 { 1 } else { -1 })),
            _ => Err(ArithmeticError::IntegerOverflow),
        };
    };
    base.checked_pow(exponent).map(Int).ok_or(ArithmeticError::IntegerOverflow)
}

/// Floored quotient and remainder of two floats. The remainder takes the sign
/// of the divisor and the quotient is rounded to the nearest integral value to
/// absorb the error of `(x - mod) / y`.
fn float_div_mod(x: f64, y: f64) -> (f64, f64) {
    let mut modulo = x % y;
    let mut div = (x - modulo) / y;
    if modulo != 0.0 {
        if (y < 0.0) != (modulo < 0.0) {
            modulo += y;
            div -= 1.0;
        }
    } else {
        modulo = 0.0f64.copysign(y);
    }

    let floordiv = if div != 0.0 {
        let floor = div.floor();
        if div - floor > 0.5 {
            floor + 1.0
        } else {
            floor
        }
    } else {
        0.0f64.copysign(x / y)
    };

    (floordiv, modulo)
}

impl Add for Number {
    type Output = Result;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Int(a), Int(b)) => a.checked_add(b).map(Int).ok_or(ArithmeticError::IntegerOverflow),
            (a, b) => Ok(Float(a.as_f64() + b.as_f64())),
        }
    }
}

impl Sub for Number {
    type Output = Result;

    fn sub(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Int(a), Int(b)) => a.checked_sub(b).map(Int).ok_or(ArithmeticError::IntegerOverflow),
            (a, b) => Ok(Float(a.as_f64() - b.as_f64())),
        }
    }
}

impl Mul for Number {
    type Output = Result;

    fn mul(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Int(a), Int(b)) => a.checked_mul(b).map(Int).ok_or(ArithmeticError::IntegerOverflow),
            (a, b) => Ok(Float(a.as_f64() * b.as_f64())),
        }
    }
}

/// True division, always `Float`.
impl Div for Number {
    type Output = Result;

    fn div(self, rhs: Self) -> Self::Output {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        Ok(Float(self.as_f64() / rhs.as_f64()))
    }
}

/// Floored modulo: the result has the sign of the divisor.
impl Rem for Number {
    type Output = Result;

    fn rem(self, rhs: Self) -> Self::Output {
        if rhs.is_zero() {
            return Err(ArithmeticError::ModuloByZero);
        }
        match (self, rhs) {
            (Int(a), Int(b)) => {
                let r = a.wrapping_rem(b);
                if r != 0 && (r < 0) != (b < 0) {
                    Ok(Int(r + b))
                } else {
                    Ok(Int(r))
                }
            }
            (a, b) => Ok(Float(float_div_mod(a.as_f64(), b.as_f64()).1)),
        }
    }
}

impl Neg for Number {
    type Output = Result;

    fn neg(self) -> Self::Output {
        match self {
            Int(i) => i.checked_neg().map(Int).ok_or(ArithmeticError::IntegerOverflow),
            Float(f) => Ok(Float(-f)),
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Int(i) => write!(f, "{i}"),
            Float(x) if x.is_nan() => write!(f, "nan"),
            Float(x) if x.is_infinite() => write!(f, "{}", if x > 0.0 { "inf" } else { "-inf" }),
            Float(x) if x != 0.0 && (x.abs() >= 1e16 || x.abs() < 1e-4) => {
                let formatted = format!("{x:e}");
                let (mantissa, exponent) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                write!(f, "{mantissa}e{sign}{digits:0>2}")
            }
            Float(x) => {
                let formatted = x.to_string();
                if formatted.contains('.') {
                    write!(f, "{formatted}")
                } else {
                    write!(f, "{formatted}.0")
                }
            }
        }
    }
}
