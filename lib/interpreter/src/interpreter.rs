use cursor::Span;
use errors::{CalcError, Result};
use number::Number;
use parser::{BinaryOperator, Expr, Parser, UnaryOperator};
use scanner::TokenStream;

/// Scans, parses and evaluates `source` in one go.
///
/// Syntax errors are reported before anything is evaluated.
pub fn evaluate(source: &str) -> Result<Number> {
    let expr = Parser::new(TokenStream::new(source)).parse()?;
    let value = eval(&expr)?;
    log::debug!("{} = {}", source.trim(), value);
    Ok(value)
}

enum Step<'e> {
    Visit(&'e Expr),
    Unary(UnaryOperator, Span),
    Binary(BinaryOperator, Span),
}

/// Post-order walk: children first, left operand before right.
///
/// Uses an explicit stack, so long operator chains cannot exhaust the call stack.
pub fn eval(expr: &Expr) -> Result<Number> {
    let mut steps = vec![Step::Visit(expr)];
    let mut values: Vec<Number> = Vec::new();

    while let Some(step) = steps.pop() {
        let value = match step {
            Step::Visit(Expr::Literal(n)) => *n,
            Step::Visit(Expr::Unary { operator, span, right }) => {
                steps.extend([Step::Unary(*operator, *span), Step::Visit(right)]);
                continue;
            }
            Step::Visit(Expr::Binary { left, operator, span, right }) => {
                steps.extend([
                    Step::Binary(*operator, *span),
                    Step::Visit(right),
                    Step::Visit(left),
                ]);
                continue;
            }

            Step::Unary(operator, span) => {
                let Some(right) = values.pop() else { unreachable!("operand evaluated first") };
                let value = match operator {
                    UnaryOperator::Plus => right,
                    UnaryOperator::Minus => (-right).map_err(|e| {
                        CalcError::new(e.kind(), span, format!("{e}: -{right}"))
                    })?,
                };
                log::trace!("{}{} => {}", operator, right, value);
                value
            }

            Step::Binary(operator, span) => {
                let (Some(right), Some(left)) = (values.pop(), values.pop()) else {
                    unreachable!("operands evaluated first")
                };
                let value = apply(operator, left, right).map_err(|e| {
                    CalcError::new(e.kind(), span, format!("{e}: {left} {operator} {right}"))
                })?;
                log::trace!("{} {} {} => {}", left, operator, right, value);
                value
            }
        };
        values.push(value);
    }

    let Some(value) = values.pop() else { unreachable!("a tree has exactly one root") };
    Ok(value)
}

fn apply(operator: BinaryOperator, left: Number, right: Number) -> number::Result {
    use BinaryOperator::*;
    match operator {
        Add => left + right,
        Subtract => left - right,
        Multiply => left * right,
        Divide => left / right,
        FloorDivide => left.floor_div(right),
        Modulo => left % right,
        Power => left.pow(right),
    }
}

#[cfg(test)]
mod tests {
    use cursor::{Col, Line};
    use errors::ErrorKind;
    use number::Number::{Float, Int};
    use pretty_assertions::assert_eq;

    use super::*;

    #[ctor::ctor]
    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn float(source: &str) -> f64 {
        match evaluate(source) {
            Ok(Float(f)) => f,
            other => panic!("{source:?} should evaluate to a float, got {other:?}"),
        }
    }

    fn kind(source: &str) -> ErrorKind {
        evaluate(source).unwrap_err().kind
    }

    #[test]
    fn associativity() {
        assert_eq!(evaluate("1 - 2 - 3"), Ok(Int(-4)));
        assert_eq!(evaluate("2 ** 3 ** 2"), Ok(Int(512)));
        assert_eq!(evaluate("100 // 10 // 3"), Ok(Int(3)));
    }

    #[test]
    fn precedence() {
        assert_eq!(evaluate("-4 ** (3 - 5)"), Ok(Float(-0.0625)));
        assert_eq!(evaluate("1 + 9 * 2"), Ok(Int(19)));
        assert_eq!(evaluate("4 ** 3 - 5"), Ok(Int(59)));
        assert_eq!(evaluate("12345 // 10 % 100"), Ok(Int(34)));
        assert_eq!(evaluate("11 ** 8 // 1000 % 10"), Ok(Int(8)));
        assert_eq!(evaluate("-4 ** (+3 - -5)"), Ok(Int(-65536)));
    }

    #[test]
    fn type_promotion() {
        assert_eq!(evaluate("6 // 4"), Ok(Int(1)));
        assert_eq!(evaluate("6 / 4"), Ok(Float(1.5)));
        assert_eq!(evaluate("1.0 + 2.0"), Ok(Float(3.0)));
        assert_eq!(evaluate("12.5 // +2.5"), Ok(Float(5.0)));
        assert_eq!(evaluate("2 ** -1"), Ok(Float(0.5)));
        assert_eq!(evaluate("+7"), Ok(Int(7)));
        assert_eq!(evaluate("-(1.5)"), Ok(Float(-1.5)));
    }

    #[test]
    fn floats() {
        assert!((float("-1.4 * (+2.6 ** 7)") - -1124.4534246400003).abs() < 1e-9);
        assert!((float("+0.064 ** -1.333") - 39.026723786495694).abs() < 1e-9);
        assert!((float("-123.45 % -3.5") - -0.9500000000000028).abs() < 1e-9);
        assert!((float("1.234 % 1.0") - 0.23399999999999999).abs() < 1e-12);
        assert_eq!(float("83.4 // 24.6"), 3.0);
    }

    #[test]
    fn whitespace_is_insignificant() {
        let spaced = evaluate(" - 4  ** ( +3- -5 ) ");
        assert_eq!(spaced, evaluate("-4**(+3--5)"));
        assert_eq!(spaced, evaluate("-\t4 **\n(+3 - -5)"));
    }

    #[test]
    fn zero_division() {
        assert_eq!(kind("5 / 0"), ErrorKind::ZeroDivision);
        assert_eq!(kind("6 // 0"), ErrorKind::ZeroDivision);
        assert_eq!(kind("7 % 0"), ErrorKind::ZeroDivision);
        assert_eq!(kind("7.5 % 0.0"), ErrorKind::ZeroDivision);
        assert_eq!(kind("0 ** -1"), ErrorKind::ZeroDivision);
        assert_eq!(kind("1 / (2 - 2)"), ErrorKind::ZeroDivision);
    }

    #[test]
    fn overflow() {
        assert_eq!(kind("1234.0 ** 5678"), ErrorKind::Overflow);
        assert_eq!(kind("2 ** 64"), ErrorKind::Overflow);
        assert_eq!(kind("9223372036854775807 + 1"), ErrorKind::Overflow);
        assert_eq!(kind("-(-9223372036854775807 - 1)"), ErrorKind::Overflow);
    }

    #[test]
    fn syntax_errors_come_before_evaluation() {
        assert_eq!(kind("4 +"), ErrorKind::Syntax);
        assert_eq!(kind("1 + 9 2"), ErrorKind::Syntax);
        assert_eq!(kind("(12345 // (10 % 100)"), ErrorKind::Syntax);
        assert_eq!(kind("1 / 0 +"), ErrorKind::Syntax);
    }

    #[test]
    fn errors_point_at_the_operator() {
        let e = evaluate("1 +\n 3 // (2 - 2)").unwrap_err();
        assert_eq!(
            e,
            CalcError {
                kind: ErrorKind::ZeroDivision,
                line: Line(2),
                col: Col(4),
                message: "division by zero: 3 // 0".to_string(),
            }
        );
    }

    #[test]
    fn left_operand_fails_first() {
        let e = evaluate("1 / 0 + 0 ** -1").unwrap_err();
        assert_eq!(e.message, "division by zero: 1 / 0");
    }

    #[test]
    fn long_chains_evaluate() {
        assert_eq!(evaluate(&vec!["1"; 1_001].join(" + ")), Ok(Int(1001)));
        assert_eq!(evaluate(&vec!["1"; 100_000].join(" - ")), Ok(Int(-99_998)));
        assert_eq!(evaluate(&vec!["2.0"; 2_000].join(" / ")), Ok(Float(0.0)));
    }

    #[test]
    fn min_int_literal() {
        assert_eq!(evaluate("-9223372036854775808"), Ok(Int(i64::MIN)));
        assert_eq!(evaluate("-9223372036854775808 + 1"), Ok(Int(i64::MIN + 1)));
        assert_eq!(kind("9223372036854775808 - 1"), ErrorKind::Overflow);
        assert_eq!(kind("--9223372036854775808"), ErrorKind::Overflow);
    }

    #[test]
    fn oversized_literal_in_malformed_input_is_a_syntax_error() {
        assert_eq!(kind("99999999999999999999 +"), ErrorKind::Syntax);
        assert_eq!(kind("99999999999999999999"), ErrorKind::Overflow);
    }

    #[test]
    fn evaluating_the_same_tree_twice() {
        let expr = parser::parse("11 ** ((1000 // 8) % 10)").unwrap();
        assert_eq!(eval(&expr), eval(&expr));
        assert_eq!(eval(&expr), Ok(Int(161051)));
    }
}
