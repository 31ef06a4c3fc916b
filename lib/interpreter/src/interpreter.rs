use parser::{BinaryOperator, Expr, ParseError, Parser, UnaryOperator};
use scanner::Tokenizer;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("The denominator should not be zero")]
    DivisionByZero,
    #[error("Integer overflow in {0}")]
    Overflow(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InterpretError {
    #[error(transparent)]
    CompileError(#[from] ParseError),
    #[error(transparent)]
    RuntimeError(#[from] RuntimeError),
}

/// Tokenizes and parses one line. Every call starts from a fresh tokenizer and parser.
pub fn parse_source(source: &str) -> Result<Expr, ParseError> {
    Parser::new(Tokenizer::new(source))?.parse()
}

/// Runs the whole pipeline on one line and returns its value.
pub fn run_source(source: &str) -> Result<i64, InterpretError> {
    let expr = parse_source(source)?;
    let value = evaluate(&expr)?;
    log::debug!("{} = {}", expr, value);
    Ok(value)
}

/// Evaluates children before their parent, left before right. The first error aborts the walk.
pub fn evaluate(expr: &Expr) -> Result<i64, RuntimeError> {
    match expr {
        Expr::Number(value) => Ok(*value),

        Expr::Unary { operator, operand } => {
            let operand = evaluate(operand)?;
            match operator {
                UnaryOperator::Plus => Ok(operand),
                UnaryOperator::Minus => operand
                    .checked_neg()
                    .ok_or_else(|| RuntimeError::Overflow(format!("-({})", operand))),
            }
        }

        Expr::Binary { left, operator, right } => {
            let left = evaluate(left)?;
            let right = evaluate(right)?;
            let result = match operator {
                BinaryOperator::Plus => left.checked_add(right),
                BinaryOperator::Minus => left.checked_sub(right),
                BinaryOperator::Mul => left.checked_mul(right),
                BinaryOperator::Div => {
                    if right == 0 {
                        return Err(RuntimeError::DivisionByZero);
                    }
                    floor_div(left, right)
                }
            };
            result.ok_or_else(|| {
                RuntimeError::Overflow(format!("({}) {} ({})", left, operator, right))
            })
        }
    }
}

/// Integer division rounding toward negative infinity. `None` on overflow (`i64::MIN / -1`).
fn floor_div(left: i64, right: i64) -> Option<i64> {
    let quotient = left.checked_div(right)?;
    if left % right != 0 && (left < 0) != (right < 0) {
        Some(quotient - 1)
    } else {
        Some(quotient)
    }
}

#[cfg(test)]
mod tests {
    use parser::{SyntaxError, MAX_HEIGHT};
    use pretty_assertions::assert_eq;
    use scanner::{LexError, LexErrorType, TokenKind};

    use super::*;

    #[ctor::ctor]
    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn run(source: &str) -> i64 {
        run_source(source).unwrap()
    }

    #[test]
    fn precedence_and_grouping() {
        assert_eq!(run("2 + 3 * 4"), 14);
        assert_eq!(run("(2 + 3) * 4"), 20);
        assert_eq!(run("3 - (5 * (4 / 2 + 100) + - 16)"), -491);
    }

    #[test]
    fn left_associativity() {
        assert_eq!(run("10 - 3 - 2"), 5);
        assert_eq!(run("100 / 10 / 5"), 2);
    }

    #[test]
    fn unary_chaining() {
        assert_eq!(run("--5"), 5);
        assert_eq!(run("+-3"), -3);
        assert_eq!(run("-(2+3)"), -5);
        assert_eq!(run("- - - 1"), -1);
    }

    #[test]
    fn whitespace_is_insignificant() {
        assert_eq!(run("  3   +4 "), 7);
        assert_eq!(run("3+4"), 7);
    }

    #[test]
    fn floor_division() {
        for (a, b) in [(7, 2), (6, 3), (0, 5), (1, 7), (100, 7), (123456789, 1000)] {
            assert_eq!(run(&format!("{a} / {b}")), a / b, "{a} / {b}");
        }
        assert_eq!(run("7 / -2"), -4);
        assert_eq!(run("-7 / 2"), -4);
        assert_eq!(run("-7 / -2"), 3);
        assert_eq!(run("-6 / 3"), -2);
        assert_eq!(run("-1 / 10"), -1);
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(run_source("5 / 0"), Err(InterpretError::from(RuntimeError::DivisionByZero)));
        assert_eq!(
            run_source("0 / (3 - 3)"),
            Err(InterpretError::RuntimeError(RuntimeError::DivisionByZero))
        );
        assert_eq!(
            run_source("1 + 2 / 0 * 3").unwrap_err().to_string(),
            "The denominator should not be zero"
        );
    }

    #[test]
    fn overflow_is_an_error() {
        assert_eq!(run("9223372036854775807"), i64::MAX);
        assert_eq!(run("-9223372036854775807 - 1"), i64::MIN);
        assert!(matches!(
            run_source("9223372036854775807 + 1"),
            Err(InterpretError::RuntimeError(RuntimeError::Overflow(_)))
        ));
        assert!(matches!(
            run_source("-(-9223372036854775807 - 1)"),
            Err(InterpretError::RuntimeError(RuntimeError::Overflow(_)))
        ));
        assert_eq!(
            run_source("(-9223372036854775807 - 1) / -1").unwrap_err().to_string(),
            "Integer overflow in (-9223372036854775808) / (-1)"
        );
        assert!(run_source("3037000500 * 3037000500").is_err());
    }

    #[test]
    fn error_kinds() {
        assert!(matches!(
            run_source("3 + "),
            Err(InterpretError::CompileError(ParseError::Syntax(SyntaxError::ExpectedFactor {
                found: TokenKind::EndOfInput,
                ..
            })))
        ));
        assert!(matches!(
            run_source("3 $ 4"),
            Err(InterpretError::CompileError(ParseError::Lex(LexError {
                error: LexErrorType::UnexpectedCharacter('$'),
                ..
            })))
        ));
        assert!(matches!(
            run_source("(3 + 4"),
            Err(InterpretError::CompileError(ParseError::Syntax(SyntaxError::Expected { .. })))
        ));
        assert!(matches!(
            run_source("3 + 4)"),
            Err(InterpretError::CompileError(ParseError::Syntax(
                SyntaxError::TrailingInput { .. }
            )))
        ));
    }

    #[test]
    fn syntax_errors_win_over_division_by_zero() {
        // Nothing is evaluated unless the whole line parses
        assert!(matches!(run_source("1 / 0 +"), Err(InterpretError::CompileError(_))));
    }

    #[test]
    fn repeated_runs_agree() {
        let source = "2 * (3 + 4) - 10 / 3";
        let first = run_source(source);
        for _ in 0..3 {
            assert_eq!(run_source(source), first);
        }
        assert_eq!(first, Ok(11));
    }

    #[test]
    fn long_chains_fail_cleanly() {
        assert_eq!(run(&vec!["1"; MAX_HEIGHT].join("+")), MAX_HEIGHT as i64);

        let chain = vec!["1"; 100_000].join("+");
        assert!(matches!(
            run_source(&chain),
            Err(InterpretError::CompileError(ParseError::Syntax(
                SyntaxError::TooManyOperators { limit: MAX_HEIGHT, .. }
            )))
        ));
        // Nothing from the rejected line leaks into the next one
        assert_eq!(run("1 + 1"), 2);
    }

    #[test]
    fn evaluate_tree_directly() {
        let expr = Expr::binary(
            Expr::unary(UnaryOperator::Minus, Expr::Number(9)),
            BinaryOperator::Div,
            Expr::Number(4),
        );
        assert_eq!(evaluate(&expr), Ok(-3));
    }
}
