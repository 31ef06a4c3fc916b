mod expr;
pub use expr::{BinaryOperator, Expr, UnaryOperator};

use cursor::Offset;
use scanner::{LexError, Token, TokenData, TokenKind, Tokenizer};

use TokenData::*;

/// Unary signs and parentheses beyond this depth are rejected instead of overflowing the stack.
pub const MAX_NESTING: usize = 256;

/// Trees taller than this are rejected, so evaluating and dropping them stays within the stack.
/// Each operator of a flat chain like `1 + 2 + 3` adds one level.
pub const MAX_HEIGHT: usize = 1024;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("error at offset {offset}: Expected {expected}, found {found}")]
    Expected { expected: TokenKind, found: TokenKind, offset: Offset },
    #[error("error at offset {offset}: Expected a number, '(' or a sign, found {found}")]
    ExpectedFactor { found: TokenKind, offset: Offset },
    #[error("error at offset {offset}: Unexpected {found} after expression")]
    TrailingInput { found: TokenKind, offset: Offset },
    #[error("error at offset {offset}: Expression is nested more than {limit} levels deep")]
    TooDeeplyNested { limit: usize, offset: Offset },
    #[error("error at offset {offset}: Expression has more than {limit} levels of operators")]
    TooManyOperators { limit: usize, offset: Offset },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// A parsed subtree together with the number of levels it spans.
#[derive(Debug)]
struct Subtree {
    expr: Expr,
    height: usize,
}

impl Subtree {
    fn leaf(expr: Expr) -> Self {
        Self { expr, height: 1 }
    }
}

#[derive(Debug)]
pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    current: Token,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Pulls the first token right away, so a bad leading character already fails here.
    pub fn new(mut tokenizer: Tokenizer<'a>) -> Result<Self> {
        let current = tokenizer.next_token()?;
        Ok(Self { tokenizer, current, depth: 0 })
    }

    pub fn parse(mut self) -> Result<Expr> {
        let tree = self.expression()?;

        if self.current.data != EndOfInput {
            return Err(SyntaxError::TrailingInput {
                found: self.current.kind(),
                offset: self.current.offset,
            }
            .into());
        }

        log::debug!("Parsed {} ({} levels)", tree.expr, tree.height);
        Ok(tree.expr)
    }

    fn expression(&mut self) -> Result<Subtree> {
        let mut tree = self.term()?;

        while let Plus | Minus = self.current.data {
            let operator = self.advance()?;
            let right = self.term()?;
            let kind = match operator.data {
                Plus => BinaryOperator::Plus,
                _ => BinaryOperator::Minus,
            };
            tree = Self::binary(tree, kind, right, operator.offset)?;
        }
        Ok(tree)
    }

    fn term(&mut self) -> Result<Subtree> {
        let mut tree = self.factor()?;

        while let Mul | Div = self.current.data {
            let operator = self.advance()?;
            let right = self.factor()?;
            let kind = match operator.data {
                Mul => BinaryOperator::Mul,
                _ => BinaryOperator::Div,
            };
            tree = Self::binary(tree, kind, right, operator.offset)?;
        }
        Ok(tree)
    }

    fn factor(&mut self) -> Result<Subtree> {
        match self.current.data {
            Plus | Minus => {
                let operator = self.advance()?;
                self.descend()?;
                let operand = self.factor()?;
                self.depth -= 1;

                let kind = match operator.data {
                    Plus => UnaryOperator::Plus,
                    _ => UnaryOperator::Minus,
                };
                let height = Self::check_height(operand.height + 1, operator.offset)?;
                Ok(Subtree { expr: Expr::unary(kind, operand.expr), height })
            }
            IntegerLiteral(value) => {
                self.expect(TokenKind::IntegerLiteral)?;
                Ok(Subtree::leaf(Expr::Number(value)))
            }
            LParen => {
                self.expect(TokenKind::LParen)?;
                self.descend()?;
                let tree = self.expression()?;
                self.depth -= 1;
                self.expect(TokenKind::RParen)?;
                Ok(tree)
            }
            _ => Err(SyntaxError::ExpectedFactor {
                found: self.current.kind(),
                offset: self.current.offset,
            }
            .into()),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind() != kind {
            return Err(SyntaxError::Expected {
                expected: kind,
                found: self.current.kind(),
                offset: self.current.offset,
            }
            .into());
        }
        self.advance()
    }
}

// Helpers
impl<'a> Parser<'a> {
    /// Returns the token that was current and pulls the next one as lookahead.
    fn advance(&mut self) -> Result<Token> {
        let next = self.tokenizer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(SyntaxError::TooDeeplyNested {
                limit: MAX_NESTING,
                offset: self.current.offset,
            }
            .into());
        }
        Ok(())
    }

    fn binary(
        left: Subtree,
        operator: BinaryOperator,
        right: Subtree,
        offset: Offset,
    ) -> Result<Subtree> {
        let height = Self::check_height(left.height.max(right.height) + 1, offset)?;
        Ok(Subtree { expr: Expr::binary(left.expr, operator, right.expr), height })
    }

    fn check_height(height: usize, offset: Offset) -> Result<usize> {
        if height > MAX_HEIGHT {
            return Err(SyntaxError::TooManyOperators { limit: MAX_HEIGHT, offset }.into());
        }
        Ok(height)
    }
}
