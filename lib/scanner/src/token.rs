use std::fmt::{self, Display, Formatter};

use cursor::Offset;
use strum::EnumDiscriminants;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub data: TokenData,
    pub offset: Offset,
}

impl Token {
    pub fn new(data: TokenData, offset: Offset) -> Token {
        Self { data, offset }
    }

    pub fn kind(&self) -> TokenKind {
        self.data.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(TokenKind), derive(Hash))]
pub enum TokenData {
    // Single-character tokens.
    Plus,
    Minus,
    Mul,
    Div,
    LParen,
    RParen,

    // Literals.
    IntegerLiteral(i64),

    EndOfInput,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TokenKind::Plus => "'+'",
                TokenKind::Minus => "'-'",
                TokenKind::Mul => "'*'",
                TokenKind::Div => "'/'",
                TokenKind::LParen => "'('",
                TokenKind::RParen => "')'",
                TokenKind::IntegerLiteral => "integer",
                TokenKind::EndOfInput => "end of input",
            }
        )
    }
}
