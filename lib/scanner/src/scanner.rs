use cursor::{Cursor, Offset};

pub mod token;
pub use token::{Token, TokenData, TokenKind};
use TokenData::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("error at offset {offset}: {error}")]
pub struct LexError {
    pub error: LexErrorType,
    pub offset: Offset,
}

impl LexError {
    pub fn new(error: LexErrorType, offset: Offset) -> Self {
        Self { error, offset }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LexErrorType {
    #[error("Unexpected character: '{0}'")]
    UnexpectedCharacter(char),
    #[error("Integer literal does not fit in 64 bits: {0}")]
    IntegerTooLarge(String),
}

/// Splits one line of input into tokens, lazily, one `next_token()` call at a time.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { cursor: Cursor::new(source) }
    }

    /// Once the input is exhausted this keeps returning `EndOfInput`.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.cursor.eat_while(char::is_whitespace);

        let start = self.cursor.clone();
        let data = match self.cursor.next() {
            None => EndOfInput,
            Some('+') => Plus,
            Some('-') => Minus,
            Some('*') => Mul,
            Some('/') => Div,
            Some('(') => LParen,
            Some(')') => RParen,
            Some(d) if d.is_ascii_digit() => self.integer(&start)?,
            Some(c) => {
                return Err(LexError::new(LexErrorType::UnexpectedCharacter(c), start.offset()))
            }
        };

        let token = Token::new(data, start.offset());
        log::trace!("Scanned {:?} at offset {}", token.data, token.offset);
        Ok(token)
    }

    fn integer(&mut self, start: &Cursor<'a>) -> Result<TokenData, LexError> {
        self.cursor.eat_while(|c| c.is_ascii_digit());

        let lexeme = start.slice_until(&self.cursor);
        lexeme.parse().map(IntegerLiteral).map_err(|_| {
            LexError::new(LexErrorType::IntegerTooLarge(lexeme.to_string()), start.offset())
        })
    }
}
