use std::{fmt::Formatter, str::Chars};

use derive_more::Display;

#[derive(Clone)]
pub struct Cursor<'a> {
    source: &'a str,
    chars: Chars<'a>,
    offset: Offset,
}

impl<'a> std::fmt::Debug for Cursor<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Printing the source is usually too verbose, so by default we only print the offset
        if f.alternate() {
            f.debug_struct("Cursor")
                .field("offset", &self.offset)
                .field("source", &self.source)
                .finish()
        } else {
            f.debug_struct("Cursor").field("offset", &self.offset).finish()
        }
    }
}

/// 0-based position of a char in the source line, counted in chars (not bytes).
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Offset(pub usize);

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, chars: source.chars(), offset: Offset(0) }
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.chars.next();
        if c.is_some() {
            self.offset.0 += 1;
        }
        c
    }
}

impl<'a> Cursor<'a> {
    pub fn slice_until<'c>(&self, end: &'c Cursor<'a>) -> &'a str {
        assert!(self.source == end.source);
        &self.source[(self.source.len() - self.chars.as_str().len())
            ..(self.source.len() - end.chars.as_str().len())]
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// Advances past every char matching `predicate` and returns how many were consumed.
    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) -> usize {
        let mut eaten = 0;
        while self.peek().is_some_and(&predicate) {
            self.next();
            eaten += 1;
        }
        if eaten > 0 {
            log::trace!("Skipped {eaten} chars, now at offset {}", self.offset);
        }
        eaten
    }
}
