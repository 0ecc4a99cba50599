use std::{fmt::Formatter, str::Chars};

use derive_more::Display;

#[derive(Clone)]
pub struct Cursor<'a> {
    source: &'a str,
    chars: Chars<'a>,
    line: Line,
}

impl<'a> std::fmt::Debug for Cursor<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // The source is usually too verbose, only print it with {:#?}
        if f.alternate() {
            f.debug_struct("Cursor")
                .field("line", &self.line)
                .field("offset", &self.offset())
                .field("source", &self.source)
                .finish()
        } else {
            f.debug_struct("Cursor")
                .field("line", &self.line)
                .field("offset", &self.offset())
                .finish()
        }
    }
}

impl<'a> PartialEq for Cursor<'a> {
    fn eq(&self, other: &Self) -> bool {
        (self.source, self.chars.as_str()) == (other.source, other.chars.as_str())
    }
}

/// 1-based source line.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Line(pub usize);

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, chars: source.chars(), line: Line(1) }
    }

    pub fn line(&self) -> Line {
        self.line
    }

    /// Byte offset of the next character to be consumed.
    pub fn offset(&self) -> usize {
        self.source.len() - self.chars.as_str().len()
    }

    pub fn is_at_end(&self) -> bool {
        self.chars.as_str().is_empty()
    }
}

impl<'a> From<&'a str> for Cursor<'a> {
    fn from(source: &'a str) -> Self {
        Self::new(source)
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line.0 += 1;
        }
        c
    }
}

impl<'a> Cursor<'a> {
    pub fn slice_until(&self, end: &Cursor<'a>) -> &'a str {
        assert!(self.source == end.source);
        &self.source[self.offset()..end.offset()]
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    pub fn peek_next(&self) -> Option<char> {
        self.chars.clone().nth(1)
    }

    pub fn next_if_eq(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.next();
            true
        } else {
            false
        }
    }

    /// Consumes characters while `pred` holds, stopping in front of the first one that doesn't.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.next();
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn slice_until() {
        let mut cursor: Cursor = "ab\ncd\n\n".into();

        cursor.next(); // 'a'

        let start = cursor.clone();

        cursor.next(); // 'b'
        cursor.next(); // '\n'
        cursor.next(); // 'c'

        assert_eq!(start.slice_until(&cursor), "b\nc");
        assert_eq!((start.offset(), cursor.offset()), (1, 4));
    }

    #[test]
    fn lines_and_lookahead() {
        let mut cursor = Cursor::new("ab\ncd\n\n");

        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.peek_next(), Some('b'));
        assert_eq!(cursor.next(), Some('a'));
        assert_eq!(cursor.line(), Line(1));

        assert_eq!(cursor.next(), Some('b'));
        assert_eq!(cursor.peek(), Some('\n'));
        assert_eq!(cursor.line(), Line(1));

        assert_eq!(cursor.next(), Some('\n'));
        assert_eq!(cursor.line(), Line(2));

        cursor.next(); // 'c'
        cursor.next(); // 'd'

        assert_eq!(cursor.next(), Some('\n'));
        assert_eq!(cursor.next(), Some('\n'));
        assert_eq!(cursor.line(), Line(4));

        assert!(cursor.is_at_end());
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.line(), Line(4));

        cursor = "".into();
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.peek_next(), None);
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.line(), Line(1));
    }

    #[test]
    fn next_if_eq() {
        let mut cursor = Cursor::new("==>");

        assert!(cursor.next_if_eq('='));
        assert!(cursor.next_if_eq('='));
        assert!(!cursor.next_if_eq('='));
        assert_eq!(cursor.offset(), 2);
        assert_eq!(cursor.next(), Some('>'));
        assert!(!cursor.next_if_eq('>'));
    }

    #[test]
    fn eat_while() {
        let mut cursor = Cursor::new("123.5x");
        cursor.eat_while(|c| c.is_ascii_digit());
        assert_eq!(cursor.offset(), 3);
        assert_eq!(cursor.peek(), Some('.'));

        let mut cursor = Cursor::new("ab\ncd");
        cursor.eat_while(|c| c != '\n');
        assert_eq!(cursor.peek(), Some('\n'));
        assert_eq!(cursor.line(), Line(1));
    }

    #[test]
    fn multibyte_offsets() {
        let mut cursor = Cursor::new("é1");
        let start = cursor.clone();
        cursor.next();
        assert_eq!(cursor.offset(), 2);
        assert_eq!(start.slice_until(&cursor), "é");
    }
}
