use cursor::Cursor;
use diagnostics::{Diagnostic, Diagnostics, Line, Location};

pub mod token;
pub use token::{Literal, Token, TokenKind};
use TokenKind::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    #[error("Unexpected character.")]
    UnexpectedCharacter,
    #[error("Unterminated string")]
    UnterminatedString,
}

impl ScanError {
    pub fn at(self, line: Line) -> Diagnostic {
        Diagnostic::new(line, Location::Nowhere, self.to_string())
    }
}

/// Scans all of `source`, reporting lexical errors into `diagnostics`.
pub fn scan<'a>(source: &'a str, diagnostics: &mut Diagnostics) -> Vec<Token<'a>> {
    Scanner::new(source, diagnostics).scan_tokens()
}

pub struct Scanner<'a, 'd> {
    start: Cursor<'a>,
    current: Cursor<'a>,
    tokens: Vec<Token<'a>>,
    diagnostics: &'d mut Diagnostics,
}

impl<'a, 'd> Scanner<'a, 'd> {
    pub fn new(source: &'a str, diagnostics: &'d mut Diagnostics) -> Self {
        Self {
            start: Cursor::new(source),
            current: Cursor::new(source),
            tokens: Vec::new(),
            diagnostics,
        }
    }

    pub fn scan_tokens(mut self) -> Vec<Token<'a>> {
        loop {
            self.start = self.current.clone();
            let Some(c) = self.current.next() else { break };
            self.scan_token(c);
        }

        self.tokens.push(Token::eof(self.current.line(), self.current.offset()));
        self.tokens
    }

    fn scan_token(&mut self, c: char) {
        match c {
            '(' => self.add_token(LeftParen),
            ')' => self.add_token(RightParen),
            '{' => self.add_token(LeftBrace),
            '}' => self.add_token(RightBrace),
            ',' => self.add_token(Comma),
            '.' => self.add_token(Dot),
            '-' => self.add_token(Minus),
            '+' => self.add_token(Plus),
            ';' => self.add_token(Semicolon),
            '*' => self.add_token(Star),

            '!' => self.add_token_if_followed_by_equal(BangEqual, Bang),
            '=' => self.add_token_if_followed_by_equal(EqualEqual, Equal),
            '<' => self.add_token_if_followed_by_equal(LessEqual, Less),
            '>' => self.add_token_if_followed_by_equal(GreaterEqual, Greater),

            '/' => {
                if self.current.next_if_eq('/') {
                    // Comment, the newline is scanned separately
                    self.current.eat_while(|c| c != '\n');
                } else {
                    self.add_token(Slash)
                }
            }

            ' ' | '\r' | '\t' | '\n' => (),

            '"' => self.string(),

            d if d.is_ascii_digit() => self.number(),

            c if is_identifier_start(c) => self.identifier(),

            _ => self.error(ScanError::UnexpectedCharacter),
        }
    }

    fn string(&mut self) {
        self.current.eat_while(|c| c != '"');

        if !self.current.next_if_eq('"') {
            return self.error(ScanError::UnterminatedString);
        }

        let lexeme = self.lexeme();
        let value = &lexeme[1..lexeme.len() - 1];
        self.add_literal_token(String, Literal::Str(value));
    }

    fn number(&mut self) {
        self.current.eat_while(|c| c.is_ascii_digit());

        // A trailing '.' is left for the next token
        if self.current.peek() == Some('.')
            && self.current.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.current.next();
            self.current.eat_while(|c| c.is_ascii_digit());
        }

        let value = self
            .lexeme()
            .parse()
            .unwrap_or_else(|e| unreachable!("Digits must parse as a number: {e}"));
        self.add_literal_token(Number, Literal::Number(value));
    }

    fn identifier(&mut self) {
        self.current.eat_while(is_identifier_continue);

        let kind = TokenKind::keyword(self.lexeme()).unwrap_or(Identifier);
        self.add_token(kind);
    }

    fn lexeme(&self) -> &'a str {
        self.start.slice_until(&self.current)
    }

    fn add_token_if_followed_by_equal(&mut self, with_equal: TokenKind, without: TokenKind) {
        if self.current.next_if_eq('=') {
            self.add_token(with_equal)
        } else {
            self.add_token(without)
        }
    }

    fn add_token(&mut self, kind: TokenKind) {
        self.push_token(kind, None);
    }

    fn add_literal_token(&mut self, kind: TokenKind, literal: Literal<'a>) {
        self.push_token(kind, Some(literal));
    }

    fn push_token(&mut self, kind: TokenKind, literal: Option<Literal<'a>>) {
        let token =
            Token::new(kind, self.lexeme(), literal, self.start.line(), self.start.offset());
        log::trace!("Scanned {token:?}");
        self.tokens.push(token);
    }

    fn error(&mut self, error: ScanError) {
        self.diagnostics.report(error.at(self.current.line()));
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
