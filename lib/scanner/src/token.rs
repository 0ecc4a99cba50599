use std::fmt::{self, Display, Formatter};

use cursor::Line;

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    pub literal: Option<Literal<'a>>,
    pub line: Line,
    /// Byte offset of the lexeme in the source.
    pub offset: usize,
}

impl<'a> Token<'a> {
    pub fn new(
        kind: TokenKind,
        lexeme: &'a str,
        literal: Option<Literal<'a>>,
        line: Line,
        offset: usize,
    ) -> Self {
        Self { kind, lexeme, literal, line, offset }
    }

    pub fn eof(line: Line, offset: usize) -> Self {
        Self::new(TokenKind::Eof, "", None, line, offset)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lexeme)
    }
}

/// Decoded value of a literal. Tokens only ever carry `Number` and `Str`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'a> {
    Nil,
    Boolean(bool),
    Number(f64),
    Str(&'a str),
}

impl Display for Literal<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Nil => write!(f, "nil"),
            Literal::Boolean(b) => write!(f, "{b}"),
            Literal::Number(n) => write!(f, "{n}"),
            Literal::Str(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumIter)]
pub enum TokenKind {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier,
    String,
    Number,

    // Keywords.
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

impl TokenKind {
    pub fn keyword(lexeme: &str) -> Option<TokenKind> {
        use TokenKind::*;
        Some(match lexeme {
            "and" => And,
            "class" => Class,
            "else" => Else,
            "false" => False,
            "for" => For,
            "fun" => Fun,
            "if" => If,
            "nil" => Nil,
            "or" => Or,
            "print" => Print,
            "return" => Return,
            "super" => Super,
            "this" => This,
            "true" => True,
            "var" => Var,
            "while" => While,
            _ => return None,
        })
    }
}
