mod expr;

pub use expr::Expr;

use diagnostics::{Diagnostic, Diagnostics, Line, Location};
use scanner::{Literal, Token, TokenKind};

use TokenKind::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: Line,
    pub location: Location,
}

impl ParseError {
    fn new(kind: ParseErrorKind, token: &Token) -> Self {
        let location =
            if token.is_eof() { Location::AtEnd } else { Location::At(token.lexeme.to_string()) };
        Self { kind, line: token.line, location }
    }
}

impl From<ParseError> for Diagnostic {
    fn from(error: ParseError) -> Self {
        Diagnostic::new(error.line, error.location, error.kind.to_string())
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum ParseErrorKind {
    #[error("Expect ')' after expression.")]
    MissingRightParen,
    #[error("Expect expression.")]
    ExpectedExpression,
    #[error("Expect end of expression.")]
    ExpectedEndOfExpression,
    #[error("Expression nests too deeply.")]
    TooDeeplyNested,
}

/// Maximum number of groupings and unary operators enclosing each other.
pub const MAX_NESTING: usize = 255;

pub type Result<T> = std::result::Result<T, ParseError>;

/// Parses `tokens` as a single expression. Syntax errors are reported into `diagnostics`, in which
/// case `None` is returned.
pub fn parse<'a>(tokens: &[Token<'a>], diagnostics: &mut Diagnostics) -> Option<Expr<'a>> {
    Parser::new(tokens, diagnostics).parse()
}

#[derive(Debug)]
pub struct Parser<'t, 'a, 'd> {
    tokens: &'t [Token<'a>],
    current: usize,
    depth: usize,
    diagnostics: &'d mut Diagnostics,
}

impl<'t, 'a, 'd> Parser<'t, 'a, 'd> {
    /// `tokens` must be terminated by an `Eof` token, as produced by the scanner.
    pub fn new(tokens: &'t [Token<'a>], diagnostics: &'d mut Diagnostics) -> Self {
        assert!(tokens.last().is_some_and(Token::is_eof), "Token stream must end with Eof");
        Self { tokens, current: 0, depth: 0, diagnostics }
    }

    pub fn parse(mut self) -> Option<Expr<'a>> {
        match self.expression_until_eof() {
            Ok(expr) => {
                log::debug!("Parsed {expr}");
                Some(expr)
            }
            Err(e) => {
                log::debug!("Aborted parse: {e:?}");
                None
            }
        }
    }

    fn expression_until_eof(&mut self) -> Result<Expr<'a>> {
        let expr = self.expression()?;
        self.consume(Eof, ParseErrorKind::ExpectedEndOfExpression)?;
        Ok(expr)
    }

    pub fn expression(&mut self) -> Result<Expr<'a>> {
        self.equality()
    }

    fn equality(&mut self) -> Result<Expr<'a>> {
        let mut expr = self.comparison()?;

        while let BangEqual | EqualEqual = self.peek().kind {
            let operator = self.advance().clone();
            let right = self.comparison()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr<'a>> {
        let mut expr = self.term()?;

        while let Greater | GreaterEqual | Less | LessEqual = self.peek().kind {
            let operator = self.advance().clone();
            let right = self.term()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr<'a>> {
        let mut expr = self.factor()?;

        while let Minus | Plus = self.peek().kind {
            let operator = self.advance().clone();
            let right = self.factor()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr<'a>> {
        let mut expr = self.unary()?;

        while let Slash | Star = self.peek().kind {
            let operator = self.advance().clone();
            let right = self.unary()?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr<'a>> {
        if let Bang | Minus = self.peek().kind {
            let operator = self.advance().clone();
            let right = self.nested(&operator, Self::unary)?;
            return Ok(Expr::unary(operator, right));
        }

        self.primary()
    }

    fn primary(&mut self) -> Result<Expr<'a>> {
        let token = self.peek();
        let expr = match (token.kind, token.literal) {
            (False, _) => Expr::Literal(Literal::Boolean(false)),
            (True, _) => Expr::Literal(Literal::Boolean(true)),
            (Nil, _) => Expr::Literal(Literal::Nil),
            (Number | String, Some(literal)) => Expr::Literal(literal),
            (LeftParen, _) => {
                self.advance();
                let expr = self.nested(token, Self::expression)?;
                self.consume(RightParen, ParseErrorKind::MissingRightParen)?;
                return Ok(Expr::grouping(expr));
            }
            _ => return Err(self.error(token, ParseErrorKind::ExpectedExpression)),
        };

        self.advance();
        Ok(expr)
    }

    /// Discards tokens until the start of the next statement, so that parsing can resume after
    /// an error.
    pub fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.advance().kind == Semicolon {
                return;
            }

            if let Class | Fun | Var | For | If | While | Print | Return = self.peek().kind {
                return;
            }
        }
    }
}

// Helpers
impl<'t, 'a, 'd> Parser<'t, 'a, 'd> {
    fn peek(&self) -> &'t Token<'a> {
        &self.tokens[self.current]
    }

    /// Returns the current token and moves to the next one, staying on `Eof`.
    fn advance(&mut self) -> &'t Token<'a> {
        let token = self.peek();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    fn consume(&mut self, kind: TokenKind, error: ParseErrorKind) -> Result<&'t Token<'a>> {
        let token = self.peek();
        if token.kind == kind {
            Ok(self.advance())
        } else {
            Err(self.error(token, error))
        }
    }

    /// Runs `production` one nesting level deeper, failing at `token` once `MAX_NESTING` is
    /// exceeded so deeply nested input can't overflow the stack.
    fn nested(
        &mut self,
        token: &Token,
        production: impl FnOnce(&mut Self) -> Result<Expr<'a>>,
    ) -> Result<Expr<'a>> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(token, ParseErrorKind::TooDeeplyNested));
        }

        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    fn error(&mut self, token: &Token, kind: ParseErrorKind) -> ParseError {
        let error = ParseError::new(kind, token);
        self.diagnostics.report(error.clone());
        error
    }
}
