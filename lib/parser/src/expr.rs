use std::fmt::{self, Display, Formatter};

use scanner::{Literal, Token};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    Binary { left: Box<Expr<'a>>, operator: Token<'a>, right: Box<Expr<'a>> },
    Grouping(Box<Expr<'a>>),
    Unary { operator: Token<'a>, right: Box<Expr<'a>> },
    Literal(Literal<'a>),
}

impl<'a> Expr<'a> {
    pub fn binary(left: Expr<'a>, operator: Token<'a>, right: Expr<'a>) -> Self {
        Expr::Binary { left: Box::new(left), operator, right: Box::new(right) }
    }

    pub fn grouping(expression: Expr<'a>) -> Self {
        Expr::Grouping(Box::new(expression))
    }

    pub fn unary(operator: Token<'a>, right: Expr<'a>) -> Self {
        Expr::Unary { operator, right: Box::new(right) }
    }
}

/// Prints the tree in prefix form, e.g. `(* (group (+ 1 2)) 3)`.
impl Display for Expr<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary { left, operator, right } => {
                write!(f, "({} {} {})", operator, left, right)
            }
            Expr::Grouping(expression) => {
                write!(f, "(group {})", expression)
            }
            Expr::Unary { operator, right } => {
                write!(f, "({} {})", operator, right)
            }
            Expr::Literal(value) => {
                write!(f, "{}", value)
            }
        }
    }
}
