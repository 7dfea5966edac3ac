use super::LocalVar;

/// A whole compilation unit: the top-level statements plus every variable
/// they mention, in the order they were first seen.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub locals: Vec<LocalVar>,
    pub stack_size: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Return(Expr),
    Block(Vec<Stmt>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(i64),
    LVar(LocalVar),
    Binary(BinOpKind, Box<Expr>, Box<Expr>),
    Assign {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        /// Byte offset of the assignment target.
        loc: usize,
    },
}

impl Expr {
    pub fn binary(kind: BinOpKind, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary(kind, Box::new(lhs), Box::new(rhs))
    }
}
