use tracing::debug;

use crate::{
    error::{CompileError, CompileResult},
    lexer::{Token, TokenKind},
};

use super::{local_variables::LocalVariables, BinOpKind, Expr, Program, Stmt};

fn align_to(n: usize, align: usize) -> usize {
    n.div_ceil(align) * align
}

#[derive(Debug)]
pub struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    index: usize,
    locals: LocalVariables,
}

impl<'a> Parser<'a> {
    /// `tokens` must come from `input`. A missing trailing `Eof` is added.
    pub fn new(mut tokens: Vec<Token>, input: &'a str) -> Self {
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            tokens.push(Token {
                kind: TokenKind::Eof,
                loc: input.len(),
                len: 0,
            });
        }

        Self {
            input,
            tokens,
            index: 0,
            locals: LocalVariables::new(),
        }
    }

    pub fn parse(mut self) -> CompileResult<Program> {
        let body = self.parse_program()?;
        let stack_size = align_to(self.locals.get_last_offset(), 16);
        let locals = self.locals.into_vec();
        debug!(
            stmts = body.len(),
            locals = locals.len(),
            stack_size,
            "parsed program"
        );

        Ok(Program {
            body,
            locals,
            stack_size,
        })
    }

    fn peek(&self) -> &Token {
        // The stream always ends with Eof, and nothing consumes past it.
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn is_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn error_here(&self, message: impl Into<String>) -> CompileError {
        CompileError::syntax(self.input, self.peek().loc, message)
    }

    fn consume(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind != kind {
            return false;
        }
        self.index += 1;
        true
    }

    fn expect(&mut self, kind: &TokenKind) -> CompileResult<()> {
        if self.consume(kind) {
            Ok(())
        } else {
            Err(self.error_here(format!("expected \"{}\"", kind.spelling())))
        }
    }

    /// program = stmt*
    fn parse_program(&mut self) -> CompileResult<Vec<Stmt>> {
        let mut stmts = vec![];

        while !self.is_eof() {
            stmts.push(self.parse_stmt()?);
        }

        Ok(stmts)
    }

    /// stmt = "return" expr ";"
    ///      | "{" stmt* "}"
    ///      | expr ";"
    fn parse_stmt(&mut self) -> CompileResult<Stmt> {
        if self.consume(&TokenKind::Return) {
            let expr = self.parse_expr()?;
            self.expect(&TokenKind::SemiColon)?;
            Ok(Stmt::Return(expr))
        } else if self.consume(&TokenKind::OpenCurlyBrace) {
            let mut stmts = vec![];
            while !self.consume(&TokenKind::CloseCurlyBrace) {
                if self.is_eof() {
                    return Err(self.error_here("expected \"}\""));
                }
                stmts.push(self.parse_stmt()?);
            }
            Ok(Stmt::Block(stmts))
        } else {
            let expr = self.parse_expr()?;
            self.expect(&TokenKind::SemiColon)?;
            Ok(Stmt::Expr(expr))
        }
    }

    /// expr = assign
    fn parse_expr(&mut self) -> CompileResult<Expr> {
        self.parse_assign()
    }

    /// assign = equality ("=" assign)?
    fn parse_assign(&mut self) -> CompileResult<Expr> {
        let loc = self.peek().loc;
        let lhs = self.parse_equality()?;

        if self.consume(&TokenKind::Equal) {
            Ok(Expr::Assign {
                lhs: Box::new(lhs),
                rhs: Box::new(self.parse_assign()?),
                loc,
            })
        } else {
            Ok(lhs)
        }
    }

    /// equality = relational ("==" relational | "!=" relational)*
    fn parse_equality(&mut self) -> CompileResult<Expr> {
        let mut node = self.parse_relational()?;

        loop {
            if self.consume(&TokenKind::DoubleEqual) {
                node = Expr::binary(BinOpKind::Equal, node, self.parse_relational()?);
            } else if self.consume(&TokenKind::NotEqual) {
                node = Expr::binary(BinOpKind::NotEqual, node, self.parse_relational()?);
            } else {
                return Ok(node);
            }
        }
    }

    /// relational = add ("<" add | "<=" add | ">" add | ">=" add)*
    ///
    /// `a > b` is built as `b < a` and `a >= b` as `b <= a`.
    fn parse_relational(&mut self) -> CompileResult<Expr> {
        let mut node = self.parse_add()?;

        loop {
            if self.consume(&TokenKind::LessThan) {
                node = Expr::binary(BinOpKind::LessThan, node, self.parse_add()?);
            } else if self.consume(&TokenKind::LessEqual) {
                node = Expr::binary(BinOpKind::LessEqual, node, self.parse_add()?);
            } else if self.consume(&TokenKind::GreaterThan) {
                node = Expr::binary(BinOpKind::LessThan, self.parse_add()?, node);
            } else if self.consume(&TokenKind::GreaterEqual) {
                node = Expr::binary(BinOpKind::LessEqual, self.parse_add()?, node);
            } else {
                return Ok(node);
            }
        }
    }

    /// add = mul ("+" mul | "-" mul)*
    fn parse_add(&mut self) -> CompileResult<Expr> {
        let mut node = self.parse_mul()?;

        loop {
            if self.consume(&TokenKind::Plus) {
                node = Expr::binary(BinOpKind::Add, node, self.parse_mul()?);
            } else if self.consume(&TokenKind::Minus) {
                node = Expr::binary(BinOpKind::Sub, node, self.parse_mul()?);
            } else {
                return Ok(node);
            }
        }
    }

    /// mul = unary ("*" unary | "/" unary)*
    fn parse_mul(&mut self) -> CompileResult<Expr> {
        let mut node = self.parse_unary()?;

        loop {
            if self.consume(&TokenKind::Star) {
                node = Expr::binary(BinOpKind::Mul, node, self.parse_unary()?);
            } else if self.consume(&TokenKind::Slash) {
                node = Expr::binary(BinOpKind::Div, node, self.parse_unary()?);
            } else {
                return Ok(node);
            }
        }
    }

    /// unary = ("+" | "-")? unary
    ///       | primary
    fn parse_unary(&mut self) -> CompileResult<Expr> {
        if self.consume(&TokenKind::Plus) {
            self.parse_unary()
        } else if self.consume(&TokenKind::Minus) {
            Ok(Expr::binary(BinOpKind::Sub, Expr::Num(0), self.parse_unary()?))
        } else {
            self.parse_primary()
        }
    }

    /// primary = ident
    ///         | num
    ///         | "(" expr ")"
    fn parse_primary(&mut self) -> CompileResult<Expr> {
        match self.peek().kind.clone() {
            TokenKind::OpenParen => {
                self.index += 1;
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::CloseParen)?;
                Ok(expr)
            }
            TokenKind::Num(num) => {
                self.index += 1;
                Ok(Expr::Num(num))
            }
            TokenKind::Ident(name) => {
                let var = self.locals.get_lvar(&name);
                self.index += 1;
                Ok(Expr::LVar(var))
            }
            _ => Err(self.error_here("expected an expression")),
        }
    }
}

/// Parse a token stream produced from `input` into a program.
pub fn parse(tokens: Vec<Token>, input: &str) -> CompileResult<Program> {
    Parser::new(tokens, input).parse()
}
