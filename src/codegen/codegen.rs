use tracing::debug;

use crate::{
    error::{CompileError, CompileResult},
    parser::{BinOpKind, Expr, LocalVar, Program, Stmt},
};

/// Stack-machine emitter: every expression leaves exactly one value pushed,
/// statements pop it into `rax`.
pub struct Codegen<'a> {
    input: &'a str,
    out: String,
}

impl<'a> Codegen<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            out: String::new(),
        }
    }

    pub fn generate(mut self, program: &Program) -> CompileResult<String> {
        self.emit(".intel_syntax noprefix");
        self.emit(".globl main");
        self.emit(".text");
        self.gen_program(program)?;
        debug!(bytes = self.out.len(), "generated assembly");

        Ok(self.out)
    }

    fn emit(&mut self, s: &str) {
        self.out.push_str(s);
        self.out.push('\n');
    }

    fn epilogue(&mut self) {
        self.emit("  mov rsp, rbp");
        self.emit("  pop rbp");
        self.emit("  ret");
    }

    fn _gen_binop(&mut self, s: &str) {
        self.emit("  pop rdi");
        self.emit("  pop rax");
        self.emit(s);
        self.emit("  push rax");
    }

    fn gen_lval(&mut self, var: &LocalVar) {
        self.emit("  mov rax, rbp");
        self.emit(&format!("  sub rax, {}", var.offset));
        self.emit("  push rax");
    }

    fn gen_program(&mut self, program: &Program) -> CompileResult<()> {
        self.emit("main:");
        self.emit("  push rbp");
        self.emit("  mov rbp, rsp");
        if program.stack_size > 0 {
            self.emit(&format!("  sub rsp, {}", program.stack_size));
        }
        // Result of a program that never evaluates an expression.
        self.emit("  mov rax, 0");

        for stmt in &program.body {
            self.gen_stmt(stmt)?;
        }

        self.epilogue();
        Ok(())
    }

    fn gen_stmt(&mut self, stmt: &Stmt) -> CompileResult<()> {
        match stmt {
            Stmt::Expr(expr) => {
                self.gen_expr(expr)?;
                self.emit("  pop rax");
            }
            Stmt::Return(expr) => {
                self.gen_expr(expr)?;
                self.emit("  pop rax");
                self.epilogue();
            }
            Stmt::Block(stmts) => {
                for s in stmts {
                    self.gen_stmt(s)?;
                }
            }
        }
        Ok(())
    }

    fn gen_expr(&mut self, expr: &Expr) -> CompileResult<()> {
        match expr {
            Expr::Num(num) if i32::try_from(*num).is_err() => {
                self.emit(&format!("  mov rax, {}", num));
                self.emit("  push rax");
            }
            Expr::Num(num) => self.emit(&format!("  push {}", num)),
            Expr::LVar(var) => {
                self.gen_lval(var);
                self.emit("  pop rax");
                self.emit("  mov rax, [rax]");
                self.emit("  push rax");
            }
            Expr::Assign { lhs, rhs, loc } => {
                let Expr::LVar(var) = lhs.as_ref() else {
                    return Err(CompileError::semantic(
                        self.input,
                        *loc,
                        "left-hand side of assignment is not a variable",
                    ));
                };
                self.gen_lval(var);
                self.gen_expr(rhs)?;
                self.emit("  pop rdi");
                self.emit("  pop rax");
                self.emit("  mov [rax], rdi");
                self.emit("  push rdi");
            }
            Expr::Binary(kind, left, right) => {
                self.gen_expr(left)?;
                self.gen_expr(right)?;
                self.gen_bin_op_kind(kind);
            }
        }
        Ok(())
    }

    fn gen_bin_op_kind(&mut self, kind: &BinOpKind) {
        match kind {
            BinOpKind::Add => self._gen_binop("  add rax, rdi"),
            BinOpKind::Sub => self._gen_binop("  sub rax, rdi"),
            BinOpKind::Mul => self._gen_binop("  imul rax, rdi"),
            BinOpKind::Div => self._gen_binop("  cqo\n  idiv rdi"),

            BinOpKind::Equal => self._gen_binop("  cmp rax, rdi\n  sete al\n  movzb rax, al"),
            BinOpKind::NotEqual => self._gen_binop("  cmp rax, rdi\n  setne al\n  movzb rax, al"),
            BinOpKind::LessThan => self._gen_binop("  cmp rax, rdi\n  setl al\n  movzb rax, al"),
            BinOpKind::LessEqual => self._gen_binop("  cmp rax, rdi\n  setle al\n  movzb rax, al"),
        }
    }
}

/// Lower a parsed program to Intel-syntax x86-64 assembly.
pub fn generate(program: &Program, input: &str) -> CompileResult<String> {
    Codegen::new(input).generate(program)
}
