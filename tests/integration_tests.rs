use stackcc::codegen::generate;
use stackcc::lexer::{tokenize, TokenCategory, TokenKind};
use stackcc::parser::*;
use stackcc::{compile, CompileError};

fn generate_ast(input: &str) -> Program {
    let tokens = tokenize(input).unwrap();
    parse(tokens, input).unwrap()
}

fn single_expr(input: &str) -> Expr {
    let program = generate_ast(input);
    let [Stmt::Expr(expr)] = &program.body[..] else {
        panic!("expected a single expression statement: {:?}", program.body);
    };
    expr.clone()
}

fn num(n: i64) -> Expr {
    Expr::Num(n)
}

fn var(name: &str, offset: usize) -> Expr {
    Expr::LVar(LocalVar {
        name: name.to_string(),
        offset,
    })
}

#[test]
fn tokenize_positions_and_lengths() {
    let input = "foo1 = 123 >= 4;";
    let tokens = tokenize(input).unwrap();
    let summary = tokens
        .iter()
        .map(|t| (t.kind.clone(), t.loc, t.len))
        .collect::<Vec<_>>();

    assert_eq!(
        summary,
        vec![
            (TokenKind::Ident("foo1".to_string()), 0, 4),
            (TokenKind::Equal, 5, 1),
            (TokenKind::Num(123), 7, 3),
            (TokenKind::GreaterEqual, 11, 2),
            (TokenKind::Num(4), 14, 1),
            (TokenKind::SemiColon, 15, 1),
            (TokenKind::Eof, 16, 0),
        ]
    );
    assert_eq!(tokens[2].text(input), "123");
}

#[test]
fn tokenize_return_keyword_boundary() {
    let tokens = tokenize("return returnValue _return return_1 return;").unwrap();
    let categories = tokens.iter().map(|t| t.kind.category()).collect::<Vec<_>>();

    assert_eq!(
        categories,
        vec![
            TokenCategory::Keyword,
            TokenCategory::Ident,
            TokenCategory::Ident,
            TokenCategory::Ident,
            TokenCategory::Keyword,
            TokenCategory::Punct,
            TokenCategory::Eof,
        ]
    );
}

#[test]
fn tokenize_two_symbol_operators_greedily() {
    let tokens = tokenize("a==b!=c<=d<e>f>=g=h").unwrap();
    let ops = tokens
        .iter()
        .filter(|t| t.kind.category() == TokenCategory::Punct)
        .map(|t| t.kind.clone())
        .collect::<Vec<_>>();

    assert_eq!(
        ops,
        vec![
            TokenKind::DoubleEqual,
            TokenKind::NotEqual,
            TokenKind::LessEqual,
            TokenKind::LessThan,
            TokenKind::GreaterThan,
            TokenKind::GreaterEqual,
            TokenKind::Equal,
        ]
    );
}

#[test]
fn tokenize_always_ends_with_one_eof() {
    for input in ["", "   \n\t", "1;", "{ a = 1; }"] {
        let tokens = tokenize(input).unwrap();
        let eofs = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Eof)
            .count();
        assert_eq!(eofs, 1, "{:?}", input);
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::Eof);
        assert_eq!((last.loc, last.len), (input.len(), 0));
    }
}

#[test]
fn tokenize_rejects_unknown_character() {
    let err = tokenize("1 + @;").unwrap_err();
    assert!(matches!(err, CompileError::Lex(_)));
    assert_eq!(err.loc(), 4);
    assert_eq!(err.to_string(), "1 + @;\n    ^ invalid token");

    let err = tokenize("a = !b;").unwrap_err();
    assert_eq!(err.loc(), 4);

    let err = tokenize("x = é;").unwrap_err();
    assert_eq!(err.loc(), 4);
}

#[test]
fn tokenize_rejects_overflowing_number() {
    let err = tokenize("1 + 99999999999999999999;").unwrap_err();
    assert!(matches!(err, CompileError::Lex(_)));
    assert_eq!(err.loc(), 4);
    assert_eq!(err.message(), "number too large");
}

#[test]
fn parse_precedence_and_left_associativity() {
    assert_eq!(
        single_expr("1 + 2 * 3 - 4 / 2;"),
        Expr::binary(
            BinOpKind::Sub,
            Expr::binary(
                BinOpKind::Add,
                num(1),
                Expr::binary(BinOpKind::Mul, num(2), num(3)),
            ),
            Expr::binary(BinOpKind::Div, num(4), num(2)),
        )
    );

    assert_eq!(
        single_expr("1 - 2 - 3;"),
        Expr::binary(
            BinOpKind::Sub,
            Expr::binary(BinOpKind::Sub, num(1), num(2)),
            num(3),
        )
    );

    assert_eq!(
        single_expr("1 < 2 == 3 <= 4;"),
        Expr::binary(
            BinOpKind::Equal,
            Expr::binary(BinOpKind::LessThan, num(1), num(2)),
            Expr::binary(BinOpKind::LessEqual, num(3), num(4)),
        )
    );
}

#[test]
fn parse_greater_than_swaps_operands() {
    assert_eq!(
        single_expr("1 > 2;"),
        Expr::binary(BinOpKind::LessThan, num(2), num(1))
    );
    assert_eq!(
        single_expr("1 + 1 >= 2;"),
        Expr::binary(
            BinOpKind::LessEqual,
            num(2),
            Expr::binary(BinOpKind::Add, num(1), num(1)),
        )
    );
}

#[test]
fn parse_unary_operators() {
    assert_eq!(single_expr("+5;"), num(5));
    assert_eq!(
        single_expr("-5;"),
        Expr::binary(BinOpKind::Sub, num(0), num(5))
    );
    assert_eq!(
        single_expr("- -3;"),
        Expr::binary(
            BinOpKind::Sub,
            num(0),
            Expr::binary(BinOpKind::Sub, num(0), num(3)),
        )
    );
}

#[test]
fn parse_assignment_is_right_associative() {
    let Expr::Assign { lhs, rhs, loc } = single_expr("a = b = 5;") else {
        panic!("expected an assignment");
    };
    assert_eq!(*lhs, var("a", 8));
    assert_eq!(loc, 0);
    let Expr::Assign { lhs, rhs, loc } = *rhs else {
        panic!("expected a nested assignment");
    };
    assert_eq!(*lhs, var("b", 16));
    assert_eq!(*rhs, num(5));
    assert_eq!(loc, 4);
}

#[test]
fn parse_assigns_slots_in_first_occurrence_order() {
    let program = generate_ast("zeta = 1; alpha = zeta; { mid = alpha; } zeta;");
    let locals = program
        .locals
        .iter()
        .map(|v| (v.name.as_str(), v.offset))
        .collect::<Vec<_>>();

    assert_eq!(locals, vec![("zeta", 8), ("alpha", 16), ("mid", 24)]);
    assert_eq!(program.stack_size, 32);
    assert_eq!(program.body[3], Stmt::Expr(var("zeta", 8)));
}

#[test]
fn parse_is_deterministic_across_runs() {
    let input = "b = 2; a = 1; c = a + b; { d = c; } return d;";
    assert_eq!(generate_ast(input), generate_ast(input));
}

#[test]
fn parse_blocks_and_return() {
    let program = generate_ast("{ 1; { } { 2; } } return 3; 999;");
    assert_eq!(
        program.body,
        vec![
            Stmt::Block(vec![
                Stmt::Expr(num(1)),
                Stmt::Block(vec![]),
                Stmt::Block(vec![Stmt::Expr(num(2))]),
            ]),
            Stmt::Return(num(3)),
            Stmt::Expr(num(999)),
        ]
    );
    assert!(program.locals.is_empty());
    assert_eq!(program.stack_size, 0);
}

#[test]
fn parse_has_no_statement_limit() {
    let input = "x = x + 1; ".repeat(500);
    let program = generate_ast(&input);
    assert_eq!(program.body.len(), 500);
    assert_eq!(program.locals.len(), 1);
}

#[test]
fn parse_reports_missing_semicolon() {
    let input = "a = 1; b = 2";
    let err = parse(tokenize(input).unwrap(), input).unwrap_err();
    assert!(matches!(err, CompileError::Syntax(_)));
    assert_eq!(err.loc(), input.len());
    assert_eq!(err.message(), "expected \";\"");

    let input = "1 2;";
    let err = parse(tokenize(input).unwrap(), input).unwrap_err();
    assert_eq!(err.loc(), 2);
}

#[test]
fn parse_reports_unmatched_parens() {
    let input = "1 + 2);";
    let err = parse(tokenize(input).unwrap(), input).unwrap_err();
    assert!(matches!(err, CompileError::Syntax(_)));
    assert_eq!(err.loc(), 5);
    assert_eq!(err.to_string(), "1 + 2);\n     ^ expected \";\"");

    let input = ");";
    let err = parse(tokenize(input).unwrap(), input).unwrap_err();
    assert_eq!(err.loc(), 0);
    assert_eq!(err.message(), "expected an expression");

    let input = "(1 + 2;";
    let err = parse(tokenize(input).unwrap(), input).unwrap_err();
    assert_eq!(err.loc(), 6);
    assert_eq!(err.message(), "expected \")\"");
}

#[test]
fn parse_reports_unclosed_block() {
    let input = "{ 1; { 2; }";
    let err = parse(tokenize(input).unwrap(), input).unwrap_err();
    assert_eq!(err.loc(), input.len());
    assert_eq!(err.message(), "expected \"}\"");
}

#[test]
fn diagnostic_points_into_the_right_line() {
    let input = "a = 1;\nb = (2;\nc;";
    let err = compile(input).unwrap_err();
    assert_eq!(err.loc(), 13);
    assert_eq!(err.to_string(), "b = (2;\n      ^ expected \")\"");
}

#[test]
fn codegen_emits_frame_sized_to_locals() {
    let asm = compile("a = 1; b = 2; c = 3; a + b + c;").unwrap();
    let lines = asm.lines().collect::<Vec<_>>();

    assert_eq!(
        &lines[..9],
        &[
            ".intel_syntax noprefix",
            ".globl main",
            ".text",
            "main:",
            "  push rbp",
            "  mov rbp, rsp",
            "  sub rsp, 32",
            "  mov rax, 0",
            "  mov rax, rbp",
        ]
    );
    assert_eq!(
        &lines[lines.len() - 3..],
        &["  mov rsp, rbp", "  pop rbp", "  ret"]
    );
}

#[test]
fn codegen_skips_frame_without_locals() {
    let asm = compile("1;").unwrap();
    assert!(!asm.contains("sub rsp"));
    assert_eq!(
        asm,
        ".intel_syntax noprefix
.globl main
.text
main:
  push rbp
  mov rbp, rsp
  mov rax, 0
  push 1
  pop rax
  mov rsp, rbp
  pop rbp
  ret
"
    );
}

#[test]
fn codegen_assignment_stores_and_pushes_value() {
    let asm = compile("x = 7;").unwrap();
    assert!(asm.contains(
        "  mov rax, rbp
  sub rax, 8
  push rax
  push 7
  pop rdi
  pop rax
  mov [rax], rdi
  push rdi
"
    ));
}

#[test]
fn codegen_rejects_non_variable_assignment() {
    let input = "a = 1; (a + 1) = 2;";
    let err = compile(input).unwrap_err();
    assert!(matches!(err, CompileError::Semantic(_)));
    assert_eq!(err.loc(), 7);

    let err = compile("1 = 2;").unwrap_err();
    assert_eq!(err.loc(), 0);
}

#[test]
fn codegen_large_immediates_go_through_rax() {
    let asm = compile("4294967296;").unwrap();
    assert!(asm.contains("  mov rax, 4294967296\n  push rax\n"));

    let asm = compile("2147483647;").unwrap();
    assert!(asm.contains("  push 2147483647\n"));
}

#[test]
fn codegen_return_emits_epilogue_inline() {
    let asm = compile("return 3; 999;").unwrap();
    assert_eq!(asm.matches("  ret\n").count(), 2);
    let first_ret = asm.find("  ret\n").unwrap();
    assert!(first_ret < asm.find("push 999").unwrap());
}

#[test]
fn codegen_division_sign_extends() {
    let program = generate_ast("7 / 2;");
    let asm = generate(&program, "7 / 2;").unwrap();
    assert!(asm.contains("  cqo\n  idiv rdi\n"));
}
