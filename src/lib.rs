pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;

pub use error::{CompileError, CompileResult};

/// Compile one program to assembly text.
pub fn compile(input: &str) -> CompileResult<String> {
    let tokens = lexer::tokenize(input)?;
    let program = parser::parse(tokens, input)?;
    codegen::generate(&program, input)
}
