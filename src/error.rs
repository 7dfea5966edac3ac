//! Diagnostics shared by every stage of the pipeline.
//!
//! Errors are anchored at a byte offset in the original input and render as
//! the offending source line followed by a caret under the bad character.

use std::fmt;

use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{0}")]
    Lex(Diagnostic),
    #[error("{0}")]
    Syntax(Diagnostic),
    #[error("{0}")]
    Semantic(Diagnostic),
}

impl CompileError {
    pub fn lex(input: &str, loc: usize, message: impl Into<String>) -> Self {
        Self::Lex(Diagnostic::at(input, loc, message))
    }

    pub fn syntax(input: &str, loc: usize, message: impl Into<String>) -> Self {
        Self::Syntax(Diagnostic::at(input, loc, message))
    }

    pub fn semantic(input: &str, loc: usize, message: impl Into<String>) -> Self {
        Self::Semantic(Diagnostic::at(input, loc, message))
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        match self {
            Self::Lex(d) | Self::Syntax(d) | Self::Semantic(d) => d,
        }
    }

    /// Byte offset of the offending character in the input.
    pub fn loc(&self) -> usize {
        self.diagnostic().loc
    }

    pub fn message(&self) -> &str {
        &self.diagnostic().message
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub line: String,
    pub loc: usize,
    pub column: usize,
    pub message: String,
}

impl Diagnostic {
    /// Anchor a message at `loc`, keeping only the source line that contains it.
    pub fn at(input: &str, loc: usize, message: impl Into<String>) -> Self {
        let loc = loc.min(input.len());
        let start = input[..loc].rfind('\n').map_or(0, |i| i + 1);
        let end = input[loc..].find('\n').map_or(input.len(), |i| loc + i);

        Self {
            line: input[start..end].to_string(),
            loc,
            column: input[start..loc].chars().count(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.line)?;
        write!(f, "{}^ {}", " ".repeat(self.column), self.message)
    }
}
