use tracing::debug;

use crate::error::{CompileError, CompileResult};

use super::{
    token::{KEYWORDS, ONE_SYMBOL_TOKENS, TWO_SYMBOLS_TOKENS},
    Token, TokenKind,
};

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

#[derive(Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    index: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            tokens: vec![],
            index: 0,
        }
    }

    fn new_token(&mut self, kind: TokenKind, len: usize) {
        self.tokens.push(Token {
            kind,
            loc: self.index,
            len,
        });
        self.index += len;
    }

    fn take_while(&self, f: impl Fn(u8) -> bool) -> &'a str {
        let input = self.input;
        let rest = &input[self.index..];
        let len = rest.bytes().take_while(|&c| f(c)).count();
        &rest[..len]
    }

    fn parse_number(&mut self) -> CompileResult<()> {
        let s = self.take_while(|c| c.is_ascii_digit());
        let value = s
            .parse()
            .map_err(|_| CompileError::lex(self.input, self.index, "number too large"))?;
        self.new_token(TokenKind::Num(value), s.len());
        Ok(())
    }

    fn parse_identifier(&mut self) {
        let s = self.take_while(is_ident_continue);

        if let Some(kind) = KEYWORDS.get(s) {
            self.new_token(kind.clone(), s.len());
        } else {
            self.new_token(TokenKind::Ident(s.to_string()), s.len());
        }
    }

    fn _tokenize(&mut self) -> CompileResult<()> {
        let input = self.input;
        let bytes = input.as_bytes();

        while self.index < bytes.len() {
            let c = bytes[self.index];
            let c2 = input.get(self.index..self.index + 2);
            let c1 = input.get(self.index..self.index + 1);

            if c.is_ascii_whitespace() {
                self.index += 1;
            } else if c.is_ascii_digit() {
                self.parse_number()?;
            } else if is_ident_start(c) {
                self.parse_identifier();
            } else if let Some(kind) = c2.and_then(|s| TWO_SYMBOLS_TOKENS.get(s)) {
                self.new_token(kind.clone(), 2);
            } else if let Some(kind) = c1.and_then(|s| ONE_SYMBOL_TOKENS.get(s)) {
                self.new_token(kind.clone(), 1);
            } else {
                return Err(CompileError::lex(input, self.index, "invalid token"));
            }
        }

        self.new_token(TokenKind::Eof, 0);
        Ok(())
    }

    pub fn tokenize(input: &str) -> CompileResult<Vec<Token>> {
        let mut lexer = Lexer::new(input);
        lexer._tokenize()?;
        debug!(tokens = lexer.tokens.len(), "tokenized input");

        Ok(lexer.tokens)
    }
}

/// Split `input` into tokens, ending with a single `Eof` token.
pub fn tokenize(input: &str) -> CompileResult<Vec<Token>> {
    Lexer::tokenize(input)
}
