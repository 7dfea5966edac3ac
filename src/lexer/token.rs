use phf::phf_map;

pub(super) static KEYWORDS: phf::Map<&str, TokenKind> = phf_map! {
    "return" => TokenKind::Return,
};

pub(super) static TWO_SYMBOLS_TOKENS: phf::Map<&str, TokenKind> = phf_map! {
    "==" => TokenKind::DoubleEqual,
    "!=" => TokenKind::NotEqual,
    "<=" => TokenKind::LessEqual,
    ">=" => TokenKind::GreaterEqual,
};

pub(super) static ONE_SYMBOL_TOKENS: phf::Map<&str, TokenKind> = phf_map! {
    "+" => TokenKind::Plus,
    "-" => TokenKind::Minus,
    "*" => TokenKind::Star,
    "/" => TokenKind::Slash,
    "(" => TokenKind::OpenParen,
    ")" => TokenKind::CloseParen,
    "{" => TokenKind::OpenCurlyBrace,
    "}" => TokenKind::CloseCurlyBrace,
    ";" => TokenKind::SemiColon,
    "=" => TokenKind::Equal,
    "<" => TokenKind::LessThan,
    ">" => TokenKind::GreaterThan,
};

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Plus,
    Minus,
    Star,
    Slash,
    OpenParen,
    CloseParen,
    OpenCurlyBrace,
    CloseCurlyBrace,
    SemiColon,

    Equal,
    DoubleEqual,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,

    Num(i64),
    Ident(String),
    Return,

    Eof,
}

/// Coarse classification of a token, independent of which punctuator or
/// keyword it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenCategory {
    Ident,
    Punct,
    Num,
    Eof,
    Keyword,
}

impl TokenKind {
    pub fn category(&self) -> TokenCategory {
        match self {
            TokenKind::Ident(_) => TokenCategory::Ident,
            TokenKind::Num(_) => TokenCategory::Num,
            TokenKind::Return => TokenCategory::Keyword,
            TokenKind::Eof => TokenCategory::Eof,
            _ => TokenCategory::Punct,
        }
    }

    /// Source spelling of fixed tokens, used in "expected ..." messages.
    pub fn spelling(&self) -> &'static str {
        match self {
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenCurlyBrace => "{",
            TokenKind::CloseCurlyBrace => "}",
            TokenKind::SemiColon => ";",
            TokenKind::Equal => "=",
            TokenKind::DoubleEqual => "==",
            TokenKind::NotEqual => "!=",
            TokenKind::LessThan => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::GreaterThan => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Return => "return",
            TokenKind::Num(_) => "a number",
            TokenKind::Ident(_) => "an identifier",
            TokenKind::Eof => "end of input",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset into the input.
    pub loc: usize,
    pub len: usize,
}

impl Token {
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.loc..self.loc + self.len]
    }
}
