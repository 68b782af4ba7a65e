//! Lexer token types

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP methods a request statement may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// The method keyword as it appears in DSL source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token kinds for the httest DSL.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords
    Config,
    BaseUrl,
    Header,
    Let,
    Test,
    Expect,
    Status,
    Body,
    Contains,
    In,

    // HTTP method keywords (GET, POST, PUT, DELETE)
    Method(Method),

    // Delimiters
    LBrace,
    RBrace,
    LParen,
    RParen,
    Eq,
    Semicolon,
    DotDot,

    // Literals
    String(String),
    Number(u32),
    Identifier(String),
    /// `$name` variable reference (without the leading `$`).
    Variable(String),

    // Special
    Eof,
    Error(String),
}

/// Source location span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Default for Span {
    fn default() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 1,
            column: 1,
        }
    }
}

/// A token with its kind and source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}
