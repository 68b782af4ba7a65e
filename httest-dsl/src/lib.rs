//! httest DSL - HTTP test-description language compiler
//!
//! This crate compiles a small DSL describing HTTP requests and expected
//! response assertions into a runnable Rust test file.
//!
//! Architecture:
//! ```text
//! DSL Source (.test files)
//!     ↓
//! Lexer (positioned tokens)
//!     ↓
//! Parser (tokens → Program, inline structural checks)
//!     ↓
//! Validator (base-URL + variable scoping)
//!     ↓
//! Code generator (Program → Rust test source)
//! ```
//!
//! The crate never executes HTTP requests; it only emits code that will do
//! so when the generated file is compiled and run.

pub mod codegen;
pub mod lexer;
pub mod parser;
pub mod pretty_printer;
pub mod validator;

// Re-export key types for convenience
pub use codegen::generate;
pub use lexer::{Lexer, Method, Span, Token, TokenKind};
pub use parser::{ParseError, Parser, Program};
pub use pretty_printer::pretty_print;
pub use validator::{validate, ValidateError};

use thiserror::Error;

/// Any positioned diagnostic the pipeline can produce. Displays as
/// `Line {L}:Col {C}: {message}` regardless of the phase that raised it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validate(#[from] ValidateError),
}

/// Run the full pipeline over DSL source text and return the generated test
/// source. `origin` identifies the input (normally its path) and appears in
/// the generated file's header comment.
pub fn compile(source: &str, origin: &str) -> Result<String, CompileError> {
    let tokens = Lexer::new(source).tokenize();
    let mut parser = Parser::new(tokens);
    let program = parser.parse()?;
    validator::validate(&program)?;
    Ok(codegen::generate(&program, origin))
}
