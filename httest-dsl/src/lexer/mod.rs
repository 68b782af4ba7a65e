//! Lexer module for the httest DSL

pub mod scanner;
pub mod token;

pub use scanner::*;
pub use token::*;
