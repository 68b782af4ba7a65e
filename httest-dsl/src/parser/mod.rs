//! Parser module for the httest DSL

pub mod ast;
pub mod parser;

pub use ast::*;
pub use parser::*;
