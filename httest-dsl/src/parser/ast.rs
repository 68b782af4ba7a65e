//! Abstract Syntax Tree types

use crate::lexer::{Method, Span};
use serde::{Deserialize, Serialize};

/// The root AST node for a compiled test-description file.
///
/// `default_headers` and `variables` are ordered mappings: entries keep their
/// first-insertion order, and a repeated key overwrites the stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Configured base URL. `None` (or an empty string) means every request
    /// URL in the file must be absolute.
    pub base_url: Option<String>,
    pub default_headers: Vec<(String, String)>,
    /// `let`-bound variables; both string and number literals are stored as
    /// their textual form.
    pub variables: Vec<(String, String)>,
    pub tests: Vec<TestBlock>,
}

impl Program {
    pub fn new() -> Self {
        Self {
            base_url: None,
            default_headers: Vec::new(),
            variables: Vec::new(),
            tests: Vec::new(),
        }
    }

    /// Look up a `let`-bound variable by name.
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

/// A named group of request and assertion statements, compiled into one
/// generated test unit. Holds at least one request and two assertions; the
/// parser enforces this when the block closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestBlock {
    pub name: String,
    pub statements: Vec<Statement>,
}

/// One statement inside a test block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Request(RequestStmt),
    Assert(AssertStmt),
}

/// A request statement: `GET "/path" { body = ...; header ... = ...; };`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestStmt {
    pub method: Method,
    pub url: String,
    /// Position of the URL string token.
    pub url_span: Span,
    pub body: Option<StringLit>,
    /// Per-request headers in declaration order. Duplicate names are kept,
    /// each entry carrying its own position.
    pub headers: Vec<HeaderEntry>,
    /// Position of the method keyword.
    pub span: Span,
}

/// A string literal together with the position of its token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringLit {
    pub text: String,
    pub span: Span,
}

/// A per-request header entry. The span marks the header value token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub name: String,
    pub value: String,
    pub span: Span,
}

/// An assertion statement: `expect <check>;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssertStmt {
    pub kind: AssertKind,
    /// Position of the `expect` keyword.
    pub span: Span,
}

/// The five assertion kinds, each carrying only its own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssertKind {
    StatusEq(u16),
    /// Inclusive on both ends: `lo <= status <= hi`.
    StatusIn(u16, u16),
    HeaderEq { key: String, value: String },
    HeaderContains { key: String, substring: String },
    BodyContains(String),
}

/// Parse error with line/column information.
///
/// Covers both grammar deviations and the structural rules checked during
/// parsing (duplicate test names, minimum statement counts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Line {}:Col {}: {}",
            self.line.max(1),
            self.column.max(1),
            self.message
        )
    }
}

impl std::error::Error for ParseError {}
