//! Parser implementation
//!
//! Recursive descent over the token stream:
//!
//! ```text
//! Program    := ConfigBlock? LetStmt* TestBlock+
//! ConfigBlock:= "config" "{" ConfigEntry* "}" ";"?
//! ConfigEntry:= "base_url" "=" STRING ";" | "header" STRING "=" STRING ";"
//! LetStmt    := "let" IDENT "=" (STRING|NUMBER) ";"
//! TestBlock  := "test" IDENT "{" Statement+ "}"
//! Statement  := RequestStmt | AssertStmt
//! RequestStmt:= METHOD STRING ( "{" ReqOpt* "}" )? ";"
//! ReqOpt     := "body" "=" STRING ";" | "header" STRING "=" STRING ";"
//! AssertStmt := "expect" AssertBody ";"
//! AssertBody := "status" "=" NUMBER
//!             | "status" "in" NUMBER ".." NUMBER
//!             | "header" STRING ("=" | "contains") STRING
//!             | "body" "contains" STRING
//! ```
//!
//! Fails fast on the first deviation; no recovery, no partial result.

use super::ast::*;
use crate::lexer::*;

/// Parser for the httest DSL.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a new parser from a vector of tokens.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse the full token stream into a [`Program`].
    pub fn parse(&mut self) -> Result<Program, ParseError> {
        if let Some(token) = self
            .tokens
            .iter()
            .find(|t| matches!(t.kind, TokenKind::Error(_)))
        {
            let message = match &token.kind {
                TokenKind::Error(msg) => format!("Lexer error: {}", msg),
                _ => "Lexer error".to_string(),
            };
            return Err(ParseError {
                message,
                line: token.span.line,
                column: token.span.column,
            });
        }

        let mut program = Program::new();

        if self.check(&TokenKind::Config) {
            self.parse_config(&mut program)?;
        }

        while self.check(&TokenKind::Let) {
            self.parse_let(&mut program)?;
        }

        if self.is_at_end() {
            return Err(self.error("expected at least one test block"));
        }

        // Seen names accumulate locally for this parse only.
        let mut seen_names: Vec<String> = Vec::new();
        while !self.is_at_end() {
            let block = self.parse_test(&seen_names)?;
            seen_names.push(block.name.clone());
            program.tests.push(block);
        }

        Ok(program)
    }

    /// Parse `config { ... }` into the program's base URL and default headers.
    fn parse_config(&mut self, program: &mut Program) -> Result<(), ParseError> {
        self.expect(TokenKind::Config)?;
        self.expect(TokenKind::LBrace)?;

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            match self.current().kind {
                TokenKind::BaseUrl => {
                    self.advance();
                    self.expect(TokenKind::Eq)?;
                    let url = self.expect_string("expected STRING after 'base_url ='")?;
                    self.expect(TokenKind::Semicolon)?;
                    program.base_url = Some(url);
                }
                TokenKind::Header => {
                    self.advance();
                    let name = self.expect_string("expected STRING header name")?;
                    self.expect(TokenKind::Eq)?;
                    let value = self.expect_string("expected STRING header value")?;
                    self.expect(TokenKind::Semicolon)?;
                    insert_entry(&mut program.default_headers, name, value);
                }
                _ => return Err(self.error("expected 'base_url' or 'header' in config block")),
            }
        }

        self.expect(TokenKind::RBrace)?;
        // Trailing ';' after the config block is optional.
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }
        Ok(())
    }

    /// Parse `let IDENT = (STRING|NUMBER);` into the variable mapping.
    fn parse_let(&mut self, program: &mut Program) -> Result<(), ParseError> {
        self.expect(TokenKind::Let)?;

        let name = match &self.current().kind {
            TokenKind::Identifier(s) => {
                let s = s.clone();
                self.advance();
                s
            }
            _ => return Err(self.error("expected IDENT after 'let'")),
        };

        self.expect(TokenKind::Eq)?;

        // Numbers keep their textual form; interpolation is text substitution.
        let value = match &self.current().kind {
            TokenKind::String(s) => {
                let s = s.clone();
                self.advance();
                s
            }
            TokenKind::Number(n) => {
                let s = n.to_string();
                self.advance();
                s
            }
            _ => return Err(self.error("expected STRING or NUMBER after '='")),
        };

        self.expect(TokenKind::Semicolon)?;
        insert_entry(&mut program.variables, name, value);
        Ok(())
    }

    /// Parse one `test IDENT { Statement+ }` block. Duplicate names and the
    /// minimum statement counts are checked as the block finishes.
    fn parse_test(&mut self, seen_names: &[String]) -> Result<TestBlock, ParseError> {
        let block_span = self.current().span;
        self.expect(TokenKind::Test)?;

        let name = match &self.current().kind {
            TokenKind::Identifier(s) => {
                let s = s.clone();
                self.advance();
                s
            }
            _ => return Err(self.error("expected IDENT after 'test'")),
        };

        self.expect(TokenKind::LBrace)?;

        let mut statements = Vec::new();
        let mut requests = 0usize;
        let mut assertions = 0usize;

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            match self.current().kind {
                TokenKind::Method(_) => {
                    statements.push(Statement::Request(self.parse_request()?));
                    requests += 1;
                }
                TokenKind::Expect => {
                    statements.push(Statement::Assert(self.parse_assert()?));
                    assertions += 1;
                }
                _ => return Err(self.error("expected request or 'expect' statement")),
            }
        }

        self.expect(TokenKind::RBrace)?;

        if seen_names.iter().any(|n| n == &name) {
            return Err(ParseError {
                message: format!("Duplicate test '{}'", name),
                line: block_span.line,
                column: block_span.column,
            });
        }

        if requests < 1 || assertions < 2 {
            return Err(ParseError {
                message: format!(
                    "{} must contain at least 1 request and at least 2 assertions",
                    name
                ),
                line: block_span.line,
                column: block_span.column,
            });
        }

        Ok(TestBlock { name, statements })
    }

    /// Parse `METHOD STRING ( "{" ReqOpt* "}" )? ";"`.
    fn parse_request(&mut self) -> Result<RequestStmt, ParseError> {
        let span = self.current().span;
        let method = match self.current().kind {
            TokenKind::Method(m) => {
                self.advance();
                m
            }
            _ => return Err(self.error("expected HTTP method")),
        };

        let (url, url_span) = self.expect_string_spanned("expected STRING url after method")?;

        let mut body = None;
        let mut headers = Vec::new();

        if self.check(&TokenKind::LBrace) {
            self.advance();
            while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
                match self.current().kind {
                    TokenKind::Body => {
                        self.advance();
                        self.expect(TokenKind::Eq)?;
                        let (text, text_span) =
                            self.expect_string_spanned("expected STRING after 'body ='")?;
                        self.expect(TokenKind::Semicolon)?;
                        body = Some(StringLit {
                            text,
                            span: text_span,
                        });
                    }
                    TokenKind::Header => {
                        self.advance();
                        let (name, _) = self.expect_string_spanned("expected STRING header name")?;
                        self.expect(TokenKind::Eq)?;
                        let (value, value_span) =
                            self.expect_string_spanned("expected STRING header value")?;
                        self.expect(TokenKind::Semicolon)?;
                        headers.push(HeaderEntry {
                            name,
                            value,
                            span: value_span,
                        });
                    }
                    _ => {
                        return Err(self.error("expected 'body' or 'header' in request options"))
                    }
                }
            }
            self.expect(TokenKind::RBrace)?;
        }

        if !self.check(&TokenKind::Semicolon) {
            return Err(self.error("expected ';' after request"));
        }
        self.advance();

        Ok(RequestStmt {
            method,
            url,
            url_span,
            body,
            headers,
            span,
        })
    }

    /// Parse `expect AssertBody ";"`.
    fn parse_assert(&mut self) -> Result<AssertStmt, ParseError> {
        let span = self.current().span;
        self.expect(TokenKind::Expect)?;

        let kind = match self.current().kind {
            TokenKind::Status => {
                self.advance();
                match self.current().kind {
                    TokenKind::Eq => {
                        self.advance();
                        AssertKind::StatusEq(self.expect_status_number()?)
                    }
                    TokenKind::In => {
                        self.advance();
                        let lo = self.expect_status_number()?;
                        self.expect(TokenKind::DotDot)?;
                        let hi = self.expect_status_number()?;
                        AssertKind::StatusIn(lo, hi)
                    }
                    _ => return Err(self.error("expected '=' or 'in' after 'status'")),
                }
            }
            TokenKind::Header => {
                self.advance();
                let key = self.expect_string("expected STRING header name")?;
                match self.current().kind {
                    TokenKind::Eq => {
                        self.advance();
                        let value = self.expect_string("expected STRING header value")?;
                        AssertKind::HeaderEq { key, value }
                    }
                    TokenKind::Contains => {
                        self.advance();
                        let substring = self.expect_string("expected STRING header value")?;
                        AssertKind::HeaderContains { key, substring }
                    }
                    _ => return Err(self.error("expected '=' or 'contains' after header name")),
                }
            }
            TokenKind::Body => {
                self.advance();
                if !self.check(&TokenKind::Contains) {
                    return Err(self.error("expected 'contains' after 'body'"));
                }
                self.advance();
                let substring = self.expect_string("expected STRING after 'body contains'")?;
                AssertKind::BodyContains(substring)
            }
            _ => return Err(self.error("expected 'status', 'header', or 'body' after 'expect'")),
        };

        if !self.check(&TokenKind::Semicolon) {
            return Err(self.error("expected ';' after assertion"));
        }
        self.advance();

        Ok(AssertStmt { kind, span })
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.check(&kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!("Expected {:?}", kind)))
        }
    }

    fn expect_string(&mut self, msg: &str) -> Result<String, ParseError> {
        self.expect_string_spanned(msg).map(|(s, _)| s)
    }

    fn expect_string_spanned(&mut self, msg: &str) -> Result<(String, Span), ParseError> {
        match &self.current().kind {
            TokenKind::String(s) => {
                let s = s.clone();
                let span = self.current().span;
                self.advance();
                Ok((s, span))
            }
            _ => Err(self.error(msg)),
        }
    }

    fn expect_status_number(&mut self) -> Result<u16, ParseError> {
        match self.current().kind {
            TokenKind::Number(n) => match u16::try_from(n) {
                Ok(n) => {
                    self.advance();
                    Ok(n)
                }
                Err(_) => Err(self.error("expected NUMBER for status")),
            },
            _ => Err(self.error("expected NUMBER for status")),
        }
    }

    fn error(&self, msg: &str) -> ParseError {
        let span = self.current().span;
        ParseError {
            message: msg.to_string(),
            line: span.line,
            column: span.column,
        }
    }
}

/// Insert into an ordered mapping: a repeated key overwrites the value in
/// place, keeping first-insertion order.
fn insert_entry(entries: &mut Vec<(String, String)>, name: String, value: String) {
    match entries.iter_mut().find(|(n, _)| n == &name) {
        Some(entry) => entry.1 = value,
        None => entries.push((name, value)),
    }
}
