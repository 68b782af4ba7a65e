//! Post-parse semantic validation
//!
//! A read-only pass over the parsed [`Program`] for the rules that cannot be
//! checked locally during parsing: base-URL resolution and variable scoping.
//! Only request statements are subject to these rules; assertions are not.
//! The first violation in traversal order (tests, then statements, then
//! URL / headers / body within a request) is reported and the pass stops.

use crate::lexer::Span;
use crate::parser::ast::*;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$[A-Za-z_][A-Za-z0-9_]*").expect("variable pattern compiles"));

/// Errors raised by semantic validation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidateError {
    #[error("Line {line}:Col {column}: No base_url configured; path must be absolute")]
    RelativeUrlWithoutBase { line: usize, column: usize },

    #[error("Line {line}:Col {column}: undefined variable '{name}'")]
    UndefinedVariable {
        name: String,
        line: usize,
        column: usize,
    },
}

/// Validate a fully parsed program. Returns on the first violation.
pub fn validate(program: &Program) -> Result<(), ValidateError> {
    let has_base = program
        .base_url
        .as_deref()
        .map_or(false, |url| !url.is_empty());

    for test in &program.tests {
        for statement in &test.statements {
            let Statement::Request(request) = statement else {
                continue;
            };

            if !has_base && !is_absolute_url(&request.url) {
                return Err(ValidateError::RelativeUrlWithoutBase {
                    line: request.url_span.line.max(1),
                    column: request.url_span.column.max(1),
                });
            }

            check_variables(program, &request.url, request.url_span)?;
            for header in &request.headers {
                check_variables(program, &header.value, header.span)?;
            }
            if let Some(body) = &request.body {
                check_variables(program, &body.text, body.span)?;
            }
        }
    }

    Ok(())
}

/// Whether a URL is absolute for the purposes of the base-URL rule.
pub fn is_absolute_url(url: &str) -> bool {
    let url = url.trim();
    url.starts_with("http://") || url.starts_with("https://")
}

fn check_variables(program: &Program, text: &str, span: Span) -> Result<(), ValidateError> {
    for m in VAR_PATTERN.find_iter(text) {
        let name = &m.as_str()[1..];
        if program.variable(name).is_none() {
            return Err(ValidateError::UndefinedVariable {
                name: name.to_string(),
                line: span.line.max(1),
                column: span.column.max(1),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_url_detection() {
        assert!(is_absolute_url("http://example.com"));
        assert!(is_absolute_url("https://example.com/x"));
        assert!(is_absolute_url("  http://example.com  "));
        assert!(!is_absolute_url("/api/users"));
        assert!(!is_absolute_url("ftp://example.com"));
        assert!(!is_absolute_url(""));
    }

    #[test]
    fn variable_pattern_matches_identifiers_only() {
        let matches: Vec<&str> = VAR_PATTERN
            .find_iter("/u/$id?x=$_tok&y=$9bad")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(matches, vec!["$id", "$_tok"]);
    }
}
