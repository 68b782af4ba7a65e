//! Pretty-printer: AST → canonical DSL source
//!
//! Renders a [`Program`] back to parseable DSL text. Used for round-trip
//! testing: printing and re-parsing yields an equivalent AST (spans aside).

use crate::parser::ast::*;

/// Pretty-print a program back to DSL source code.
pub fn pretty_print(program: &Program) -> String {
    let mut out = String::new();

    if program.base_url.is_some() || !program.default_headers.is_empty() {
        out.push_str("config {\n");
        if let Some(base) = &program.base_url {
            out.push_str(&format!("  base_url = {};\n", dsl_str(base)));
        }
        for (name, value) in &program.default_headers {
            out.push_str(&format!(
                "  header {} = {};\n",
                dsl_str(name),
                dsl_str(value)
            ));
        }
        out.push_str("}\n\n");
    }

    for (name, value) in &program.variables {
        out.push_str(&format!("let {} = {};\n", name, dsl_value(value)));
    }
    if !program.variables.is_empty() {
        out.push('\n');
    }

    for test in &program.tests {
        out.push_str(&pretty_print_test(test));
        out.push('\n');
    }

    out
}

fn pretty_print_test(test: &TestBlock) -> String {
    let mut out = format!("test {} {{\n", test.name);
    for statement in &test.statements {
        match statement {
            Statement::Request(request) => out.push_str(&pretty_print_request(request)),
            Statement::Assert(assert) => out.push_str(&pretty_print_assert(assert)),
        }
    }
    out.push_str("}\n");
    out
}

fn pretty_print_request(request: &RequestStmt) -> String {
    let mut out = format!("  {} {}", request.method, dsl_str(&request.url));

    if request.body.is_some() || !request.headers.is_empty() {
        out.push_str(" {\n");
        if let Some(body) = &request.body {
            out.push_str(&format!("    body = {};\n", dsl_str(&body.text)));
        }
        for header in &request.headers {
            out.push_str(&format!(
                "    header {} = {};\n",
                dsl_str(&header.name),
                dsl_str(&header.value)
            ));
        }
        out.push_str("  }");
    }

    out.push_str(";\n");
    out
}

fn pretty_print_assert(assert: &AssertStmt) -> String {
    match &assert.kind {
        AssertKind::StatusEq(n) => format!("  expect status = {};\n", n),
        AssertKind::StatusIn(lo, hi) => format!("  expect status in {}..{};\n", lo, hi),
        AssertKind::HeaderEq { key, value } => format!(
            "  expect header {} = {};\n",
            dsl_str(key),
            dsl_str(value)
        ),
        AssertKind::HeaderContains { key, substring } => format!(
            "  expect header {} contains {};\n",
            dsl_str(key),
            dsl_str(substring)
        ),
        AssertKind::BodyContains(substring) => {
            format!("  expect body contains {};\n", dsl_str(substring))
        }
    }
}

/// Variable values are stored textually; print them back as a bare NUMBER
/// only when the lexer would produce the identical text again.
fn dsl_value(value: &str) -> String {
    match value.parse::<u32>() {
        Ok(n) if n.to_string() == value => value.to_string(),
        _ => dsl_str(value),
    }
}

/// Render text as a quoted, escaped DSL string literal.
fn dsl_str(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
