//! Code generator: validated AST → Rust test source
//!
//! Emits one `#[test]` fn per test block, in declaration order. Each request
//! statement becomes a `reqwest::blocking` call whose captured status,
//! headers, and body feed the assertion statements that follow it. The output
//! is plain source text; writing it to disk is the driver's job.

use crate::lexer::Method;
use crate::parser::ast::*;
use crate::validator::is_absolute_url;

/// Generate the test source file for a validated program.
///
/// `source` identifies the DSL file for traceability and only appears in the
/// generated header comment. Output is deterministic: byte-identical input
/// yields byte-identical output.
pub fn generate(program: &Program, source: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("// Generated by httest from {}.\n", source));
    out.push_str("// Do not edit by hand; re-run the compiler to regenerate.\n\n");
    out.push_str("#![allow(non_snake_case, unused_variables)]\n\n");

    for test in &program.tests {
        out.push_str(&generate_test(program, test));
        out.push('\n');
    }

    out
}

fn generate_test(program: &Program, test: &TestBlock) -> String {
    let mut out = String::new();
    out.push_str("#[test]\n");
    out.push_str(&format!("fn {}() {{\n", sanitize_name(&test.name)));
    out.push_str("    let client = reqwest::blocking::Client::new();\n");

    for statement in &test.statements {
        match statement {
            Statement::Request(request) => out.push_str(&generate_request(program, request)),
            Statement::Assert(assert) => out.push_str(&generate_assert(assert)),
        }
    }

    out.push_str("}\n");
    out
}

fn generate_request(program: &Program, request: &RequestStmt) -> String {
    let url = effective_url(program, &request.url);
    let headers = effective_headers(program, request);
    let body = request
        .body
        .as_ref()
        .map(|b| substitute(&b.text, program));

    let builder = match request.method {
        Method::Get => "get",
        Method::Post => "post",
        Method::Put => "put",
        Method::Delete => "delete",
    };

    let mut out = String::new();
    out.push_str(&format!("\n    // {} {}\n", request.method, url));
    out.push_str("    let resp = client\n");
    out.push_str(&format!("        .{}({})\n", builder, rust_str(&url)));
    for (name, value) in &headers {
        out.push_str(&format!(
            "        .header({}, {})\n",
            rust_str(name),
            rust_str(value)
        ));
    }
    if let Some(body) = &body {
        out.push_str(&format!("        .body({})\n", rust_str(body)));
    }
    out.push_str("        .send()\n");
    out.push_str(&format!(
        "        .expect({});\n",
        rust_str(&format!("request failed: {} {}", request.method, url))
    ));
    out.push_str("    let status = resp.status().as_u16();\n");
    out.push_str("    let headers = resp.headers().clone();\n");
    out.push_str("    let body = resp.text().expect(\"failed to read response body\");\n");
    out
}

fn generate_assert(assert: &AssertStmt) -> String {
    match &assert.kind {
        AssertKind::StatusEq(expected) => format!(
            "    assert_eq!(status, {n}, \"expected status {{}}, got {{}}\", {n}, status);\n",
            n = expected
        ),
        AssertKind::StatusIn(lo, hi) => format!(
            "    assert!(({lo}..={hi}).contains(&status), \"expected status in {{}}..={{}}, got {{}}\", {lo}, {hi}, status);\n",
            lo = lo,
            hi = hi
        ),
        AssertKind::HeaderEq { key, value } => {
            let key = rust_str(key);
            let value = rust_str(value);
            format!(
                "    {{\n        let actual = headers.get({key}).and_then(|v| v.to_str().ok()).unwrap_or(\"\");\n        assert_eq!(actual, {value}, \"expected header {{}} to equal {{}}, got {{:?}}\", {key}, {value}, actual);\n    }}\n",
                key = key,
                value = value
            )
        }
        AssertKind::HeaderContains { key, substring } => {
            let key = rust_str(key);
            let substring = rust_str(substring);
            format!(
                "    {{\n        let actual = headers.get({key}).and_then(|v| v.to_str().ok()).unwrap_or(\"\");\n        assert!(actual.contains({sub}), \"expected header {{}} to contain {{}}, got {{:?}}\", {key}, {sub}, actual);\n    }}\n",
                key = key,
                sub = substring
            )
        }
        AssertKind::BodyContains(substring) => {
            let substring = rust_str(substring);
            format!(
                "    assert!(body.contains({sub}), \"expected body to contain {{}}, got {{:?}}\", {sub}, body);\n",
                sub = substring
            )
        }
    }
}

/// Resolve the URL a request will actually hit: absolute URLs are used as-is,
/// relative paths are appended to the configured base URL. Variable
/// substitution applies to the declared text only, never the base URL.
fn effective_url(program: &Program, declared: &str) -> String {
    let substituted = substitute(declared, program);
    if is_absolute_url(declared) {
        substituted
    } else {
        match &program.base_url {
            Some(base) => format!("{}{}", base, substituted),
            None => substituted,
        }
    }
}

/// Merge default headers with per-request entries: a per-request header with
/// a name already present replaces the stored value (last occurrence wins);
/// anything else is appended. Values are substituted after merging.
fn effective_headers(program: &Program, request: &RequestStmt) -> Vec<(String, String)> {
    let mut headers = program.default_headers.clone();
    for entry in &request.headers {
        match headers.iter_mut().find(|(name, _)| name == &entry.name) {
            Some(existing) => existing.1 = entry.value.clone(),
            None => headers.push((entry.name.clone(), entry.value.clone())),
        }
    }
    headers
        .into_iter()
        .map(|(name, value)| {
            let value = substitute(&value, program);
            (name, value)
        })
        .collect()
}

/// Replace every `$name` occurrence with its bound value in a single pass.
/// Substituted text is not re-scanned, so expansion can never recurse.
/// References with no binding are left in place verbatim.
pub fn substitute(text: &str, program: &Program) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let mut name = String::new();
        while let Some(&next) = chars.peek() {
            let valid = if name.is_empty() {
                next.is_ascii_alphabetic() || next == '_'
            } else {
                next.is_ascii_alphanumeric() || next == '_'
            };
            if !valid {
                break;
            }
            name.push(next);
            chars.next();
        }

        if name.is_empty() {
            out.push('$');
        } else {
            match program.variable(&name) {
                Some(value) => out.push_str(value),
                None => {
                    out.push('$');
                    out.push_str(&name);
                }
            }
        }
    }

    out
}

/// Turn a test block name into a valid Rust identifier.
fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    if out.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Render text as a quoted, escaped Rust string literal.
fn rust_str(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
