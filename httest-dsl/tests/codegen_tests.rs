//! Code generator integration tests
//!
//! Full-pipeline checks over the generated Rust test source: URL resolution,
//! header merging, variable substitution, assertion emission, ordering, and
//! determinism.

use httest_dsl::compile;

#[test]
fn generates_one_test_unit_with_full_url() {
    let src = r#"
config { base_url = "http://localhost:8080"; };
test T {
  GET "/api/users/1";
  expect status = 200;
  expect body contains "id";
}
"#;
    let out = compile(src, "scenario_a.test").unwrap();
    assert!(out.contains("fn T()"));
    assert!(out.contains(".get(\"http://localhost:8080/api/users/1\")"));
    assert!(out.contains("assert_eq!(status, 200"));
    assert!(out.contains("body.contains(\"id\")"));
    assert!(out.contains("// Generated by httest from scenario_a.test"));
}

#[test]
fn absolute_url_is_used_as_is() {
    let src = r#"
config { base_url = "http://localhost:8080"; };
test T {
  GET "https://other.example/x";
  expect status = 200;
  expect body contains "x";
}
"#;
    let out = compile(src, "t.test").unwrap();
    assert!(out.contains(".get(\"https://other.example/x\")"));
    assert!(!out.contains("localhost:8080https"));
}

#[test]
fn substitutes_variables_in_url_headers_and_body() {
    let src = r#"
let id = 42;
let token = "secret";
test T {
  POST "http://h/api/users/$id" {
    body = "{ \"id\": $id }";
    header "Authorization" = "Bearer $token";
  };
  expect status = 200;
  expect body contains "x";
}
"#;
    let out = compile(src, "t.test").unwrap();
    assert!(out.contains(".post(\"http://h/api/users/42\")"));
    assert!(out.contains(".header(\"Authorization\", \"Bearer secret\")"));
    assert!(out.contains(".body(\"{ \\\"id\\\": 42 }\")"));
    assert!(!out.contains("$id"));
}

#[test]
fn substitution_is_not_recursive() {
    let src = r#"
let a = "$b";
let b = "x";
test T {
  GET "http://h/$a";
  expect status = 200;
  expect body contains "x";
}
"#;
    let out = compile(src, "t.test").unwrap();
    assert!(out.contains(".get(\"http://h/$b\")"));
}

#[test]
fn default_headers_apply_and_per_request_headers_override() {
    let src = r#"
config {
  base_url = "http://h";
  header "Content-Type" = "application/json";
  header "X-Env" = "staging";
}
test T {
  GET "/x" { header "Content-Type" = "text/plain"; };
  expect status = 200;
  expect body contains "x";
}
"#;
    let out = compile(src, "t.test").unwrap();
    assert!(out.contains(".header(\"Content-Type\", \"text/plain\")"));
    assert!(out.contains(".header(\"X-Env\", \"staging\")"));
    assert!(!out.contains("application/json"));
}

#[test]
fn duplicate_request_header_last_occurrence_wins() {
    let src = r#"
test T {
  GET "http://h/" {
    header "X-Tag" = "a";
    header "X-Tag" = "b";
  };
  expect status = 200;
  expect body contains "x";
}
"#;
    let out = compile(src, "t.test").unwrap();
    assert!(out.contains(".header(\"X-Tag\", \"b\")"));
    assert!(!out.contains(".header(\"X-Tag\", \"a\")"));
}

#[test]
fn emits_all_assertion_kinds() {
    let src = r#"
test T {
  GET "http://h/";
  expect status in 200..299;
  expect header "Content-Type" = "application/json";
  expect header "Content-Type" contains "json";
  expect body contains "ok";
}
"#;
    let out = compile(src, "t.test").unwrap();
    assert!(out.contains("(200..=299).contains(&status)"));
    assert!(out.contains("headers.get(\"Content-Type\")"));
    assert!(out.contains("assert_eq!(actual, \"application/json\""));
    assert!(out.contains("actual.contains(\"json\")"));
    assert!(out.contains("body.contains(\"ok\")"));
}

#[test]
fn later_assertions_check_latest_request() {
    let src = r#"
test T {
  GET "http://h/first";
  expect status = 200;
  POST "http://h/second";
  expect status = 201;
  expect body contains "x";
}
"#;
    let out = compile(src, "t.test").unwrap();
    let first = out.find(".get(\"http://h/first\")").unwrap();
    let eq_200 = out.find("assert_eq!(status, 200").unwrap();
    let second = out.find(".post(\"http://h/second\")").unwrap();
    let eq_201 = out.find("assert_eq!(status, 201").unwrap();
    assert!(first < eq_200);
    assert!(eq_200 < second);
    assert!(second < eq_201);
}

#[test]
fn test_units_mirror_declaration_order() {
    let src = r#"
test First { GET "http://h/"; expect status = 200; expect body contains "x"; }
test Second { GET "http://h/"; expect status = 200; expect body contains "x"; }
"#;
    let out = compile(src, "t.test").unwrap();
    let first = out.find("fn First()").unwrap();
    let second = out.find("fn Second()").unwrap();
    assert!(first < second);
}

#[test]
fn output_is_deterministic() {
    let src = r#"
config { base_url = "http://h"; header "A" = "1"; header "B" = "2"; }
let id = 7;
test T {
  GET "/x/$id" { body = "b"; header "C" = "3"; };
  expect status in 200..204;
  expect header "A" contains "1";
}
"#;
    let a = compile(src, "t.test").unwrap();
    let b = compile(src, "t.test").unwrap();
    assert_eq!(a, b);
}

#[test]
fn string_escapes_survive_generation() {
    let src = r#"
test T {
  POST "http://h/" { body = "line1\nline2 \"quoted\""; };
  expect status = 200;
  expect body contains "he said \"hi\"";
}
"#;
    let out = compile(src, "t.test").unwrap();
    assert!(out.contains(".body(\"line1\\nline2 \\\"quoted\\\"\")"));
    assert!(out.contains("body.contains(\"he said \\\"hi\\\"\")"));
}

#[test]
fn generated_file_allows_unused_captures() {
    let src = r#"test T { GET "http://h/"; expect status = 200; expect status in 200..299; }"#;
    let out = compile(src, "t.test").unwrap();
    assert!(out.starts_with("// Generated by httest"));
    assert!(out.contains("#![allow(non_snake_case, unused_variables)]"));
}
