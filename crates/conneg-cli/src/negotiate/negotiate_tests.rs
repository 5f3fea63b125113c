#![allow(non_snake_case)]

use super::*;

#[test]
fn run___wildcard_type___picks_first_matching_encoder() {
    let config = FormatConfig::new().with_formats(["json", "yaml-in-html"]);

    let out = run("text/*, application/json;q=0.5", &config).unwrap();

    assert!(out.starts_with("format: yaml-in-html\ncontent-type: text/html\n"));
    assert!(out.contains("matched: text/*\n"));
    assert!(out.contains("candidates: json, yaml-in-html\n"));
}

#[test]
fn run___unregistered_type___reports_fallback() {
    let config = FormatConfig::new().with_formats(["json"]);

    let out = run("application/xyz", &config).unwrap();

    assert!(out.starts_with("format: json\n"));
    assert!(out.contains("matched: none"));
}

#[test]
fn run___unknown_format___fails() {
    let config = FormatConfig::new().with_formats(["xml"]);

    assert!(run("*/*", &config).is_err());
}
