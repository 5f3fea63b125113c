#![allow(non_snake_case)]

use super::*;
use crate::registry::{FormatSpec, resolve};
use conneg_codec::CodecOptions;

fn encoders(names: &[&str]) -> Vec<CodecDescriptor> {
    names
        .iter()
        .map(|name| resolve(&FormatSpec::from(*name), &CodecOptions::default()).unwrap())
        .collect()
}

fn negotiator() -> Negotiator {
    Negotiator::with_parser(Arc::new(AcceptParser::new(16)))
}

#[test]
fn preferred_encoder___higher_q___beats_declaration_order() {
    let encoders = encoders(&["json", "yaml-in-html"]);
    let ranked = vec![
        MediaType::new("text", "*"),
        MediaType::new("application", "json").with_q(0.5),
    ];

    let chosen = preferred_encoder(&encoders, &ranked).unwrap();

    assert_eq!(chosen.name(), "yaml-in-html");
}

#[test]
fn preferred_encoder___same_range___declaration_order_breaks_tie() {
    let encoders = encoders(&["edn", "json"]);

    let chosen = preferred_encoder(&encoders, &[MediaType::any()]).unwrap();

    assert_eq!(chosen.name(), "edn");
}

#[test]
fn preferred_encoder___nothing_acceptable___returns_none() {
    let encoders = encoders(&["json"]);

    let chosen = preferred_encoder(&encoders, &[MediaType::new("application", "xyz")]);

    assert!(chosen.is_none());
}

#[test]
fn Negotiator___no_accept___returns_first_encoder() {
    let encoders = encoders(&["json", "yaml-in-html"]);

    let chosen = negotiator().preferred(&encoders, &Request::new()).unwrap();

    assert_eq!(chosen.unwrap().name(), "json");
}

#[test]
fn Negotiator___accept_header___ranks_by_q() {
    let encoders = encoders(&["json", "yaml-in-html"]);
    let request = Request::new().with_header("Accept", "text/*, application/json;q=0.5");

    let chosen = negotiator().preferred(&encoders, &request).unwrap();

    assert_eq!(chosen.unwrap().name(), "yaml-in-html");
}

#[test]
fn Negotiator___lowercase_header_name___is_found() {
    let encoders = encoders(&["json", "edn"]);
    let request = Request::new().with_header("accept", "application/edn");

    let chosen = negotiator().preferred(&encoders, &request).unwrap();

    assert_eq!(chosen.unwrap().name(), "edn");
}

#[test]
fn Negotiator___ranked_accept___bypasses_header() {
    let encoders = encoders(&["json", "edn"]);
    let request = Request::new()
        .with_header("Accept", "application/json")
        .with_ranked_accept(vec![MediaType::new("application", "edn")]);

    let chosen = negotiator().preferred(&encoders, &request).unwrap();

    assert_eq!(chosen.unwrap().name(), "edn");
}

#[test]
fn Negotiator___content_type_field___used_without_accept() {
    let encoders = encoders(&["json", "edn"]);
    let request = Request::new().with_content_type("application/edn");

    let chosen = negotiator().preferred(&encoders, &request).unwrap();

    assert_eq!(chosen.unwrap().name(), "edn");
}

#[test]
fn Negotiator___unregistered_type___returns_none() {
    let encoders = encoders(&["json"]);
    let request = Request::new().with_header("Accept", "application/xyz");

    let chosen = negotiator().preferred(&encoders, &request).unwrap();

    assert!(chosen.is_none());
}

#[test]
fn Negotiator___repeated_header___served_from_cache() {
    let parser = Arc::new(AcceptParser::new(16));
    let negotiator = Negotiator::with_parser(parser.clone());
    let encoders = encoders(&["json"]);
    let request = Request::new().with_header("Accept", "application/json");

    negotiator.preferred(&encoders, &request).unwrap();
    negotiator.preferred(&encoders, &request).unwrap();

    assert_eq!(parser.cache().len(), 1);
    assert!(parser.cache().contains("application/json"));
}
