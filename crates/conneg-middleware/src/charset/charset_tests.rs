#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

fn resolver() -> CharsetResolver {
    CharsetResolver::new().with_parser(Arc::new(CharsetPreferenceParser::new(16)))
}

fn request_with_charset(header: &str) -> Request {
    Request::new().with_header("accept-charset", header)
}

#[test]
fn CharsetResolver___lowest_q_supported_charset___wins() {
    // utf8 is an alias, not a canonical name, so only utf-16 survives
    let request = request_with_charset("utf8; q=0.8, utf-16");

    assert_eq!(resolver().resolve_request(&request, b""), "utf-16");
}

#[test]
fn CharsetResolver___ascending_q___prefers_lower_declared_q() {
    let request = request_with_charset("utf-8, iso-8859-1;q=0.5");

    assert_eq!(resolver().resolve_response(&request), "iso-8859-1");
}

#[test]
fn CharsetResolver___equal_q___keeps_declaration_order() {
    let request = request_with_charset("utf-16, utf-8");

    assert_eq!(resolver().resolve_response(&request), "utf-16");
}

#[test_case("" ; "empty header")]
#[test_case("klingon" ; "unknown charset only")]
#[test_case("utf8" ; "alias only")]
fn CharsetResolver___nothing_supported___defaults_to_utf8(header: &str) {
    let request = request_with_charset(header);

    assert_eq!(resolver().resolve_response(&request), "utf-8");
}

#[test]
fn CharsetResolver___no_header___defaults_to_utf8() {
    assert_eq!(resolver().resolve_request(&Request::new(), b"{}"), "utf-8");
}

#[test]
fn CharsetResolver___membership___ignores_case() {
    let request = request_with_charset("UTF-16");

    assert_eq!(resolver().resolve_response(&request), "utf-16");
}

#[test]
fn CharsetResolver___restricted_supported_set___filters_choice() {
    let supported = Arc::new(SupportedCharsets::from_names(["utf-8"]));
    let request = request_with_charset("utf-16;q=0.1, utf-8");

    let charset = resolver()
        .with_supported(supported)
        .resolve_response(&request);

    assert_eq!(charset, "utf-8");
}

#[test]
fn CharsetResolver___detector___used_only_without_header() {
    let resolver = resolver().with_detector(Arc::new(conneg_codec::BomDetector));
    let body = [0xFE, 0xFF, 0x00, b'1'];

    assert_eq!(resolver.resolve_request(&Request::new(), &body), "utf-16be");
    assert_eq!(
        resolver.resolve_request(&request_with_charset("utf-8"), &body),
        "utf-8"
    );
}

#[test]
fn CharsetResolver___unsupported_detection___defaults_to_utf8() {
    let resolver = resolver().with_detector(Arc::new(|_: &[u8]| Some("klingon".to_string())));

    assert_eq!(resolver.resolve_request(&Request::new(), b"x"), "utf-8");
}

#[test]
fn CharsetResolver___response___never_sniffs() {
    let resolver = resolver().with_detector(Arc::new(|_: &[u8]| Some("utf-16".to_string())));

    assert_eq!(resolver.resolve_response(&Request::new()), "utf-8");
}

#[test]
fn CharsetPolicy___debug___hides_function() {
    let policy = CharsetPolicy::dynamic(|_| "utf-8".to_string());

    assert_eq!(format!("{policy:?}"), "Dynamic");
    assert_eq!(format!("{:?}", CharsetPolicy::fixed("utf-16")), "Fixed(\"utf-16\")");
}
