#![allow(non_snake_case)]

use super::*;

#[test]
fn ParseError___invalid_quality___display_includes_value() {
    let err = ParseError::InvalidQuality {
        value: "abc".into(),
    };

    assert_eq!(err.to_string(), "invalid quality value: abc");
}

#[test]
fn ParseError___malformed_range___display_includes_range() {
    let err = ParseError::MalformedMediaRange {
        range: "textplain".into(),
    };

    assert!(err.to_string().contains("textplain"));
}
