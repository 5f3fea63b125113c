#![allow(non_snake_case)]

use super::*;
use std::io::Cursor;

#[test]
fn Headers___get___tries_exact_then_lower_case() {
    let headers: Headers = [("content-type", "application/json")].into_iter().collect();

    assert_eq!(headers.get("Content-Type"), Some("application/json"));
    assert_eq!(headers.get("content-type"), Some("application/json"));
}

#[test]
fn Headers___get___does_not_find_mixed_case_from_lower_case() {
    let headers: Headers = [("Content-Type", "application/json")].into_iter().collect();

    assert_eq!(headers.get("content-type"), None);
}

#[test]
fn Headers___insert___keeps_names_differing_only_in_case() {
    let mut headers = Headers::new();
    headers.insert("content-type", "text/plain");

    headers.insert("Content-Type", "application/json");

    assert_eq!(headers.len(), 2);
    assert_eq!(headers.get("Content-Type"), Some("application/json"));
    assert_eq!(headers.get("content-type"), Some("text/plain"));
}

#[test]
fn Headers___insert___replaces_exact_name_in_place() {
    let mut headers = Headers::new();
    headers.insert("Accept", "text/html");
    headers.insert("Vary", "Accept");

    headers.insert("Accept", "application/json");

    assert_eq!(headers.len(), 2);
    assert_eq!(headers.iter().next(), Some(("Accept", "application/json")));
}

#[test]
fn Body___into_bytes___reads_stream_to_end() {
    let body = Body::Stream(Box::new(Cursor::new(b"{\"a\":1}".to_vec())));

    assert_eq!(body.into_bytes().unwrap(), b"{\"a\":1}");
}

#[test]
fn Body___into_bytes___value_is_invalid_body() {
    let result = Body::Value(Value::Nil).into_bytes();

    assert!(matches!(result, Err(Error::InvalidBody(_))));
}

#[test]
fn Body___into_bytes___missing_file_is_io_error() {
    let result = Body::File(PathBuf::from("/nonexistent/conneg/body.json")).into_bytes();

    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn Request___effective_content_type___prefers_field_over_headers() {
    let request = Request::new()
        .with_header("Content-Type", "application/edn")
        .with_content_type("application/json");

    assert_eq!(request.effective_content_type(), Some("application/json"));
}

#[test]
fn Request___effective_content_type___falls_back_to_lower_case_header() {
    let request = Request::new().with_header("content-type", "application/edn");

    assert_eq!(request.effective_content_type(), Some("application/edn"));
}

#[test]
fn Request___head___copies_everything_but_body() {
    let mut params = Map::new();
    params.insert("id", 1);
    let request = Request::new()
        .with_header("Accept", "application/json")
        .with_params(params.clone())
        .with_body("payload");

    let head = request.head();

    assert!(head.body.is_none());
    assert_eq!(head.params, params);
    assert_eq!(head.headers.get("Accept"), Some("application/json"));
}

#[test]
fn Response___value___is_200_with_value_body() {
    let response = Response::value(42);

    assert_eq!(response.status, 200);
    assert!(matches!(response.body, Some(Body::Value(Value::Integer(42)))));
}
