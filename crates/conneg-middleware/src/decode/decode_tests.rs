#![allow(non_snake_case)]

use super::*;
use conneg_codec::{Codec, CodecError, EdnCodec};
use conneg_core::Map;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Echoes what the wrapped handler saw: params, body params and raw body
fn echo(request: Request) -> Result<Response> {
    let mut seen = Map::new();
    seen.insert("params", request.params.clone());
    seen.insert("body-params", request.body_params.clone().unwrap_or(Value::Nil));
    let raw = match request.body.as_ref().and_then(Body::as_bytes) {
        Some(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        None => Value::Nil,
    };
    seen.insert("body", raw);
    Ok(Response::value(seen))
}

fn seen(response: &Response) -> &Map {
    response
        .body
        .as_ref()
        .and_then(Body::as_value)
        .and_then(Value::as_map)
        .unwrap()
}

fn pipeline(options: DecodeOptions) -> DecodeRequest<fn(Request) -> Result<Response>> {
    DecodeRequest::new(echo as fn(Request) -> Result<Response>, options).unwrap()
}

/// Codec claiming `application/json` that counts decode calls
#[derive(Debug, Default)]
struct CountingJson {
    decodes: Arc<AtomicUsize>,
}

impl Codec for CountingJson {
    fn name(&self) -> &str {
        "counting-json"
    }

    fn content_type(&self) -> &str {
        "application/json"
    }

    fn can_decode(&self) -> bool {
        true
    }

    fn can_encode(&self) -> bool {
        false
    }

    fn matches(&self, content_type: &str) -> bool {
        content_type.starts_with("application/json")
    }

    fn decode(&self, _data: &[u8], _charset: &str) -> std::result::Result<Value, CodecError> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        Ok(Value::Nil)
    }
}

#[test]
fn DecodeRequest___edn_body___first_matching_decoder_wins() {
    let decodes = Arc::new(AtomicUsize::new(0));
    let json = CountingJson {
        decodes: decodes.clone(),
    };
    let options = DecodeOptions::new().with_formats([
        FormatSpec::custom(json),
        FormatSpec::custom(EdnCodec::new()),
    ]);
    let request = Request::new()
        .with_header("Content-Type", "application/edn")
        .with_body("{:a 1}");

    let response = pipeline(options).handle(request).unwrap();

    let params = seen(&response).get_named("params").and_then(Value::as_map).unwrap();
    assert_eq!(params.get(&Value::keyword("a")), Some(&Value::Integer(1)));
    assert_eq!(decodes.load(Ordering::SeqCst), 0);
}

#[test]
fn DecodeRequest___empty_body___passes_through_untouched() {
    let mut params = Map::new();
    params.insert("id", 7);
    let request = Request::new()
        .with_header("Content-Type", "application/json")
        .with_params(params.clone())
        .with_body(Vec::new());

    let response = pipeline(DecodeOptions::new().with_formats(["json"]))
        .handle(request)
        .unwrap();

    let seen = seen(&response);
    assert_eq!(seen.get_named("body-params"), Some(&Value::Nil));
    assert_eq!(seen.get_named("params"), Some(&Value::Map(params)));
    assert_eq!(seen.get_named("body"), Some(&Value::String(String::new())));
}

#[test]
fn DecodeRequest___map_body___merges_into_params() {
    let mut params = Map::new();
    params.insert("id", 7);
    params.insert("name", "query");
    let request = Request::new()
        .with_header("Content-Type", "application/json")
        .with_params(params)
        .with_body(r#"{"name":"body","extra":true}"#);

    let response = pipeline(DecodeOptions::new()).handle(request).unwrap();

    let params = seen(&response).get_named("params").and_then(Value::as_map).unwrap();
    assert_eq!(params.get_named("id"), Some(&Value::Integer(7)));
    assert_eq!(params.get_named("name"), Some(&Value::from("body")));
    assert_eq!(params.get_named("extra"), Some(&Value::Bool(true)));
}

#[test]
fn DecodeRequest___decoded_body___raw_bytes_stay_readable() {
    let request = Request::new()
        .with_header("Content-Type", "application/json")
        .with_body(Body::Stream(Box::new(Cursor::new(b"[1,2]".to_vec()))));

    let response = pipeline(DecodeOptions::new()).handle(request).unwrap();

    let seen = seen(&response);
    assert_eq!(
        seen.get_named("body-params"),
        Some(&Value::Vector(vec![Value::Integer(1), Value::Integer(2)]))
    );
    assert_eq!(seen.get_named("body"), Some(&Value::from("[1,2]")));
}

#[test]
fn DecodeRequest___non_map_body___params_unchanged() {
    let request = Request::new()
        .with_header("Content-Type", "application/json")
        .with_body("42");

    let response = pipeline(DecodeOptions::new()).handle(request).unwrap();

    let seen = seen(&response);
    assert_eq!(seen.get_named("body-params"), Some(&Value::Integer(42)));
    assert_eq!(seen.get_named("params"), Some(&Value::Map(Map::new())));
}

#[test]
fn DecodeRequest___null_body___no_body_params() {
    let request = Request::new()
        .with_header("Content-Type", "application/json")
        .with_body("null");

    let response = pipeline(DecodeOptions::new()).handle(request).unwrap();

    assert_eq!(seen(&response).get_named("body-params"), Some(&Value::Nil));
}

#[test]
fn DecodeRequest___unmatched_content_type___not_decoded() {
    let request = Request::new()
        .with_header("Content-Type", "text/plain")
        .with_body("{}");

    let response = pipeline(DecodeOptions::new()).handle(request).unwrap();

    let seen = seen(&response);
    assert_eq!(seen.get_named("body-params"), Some(&Value::Nil));
    assert_eq!(seen.get_named("body"), Some(&Value::from("{}")));
}

#[test]
fn DecodeRequest___malformed_body_without_hook___returns_codec_error() {
    let request = Request::new()
        .with_header("Content-Type", "application/json")
        .with_body("{not json");

    let result = pipeline(DecodeOptions::new()).handle(request);

    assert!(matches!(result, Err(Error::Codec(_))));
}

#[test]
fn DecodeRequest___malformed_body_with_status___answers_plain_text() {
    let request = Request::new()
        .with_header("Content-Type", "application/json")
        .with_body("{not json");

    let response = pipeline(DecodeOptions::new().with_error_status(400))
        .handle(request)
        .unwrap();

    assert_eq!(response.status, 400);
    assert_eq!(response.header("Content-Type"), Some("text/plain; charset=utf-8"));
}

#[test]
fn DecodeRequest___error_hook___receives_inner_handler_and_request() {
    let options = DecodeOptions::new().with_error_hook(|err, inner, request| {
        assert!(matches!(err, Error::Codec(_)));
        let mut response = inner.handle(request)?;
        response.status = 422;
        Ok(response)
    });
    let request = Request::new()
        .with_header("Content-Type", "application/json")
        .with_body("{not json");

    let response = pipeline(options).handle(request).unwrap();

    assert_eq!(response.status, 422);
    assert_eq!(seen(&response).get_named("body"), Some(&Value::from("{not json")));
}

#[test]
fn DecodeRequest___fixed_charset___overrides_accept_charset() {
    let options = DecodeOptions::new().with_charset(CharsetPolicy::fixed("iso-8859-1"));
    let request = Request::new()
        .with_header("Content-Type", "application/json")
        .with_header("Accept-Charset", "utf-8")
        .with_body(b"{\"n\":\"\xE9\"}".to_vec());

    let response = pipeline(options).handle(request).unwrap();

    let params = seen(&response).get_named("params").and_then(Value::as_map).unwrap();
    assert_eq!(params.get_named("n"), Some(&Value::from("\u{e9}")));
}

#[test]
fn DecodeRequest___accept_charset___decodes_utf16() {
    let body: Vec<u8> = r#"{"n":"ü"}"#
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect();
    let request = Request::new()
        .with_header("Content-Type", "application/json")
        .with_header("Accept-Charset", "utf-16le")
        .with_body(body);

    let response = pipeline(DecodeOptions::new()).handle(request).unwrap();

    let params = seen(&response).get_named("params").and_then(Value::as_map).unwrap();
    assert_eq!(params.get_named("n"), Some(&Value::from("ü")));
}

#[test]
fn DecodeRequest___detector___used_without_accept_charset() {
    let mut body = vec![0xFF, 0xFE];
    body.extend(r#"{"n":1}"#.encode_utf16().flat_map(u16::to_le_bytes));
    let options = DecodeOptions::new().with_detector(Arc::new(BomDetector));
    let request = Request::new()
        .with_header("Content-Type", "application/json")
        .with_body(body);

    let response = pipeline(options).handle(request).unwrap();

    let params = seen(&response).get_named("params").and_then(Value::as_map).unwrap();
    assert_eq!(params.get_named("n"), Some(&Value::Integer(1)));
}

#[test]
fn DecodeRequest___unknown_format___fails_construction() {
    let result = DecodeRequest::new(echo, DecodeOptions::new().with_formats(["csv"]));

    assert!(matches!(result, Err(Error::UnknownFormat(_))));
}

#[test]
fn DecodeOptions___from_config___applies_formats_and_sniffing() {
    let config = FormatConfig {
        formats: vec!["edn".to_string(), "clojure".to_string()],
        sniff_charset: true,
        ..FormatConfig::default()
    };

    let decode = pipeline(DecodeOptions::from_config(&config));

    let names: Vec<&str> = decode.decoders().iter().map(CodecDescriptor::name).collect();
    assert_eq!(names, vec!["edn"]);
}
