//! `conneg encode`

use anyhow::{Context, Result};
use conneg::{Body, EncodeOptions, EncodeResponse, FormatConfig, Handler, Request, Response, Value};
use std::fmt::Write;

/// Encode `document` for a client sending `accept` and render the response
pub fn run(
    document: &str,
    accept: &str,
    accept_charset: Option<&str>,
    config: &FormatConfig,
) -> Result<String> {
    let value: Value = serde_json::from_str(document).context("Document is not valid JSON")?;
    let pipeline = EncodeResponse::new(
        move |_: Request| -> conneg::Result<Response> { Ok(Response::value(value.clone())) },
        EncodeOptions::from_config(config),
    )
    .context("Invalid format configuration")?;

    let mut request = Request::new().with_header("Accept", accept);
    if let Some(charset) = accept_charset {
        request = request.with_header("Accept-Charset", charset);
    }
    let response = pipeline.handle(request)?;

    let mut out = String::new();
    let _ = writeln!(out, "status: {}", response.status);
    for (name, value) in response.headers.iter() {
        let _ = writeln!(out, "{name}: {value}");
    }
    out.push('\n');
    if let Some(body) = &response.body {
        out.push_str(&render_body(body));
    }
    Ok(out)
}

/// Text bodies verbatim, binary bodies as hex
fn render_body(body: &Body) -> String {
    match body {
        Body::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => format!("{text}\n"),
            Err(_) => {
                let hex: Vec<String> = bytes.iter().map(|b| format!("{b:02x}")).collect();
                format!("{}\n", hex.join(" "))
            }
        },
        Body::Text(text) => format!("{text}\n"),
        Body::Value(Value::String(text)) => format!("{text}\n"),
        other => format!("<{} body>\n", other.kind()),
    }
}
