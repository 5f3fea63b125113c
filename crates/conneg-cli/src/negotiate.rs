//! `conneg negotiate`

use anyhow::{Context, Result};
use conneg::{EncodeOptions, EncodeResponse, FormatConfig, Request, Response, parse_accept};
use std::fmt::Write;

fn no_content(_: Request) -> conneg::Result<Response> {
    Ok(Response::new(204))
}

/// Render the encoder chosen for `accept` and why
pub fn run(accept: &str, config: &FormatConfig) -> Result<String> {
    let pipeline = EncodeResponse::new(no_content, EncodeOptions::from_config(config))
        .context("Invalid format configuration")?;
    let ranked = parse_accept(accept).context("Invalid Accept header")?;
    let request = Request::new().with_header("Accept", accept);
    let encoder = pipeline.select(&request)?;

    let mut out = String::new();
    let _ = writeln!(out, "format: {}", encoder.name());
    let _ = writeln!(out, "content-type: {}", encoder.content_type());
    let matched = ranked
        .iter()
        .find(|range| pipeline.encoders().iter().any(|e| e.accepts(range)));
    match matched {
        Some(range) => {
            let _ = writeln!(out, "matched: {range}");
        }
        None => {
            let _ = writeln!(out, "matched: none, using the first configured encoder");
        }
    }
    let names: Vec<&str> = pipeline.encoders().iter().map(|e| e.name()).collect();
    let _ = writeln!(out, "candidates: {}", names.join(", "));
    Ok(out)
}

#[cfg(test)]
#[path = "negotiate/negotiate_tests.rs"]
mod negotiate_tests;
