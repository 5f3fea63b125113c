//! `conneg accept`

use anyhow::{Context, Result};
use conneg::parse_accept;
use std::fmt::Write;

/// Render the ranked media ranges of `header`, most preferred first
pub fn run(header: &str) -> Result<String> {
    let ranked = parse_accept(header).context("Invalid Accept header")?;
    if ranked.is_empty() {
        return Ok("no media ranges\n".to_string());
    }

    let mut out = String::new();
    for (rank, media) in ranked.iter().enumerate() {
        let _ = write!(out, "{:>2}. {}/{}", rank + 1, media.type_, media.subtype);
        if let Some(parameter) = &media.parameter {
            let _ = write!(out, ";{parameter}");
        }
        let _ = writeln!(out, "  q={}", media.q);
    }
    Ok(out)
}
