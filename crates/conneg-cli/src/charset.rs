//! `conneg charset`

use crate::settings::split_list;
use conneg::{CharsetResolver, Request, SupportedCharsets, parse_accept_charset};
use std::fmt::Write;
use std::sync::Arc;

/// Render the preferences of `header` and the charset a response would use
pub fn run(header: &str, supported: Option<&str>) -> String {
    let supported = match supported {
        Some(list) => Arc::new(SupportedCharsets::from_names(split_list(list))),
        None => SupportedCharsets::runtime(),
    };

    let mut out = String::new();
    for preference in parse_accept_charset(header) {
        let status = if supported.contains(&preference.charset) {
            "supported"
        } else {
            "unsupported"
        };
        let _ = writeln!(out, "{}  q={}  {status}", preference.charset, preference.q);
    }

    let resolver = CharsetResolver::new().with_supported(supported);
    let request = Request::new().with_header("Accept-Charset", header);
    let _ = writeln!(out, "resolved: {}", resolver.resolve_response(&request));
    out
}

#[cfg(test)]
#[path = "charset/charset_tests.rs"]
mod charset_tests;
