//! Media ranges and `Accept` / `Accept-Charset` parsing

use crate::error::ParseError;
use std::fmt;

/// One entry of a parsed `Accept` header
///
/// `type_` and `subtype` are lower-cased and may be `*`. At most one
/// non-`q` parameter is kept, verbatim, in `parameter`.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaType {
    /// Top-level type (e.g. "application", "text", "*")
    pub type_: String,
    /// Subtype (e.g. "json", "html", "*")
    pub subtype: String,
    /// Preference weight in `[0, 1]`
    pub q: f32,
    /// First non-quality parameter, e.g. "level=1"
    pub parameter: Option<String>,
}

impl MediaType {
    /// Create a media type with `q = 1.0` and no parameter
    pub fn new(type_: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            type_: type_.into().to_ascii_lowercase(),
            subtype: subtype.into().to_ascii_lowercase(),
            q: 1.0,
            parameter: None,
        }
    }

    /// `*/*`
    pub fn any() -> Self {
        Self::new("*", "*")
    }

    /// Set the quality value
    pub fn with_q(mut self, q: f32) -> Self {
        self.q = q;
        self
    }

    /// Set the retained parameter
    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }

    /// Parse a single media type such as a codec's `Content-Type`
    pub fn parse(content_type: &str) -> Result<Self, ParseError> {
        parse_range(content_type.trim())
    }

    /// `type/subtype` without parameters
    pub fn essence(&self) -> String {
        format!("{}/{}", self.type_, self.subtype)
    }

    pub fn is_type_wildcard(&self) -> bool {
        self.type_ == "*"
    }

    pub fn is_subtype_wildcard(&self) -> bool {
        self.subtype == "*"
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        if let Some(parameter) = &self.parameter {
            write!(f, ";{parameter}")?;
        }
        if self.q < 1.0 {
            write!(f, ";q={}", self.q)?;
        }
        Ok(())
    }
}

/// Parse an `Accept` header into media ranges, most preferred first
///
/// Ranking is four stable sorts applied in sequence, so the last one
/// dominates: entries with a parameter before those without, concrete
/// types before `*`, concrete subtypes before `*`, and finally descending
/// `q`. The net order is higher `q` first and, among equal `q`, the more
/// specific range first.
pub fn parse_accept(header: &str) -> Result<Vec<MediaType>, ParseError> {
    let mut ranges = Vec::new();
    for segment in header.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        ranges.push(parse_range(segment)?);
    }

    ranges.sort_by_key(|m| m.parameter.is_none());
    ranges.sort_by_key(|m| m.is_type_wildcard());
    ranges.sort_by_key(|m| m.is_subtype_wildcard());
    ranges.sort_by(|a, b| b.q.total_cmp(&a.q));

    Ok(ranges)
}

fn parse_range(segment: &str) -> Result<MediaType, ParseError> {
    let mut parts = segment.split(';');
    let range = parts.next().unwrap_or_default().trim();
    let (type_, subtype) = split_range(range)?;
    let params: Vec<&str> = parts.map(str::trim).filter(|p| !p.is_empty()).collect();

    let mut media = MediaType::new(type_, subtype);
    if let Some((first, rest)) = params.split_first() {
        match quality_value(first) {
            Some(q) => media.q = parse_quality(q)?,
            None => {
                if let Some(q) = rest.iter().find_map(|p| quality_value(p)) {
                    media.q = parse_quality(q)?;
                }
                media.parameter = Some((*first).to_string());
            }
        }
    }
    Ok(media)
}

fn split_range(range: &str) -> Result<(&str, &str), ParseError> {
    if range == "*" {
        return Ok(("*", "*"));
    }
    match range.split_once('/') {
        Some((type_, subtype))
            if !type_.trim().is_empty()
                && !subtype.trim().is_empty()
                && !subtype.contains('/') =>
        {
            Ok((type_.trim(), subtype.trim()))
        }
        _ => Err(ParseError::MalformedMediaRange {
            range: range.to_string(),
        }),
    }
}

/// Value of a `q=...` parameter, if `param` is one (the name is case-sensitive)
fn quality_value(param: &str) -> Option<&str> {
    let (name, value) = param.split_once('=')?;
    (name.trim() == "q").then(|| value.trim())
}

fn parse_quality(value: &str) -> Result<f32, ParseError> {
    match value.parse::<f32>() {
        Ok(q) if (0.0..=1.0).contains(&q) => Ok(q),
        _ => Err(ParseError::InvalidQuality {
            value: value.to_string(),
        }),
    }
}

/// One entry of a parsed `Accept-Charset` header
#[derive(Debug, Clone, PartialEq)]
pub struct CharsetPreference {
    /// Charset name as sent by the client (trimmed, case preserved)
    pub charset: String,
    /// Preference weight; 1.0 when absent or unreadable
    pub q: f32,
}

/// Parse an `Accept-Charset` header in declaration order
///
/// Unlike [`parse_accept`] this never fails: a missing or unparsable `q`
/// counts as 1.
pub fn parse_accept_charset(header: &str) -> Vec<CharsetPreference> {
    header
        .split(',')
        .filter_map(|segment| {
            let mut parts = segment.split(';');
            let charset = parts.next().unwrap_or_default().trim();
            if charset.is_empty() {
                return None;
            }
            let q = parts
                .find_map(quality_value)
                .and_then(|v| v.parse::<f32>().ok())
                .unwrap_or(1.0);
            Some(CharsetPreference {
                charset: charset.to_string(),
                q,
            })
        })
        .collect()
}
