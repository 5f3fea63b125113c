//! Error types for header parsing

use thiserror::Error;

/// Error raised while parsing an `Accept` header
///
/// `Accept-Charset` parsing never fails: an unreadable `q` there defaults to 1.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A `q` parameter that is not a number in `[0, 1]`
    #[error("invalid quality value: {value}")]
    InvalidQuality { value: String },

    /// A media range that is not `type/subtype`
    #[error("malformed media range: {range}")]
    MalformedMediaRange { range: String },
}

#[cfg(test)]
#[path = "error/error_tests.rs"]
mod error_tests;
