//! Error types for the negotiation pipelines

use crate::handler::Handler;
use crate::request::{Body, Request, Response};
use conneg_codec::CodecError;
use conneg_core::ParseError;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for pipeline operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed `Accept` header or codec content type
    #[error("header parse error: {0}")]
    Parse(#[from] ParseError),

    /// A codec failed to decode or encode
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Reading the request body failed
    #[error("body read error: {0}")]
    Io(#[from] std::io::Error),

    /// Format name not in the built-in table
    #[error("unknown format: {0}")]
    UnknownFormat(String),

    /// Pipeline configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Body has a shape the pipeline cannot handle
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// Wrapped handler returned an error
    #[error("handler error: {0}")]
    Handler(String),
}

impl Error {
    /// Returns a stable numeric code for the error kind
    pub fn error_code(&self) -> u32 {
        match self {
            Error::Parse(_) => 1,
            Error::Codec(_) => 2,
            Error::Io(_) => 3,
            Error::UnknownFormat(_) => 4,
            Error::Config(_) => 5,
            Error::InvalidBody(_) => 6,
            Error::Handler(_) => 7,
        }
    }
}

/// Error hook of the decode pipeline: `(error, wrapped handler, request)`
///
/// Whatever it returns becomes the pipeline's result; the request is not
/// decoded again.
pub type DecodeErrorHook =
    Arc<dyn Fn(Error, &dyn Handler, Request) -> Result<Response> + Send + Sync>;

/// Error hook of the encode pipeline: `(error, request, response)`
pub type EncodeErrorHook = Arc<dyn Fn(Error, &Request, Response) -> Result<Response> + Send + Sync>;

/// Plain-text response describing `err` with a fixed status
pub fn status_response(status: u16, err: &Error) -> Response {
    Response::new(status)
        .with_header("Content-Type", "text/plain; charset=utf-8")
        .with_body(Body::Text(err.to_string()))
}
