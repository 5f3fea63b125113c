//! # conneg
//!
//! HTTP content negotiation for request handlers.
//!
//! conneg sits between the HTTP layer and application code, providing:
//! - `Accept` and `Accept-Charset` parsing with bounded parse caches
//! - Request body decoding chosen by `Content-Type`
//! - Response encoding chosen by `Accept`, in the negotiated charset
//! - Built-in JSON, EDN, YAML and Transit codecs plus custom codecs
//!
//! ## Quick Start
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! conneg = "0.3"
//! ```
//!
//! ## Wrapping a Handler
//!
//! ```
//! use conneg::prelude::*;
//!
//! fn greet(request: Request) -> Result<Response> {
//!     let name = request
//!         .params
//!         .get_named("name")
//!         .and_then(Value::as_str)
//!         .unwrap_or("world")
//!         .to_string();
//!     let mut body = Map::new();
//!     body.insert("greeting", format!("hello {name}"));
//!     Ok(Response::value(body))
//! }
//!
//! let config = FormatConfig::new().with_formats(["json", "edn"]);
//! let app = restful_format(greet, &config)?;
//!
//! let response = app.handle(
//!     Request::new()
//!         .with_header("Content-Type", "application/json")
//!         .with_header("Accept", "application/edn")
//!         .with_body(r#"{"name":"conneg"}"#),
//! )?;
//!
//! assert_eq!(
//!     response.header("Content-Type"),
//!     Some("application/edn; charset=utf-8")
//! );
//! # Ok::<(), conneg::Error>(())
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`conneg_core`] - Media types, header parsing and the value model
//! - [`conneg_codec`] - The codec trait and built-in codecs
//! - [`conneg_middleware`] - The decode and encode pipelines

mod restful;

pub use restful::{Restful, restful_format, restful_format_with};

// Re-export core types
pub use conneg_core::{
    AcceptParser, CharsetPreference, CharsetPreferenceParser, Map, MediaType, ParseError, Value,
    parse_accept, parse_accept_charset,
};

// Re-export codecs
pub use conneg_codec::{
    BUILTIN_FORMATS, BomDetector, CharsetDetector, Codec, CodecError, CodecOptions, EdnCodec,
    JsonCodec, SupportedCharsets, TransitCodec, TransitFormat, TransitHandlers, YamlCodec,
    builtin,
};

// Re-export pipeline types
pub use conneg_middleware::{
    Body, CharsetPolicy, CharsetResolver, CodecDescriptor, DecodeOptions, DecodeRequest,
    EncodeOptions, EncodeResponse, Error, FormatConfig, FormatSpec, Handler, Headers, Negotiator,
    Request, Response, Result, default_predicate, preferred_encoder, status_response,
};

// Re-export common dependencies that handler authors need
pub use serde;
pub use serde_json;
pub use tracing;

/// Prelude module for convenient imports.
///
/// Use `use conneg::prelude::*;` to import commonly used types.
///
/// This includes:
/// - Pipelines: `restful_format`, `DecodeRequest`, `EncodeResponse` and their options
/// - Exchange types: `Request`, `Response`, `Body`, `Handler`
/// - Data: `Value`, `Map`
/// - Configuration: `FormatConfig`, `CodecOptions`, `CharsetPolicy`
pub mod prelude {
    pub use crate::{
        Body, CharsetPolicy, Codec, CodecOptions, DecodeOptions, DecodeRequest, EncodeOptions,
        EncodeResponse, Error, FormatConfig, FormatSpec, Handler, Map, Request, Response, Result,
        Value, restful_format,
    };
}
