//! conneg-middleware - Content negotiation around a request handler
//!
//! This crate provides:
//! - [`Request`], [`Response`], [`Body`] and [`Headers`], the records
//!   exchanged with the host HTTP layer
//! - [`Handler`] trait implemented by closures and by both pipelines
//! - [`DecodeRequest`] decoding request bodies by `Content-Type`
//! - [`EncodeResponse`] encoding responses with the codec negotiated from
//!   `Accept`
//! - [`Negotiator`], [`CharsetResolver`] and [`CodecDescriptor`], the
//!   building blocks both pipelines share
//! - [`FormatConfig`] for serialized configuration

mod charset;
mod config;
mod decode;
mod encode;
mod error;
mod handler;
mod negotiate;
mod registry;
mod request;

pub use charset::{CharsetFn, CharsetPolicy, CharsetResolver};
pub use config::FormatConfig;
pub use decode::{DecodeOptions, DecodeRequest};
pub use encode::{EncodeOptions, EncodePredicate, EncodeResponse, default_predicate};
pub use error::{DecodeErrorHook, EncodeErrorHook, Error, Result, status_response};
pub use handler::Handler;
pub use negotiate::{Negotiator, preferred_encoder};
pub use registry::{CodecDescriptor, FormatSpec, resolve};
pub use request::{Body, Headers, Request, Response};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Body, CharsetPolicy, DecodeOptions, DecodeRequest, EncodeOptions, EncodeResponse, Error,
        FormatConfig, FormatSpec, Handler, Request, Response, Result,
    };
}
