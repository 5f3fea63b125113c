//! conneg-codec - Codecs behind one capability-tagged interface
//!
//! This crate provides:
//! - [`Codec`] trait, implemented by every built-in and custom format
//! - [`JsonCodec`], [`EdnCodec`], [`YamlCodec`] and [`TransitCodec`]
//! - [`builtin`] lookup of the built-in table by format name
//! - charset transcoding ([`decode_text`], [`encode_text`]) and the
//!   [`SupportedCharsets`] set used by charset resolution

mod builtin;
mod charset;
mod codec;
pub mod edn;
mod json;
pub mod transit;
mod yaml;

pub use builtin::{
    BUILTIN_FORMATS, CodecOptions, builtin, default_decode_formats, default_encode_formats,
};
pub use charset::{
    BomDetector, CharsetDetector, DEFAULT_CHARSET, SupportedCharsets, decode_text, encode_text,
};
pub use codec::{Codec, CodecError};
pub use edn::EdnCodec;
pub use json::JsonCodec;
pub use transit::{TransitCodec, TransitFormat, TransitHandlers};
pub use yaml::YamlCodec;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Codec, CodecError, CodecOptions, EdnCodec, JsonCodec, SupportedCharsets, TransitCodec,
        TransitHandlers, YamlCodec, builtin,
    };
}
