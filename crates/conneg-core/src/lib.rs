//! conneg-core - Media types, header parsing and the value model
//!
//! This crate provides the leaf types every other conneg crate builds on:
//! - [`MediaType`] and [`parse_accept`] for ranked `Accept` headers
//! - [`CharsetPreference`] and [`parse_accept_charset`] for `Accept-Charset`
//! - [`AcceptParser`] and [`CharsetPreferenceParser`] bounded parse caches
//! - [`Value`] and [`Map`], the structured data every codec reads and writes
//! - [`ParseError`] for malformed headers

mod cache;
mod error;
mod media_type;
mod value;

pub use cache::{AcceptParser, CharsetPreferenceParser, DEFAULT_CACHE_CAPACITY, ParseCache};
pub use error::ParseError;
pub use media_type::{CharsetPreference, MediaType, parse_accept, parse_accept_charset};
pub use value::{Map, Value};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AcceptParser, CharsetPreference, CharsetPreferenceParser, Map, MediaType, ParseError,
        Value, parse_accept, parse_accept_charset,
    };
}
