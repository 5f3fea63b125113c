//! Codec trait and error type

use conneg_core::Value;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during encoding/decoding
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("codec {codec} does not support {operation}")]
    Unsupported {
        codec: String,
        operation: &'static str,
    },

    #[error("unsupported charset: {0}")]
    UnsupportedCharset(String),
}

impl CodecError {
    pub(crate) fn unsupported(codec: &str, operation: &'static str) -> Self {
        CodecError::Unsupported {
            codec: codec.to_string(),
            operation,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            CodecError::Deserialization(err.to_string())
        } else {
            CodecError::Serialization(err.to_string())
        }
    }
}

// serde_yaml reports both directions through one type; encoders map their
// own failures to `Serialization` explicitly
impl From<serde_yaml::Error> for CodecError {
    fn from(err: serde_yaml::Error) -> Self {
        CodecError::Deserialization(err.to_string())
    }
}

impl From<rmp_serde::decode::Error> for CodecError {
    fn from(err: rmp_serde::decode::Error) -> Self {
        CodecError::Deserialization(err.to_string())
    }
}

impl From<rmp_serde::encode::Error> for CodecError {
    fn from(err: rmp_serde::encode::Error) -> Self {
        CodecError::Serialization(err.to_string())
    }
}

/// A named pair of optional decode/encode operations bound to one content type
///
/// A codec declares what it can do through [`can_decode`](Codec::can_decode)
/// and [`can_encode`](Codec::can_encode); callers check those before using
/// the matching operation. The default operation bodies report
/// [`CodecError::Unsupported`].
pub trait Codec: Send + Sync {
    /// Registry name, e.g. "json"
    fn name(&self) -> &str;

    /// Content type of encoded output, without parameters
    fn content_type(&self) -> &str;

    /// Binary codecs ignore the charset
    fn is_binary(&self) -> bool {
        false
    }

    /// Whether encoded responses get a `; charset=` suffix
    fn declares_charset(&self) -> bool {
        !self.is_binary()
    }

    fn can_decode(&self) -> bool;

    fn can_encode(&self) -> bool;

    /// Whether a request declaring `content_type` carries this codec's format
    fn matches(&self, content_type: &str) -> bool {
        let _ = content_type;
        false
    }

    /// Decode a complete body
    fn decode(&self, data: &[u8], charset: &str) -> Result<Value, CodecError> {
        let _ = (data, charset);
        Err(CodecError::unsupported(self.name(), "decode"))
    }

    /// Encode a value into a complete body
    fn encode(&self, value: &Value, charset: &str) -> Result<Vec<u8>, CodecError> {
        let _ = (value, charset);
        Err(CodecError::unsupported(self.name(), "encode"))
    }
}

impl std::fmt::Debug for dyn Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("name", &self.name())
            .field("content_type", &self.content_type())
            .finish()
    }
}

/// Compile a content-type pattern written as a literal in this crate
pub(crate) fn content_type_pattern(pattern: &str) -> Regex {
    #[allow(clippy::expect_used)] // Safe: only called with literal patterns covered by tests
    Regex::new(pattern).expect("content-type pattern is valid")
}
