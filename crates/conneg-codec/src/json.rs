//! JSON codec

use crate::charset::{decode_text, encode_text};
use crate::codec::{Codec, CodecError, content_type_pattern};
use conneg_core::Value;
use once_cell::sync::Lazy;
use regex::Regex;

static JSON_TYPE: Lazy<Regex> = Lazy::new(|| content_type_pattern(r"^application/(vnd.+)?json"));

/// JSON codec implementation using serde_json
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    /// Whether to pretty-print output (default: false for efficiency)
    pretty: bool,
    /// Whether decoded map keys become keywords
    keywordize: bool,
}

impl JsonCodec {
    /// Create a new JSON codec
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON codec that pretty-prints output
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            keywordize: false,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_keywordize(mut self, keywordize: bool) -> Self {
        self.keywordize = keywordize;
        self
    }

    /// Encode a value directly to a JSON string
    pub fn encode_string(&self, value: &Value) -> Result<String, CodecError> {
        if self.pretty {
            serde_json::to_string_pretty(value).map_err(Into::into)
        } else {
            serde_json::to_string(value).map_err(Into::into)
        }
    }

    /// Decode a JSON string to a value
    pub fn decode_str(&self, data: &str) -> Result<Value, CodecError> {
        let value: Value = serde_json::from_str(data)?;
        Ok(if self.keywordize {
            value.keywordize_keys()
        } else {
            value
        })
    }
}

impl Codec for JsonCodec {
    fn name(&self) -> &str {
        if self.keywordize { "json-kw" } else { "json" }
    }

    fn content_type(&self) -> &str {
        "application/json"
    }

    fn can_decode(&self) -> bool {
        true
    }

    fn can_encode(&self) -> bool {
        true
    }

    fn matches(&self, content_type: &str) -> bool {
        JSON_TYPE.is_match(content_type)
    }

    fn decode(&self, data: &[u8], charset: &str) -> Result<Value, CodecError> {
        self.decode_str(&decode_text(data, charset)?)
    }

    fn encode(&self, value: &Value, charset: &str) -> Result<Vec<u8>, CodecError> {
        let text = self.encode_string(value)?;
        Ok(encode_text(&text, charset)?.into_owned())
    }
}
