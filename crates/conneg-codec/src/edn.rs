//! EDN codec and its write-only `application/clojure` variant

mod reader;
mod writer;

use crate::charset::{decode_text, encode_text};
use crate::codec::{Codec, CodecError, content_type_pattern};
use conneg_core::Value;
use once_cell::sync::Lazy;
use regex::Regex;

pub use reader::read_str;
pub use writer::write_string;

static EDN_TYPE: Lazy<Regex> =
    Lazy::new(|| content_type_pattern(r"^application/(vnd.+)?(x-)?(clojure|edn)"));

/// EDN codec
///
/// Reading is data-only: tagged literals become [`Value::Tagged`] and
/// nothing is ever evaluated.
#[derive(Debug, Clone)]
pub struct EdnCodec {
    name: &'static str,
    content_type: &'static str,
    decodes: bool,
}

impl EdnCodec {
    /// `application/edn`, decode and encode
    pub fn new() -> Self {
        Self {
            name: "edn",
            content_type: "application/edn",
            decodes: true,
        }
    }

    /// `application/clojure`, encode only
    pub fn clojure() -> Self {
        Self {
            name: "clojure",
            content_type: "application/clojure",
            decodes: false,
        }
    }
}

impl Default for EdnCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec for EdnCodec {
    fn name(&self) -> &str {
        self.name
    }

    fn content_type(&self) -> &str {
        self.content_type
    }

    fn can_decode(&self) -> bool {
        self.decodes
    }

    fn can_encode(&self) -> bool {
        true
    }

    fn matches(&self, content_type: &str) -> bool {
        self.decodes && EDN_TYPE.is_match(content_type)
    }

    fn decode(&self, data: &[u8], charset: &str) -> Result<Value, CodecError> {
        if !self.decodes {
            return Err(CodecError::unsupported(self.name, "decode"));
        }
        read_str(&decode_text(data, charset)?)
    }

    fn encode(&self, value: &Value, charset: &str) -> Result<Vec<u8>, CodecError> {
        let text = write_string(value);
        Ok(encode_text(&text, charset)?.into_owned())
    }
}
