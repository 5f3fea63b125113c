//! YAML codec and the YAML-in-HTML rendering used for browser debugging

use crate::charset::{decode_text, encode_text};
use crate::codec::{Codec, CodecError, content_type_pattern};
use conneg_core::Value;
use once_cell::sync::Lazy;
use regex::Regex;

static YAML_TYPE: Lazy<Regex> =
    Lazy::new(|| content_type_pattern(r"^(application|text)/(vnd.+)?(x-)?yaml"));

/// YAML codec implementation using serde_yaml
///
/// With `html` set the codec becomes the encode-only `yaml-in-html`
/// variant: the YAML text, HTML-escaped, inside a `<pre>` block.
#[derive(Debug, Clone, Default)]
pub struct YamlCodec {
    keywordize: bool,
    html: bool,
}

impl YamlCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode-only `text/html` variant
    pub fn html() -> Self {
        Self {
            keywordize: false,
            html: true,
        }
    }

    pub fn with_keywordize(mut self, keywordize: bool) -> Self {
        self.keywordize = keywordize;
        self
    }

    /// Encode a value as YAML text
    pub fn encode_string(&self, value: &Value) -> Result<String, CodecError> {
        let yaml = serde_yaml::to_string(value)
            .map_err(|e| CodecError::Serialization(e.to_string()))?;
        if self.html {
            Ok(wrap_html(&yaml))
        } else {
            Ok(yaml)
        }
    }

    pub fn decode_str(&self, data: &str) -> Result<Value, CodecError> {
        if data.trim().is_empty() {
            return Ok(Value::Nil);
        }
        let value: Value = serde_yaml::from_str(data)?;
        Ok(if self.keywordize {
            value.keywordize_keys()
        } else {
            value
        })
    }
}

impl Codec for YamlCodec {
    fn name(&self) -> &str {
        match (self.html, self.keywordize) {
            (true, _) => "yaml-in-html",
            (false, true) => "yaml-kw",
            (false, false) => "yaml",
        }
    }

    fn content_type(&self) -> &str {
        if self.html {
            "text/html"
        } else {
            "application/x-yaml"
        }
    }

    // yaml-in-html responses carry a bare `text/html`
    fn declares_charset(&self) -> bool {
        !self.html
    }

    fn can_decode(&self) -> bool {
        !self.html
    }

    fn can_encode(&self) -> bool {
        true
    }

    fn matches(&self, content_type: &str) -> bool {
        !self.html && YAML_TYPE.is_match(content_type)
    }

    fn decode(&self, data: &[u8], charset: &str) -> Result<Value, CodecError> {
        if self.html {
            return Err(CodecError::unsupported(self.name(), "decode"));
        }
        self.decode_str(&decode_text(data, charset)?)
    }

    fn encode(&self, value: &Value, charset: &str) -> Result<Vec<u8>, CodecError> {
        let text = self.encode_string(value)?;
        Ok(encode_text(&text, charset)?.into_owned())
    }
}

fn wrap_html(yaml: &str) -> String {
    format!(
        "<html>\n<head></head>\n<body><div><pre>\n{}</pre></div></body></html>",
        escape_html(yaml)
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
