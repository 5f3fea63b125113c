//! Serialized pipeline configuration

use conneg_codec::CodecOptions;
use conneg_core::DEFAULT_CACHE_CAPACITY;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration shared by the decode and encode pipelines
///
/// Function-valued settings (per-request charsets, Transit handlers, error
/// hooks, predicates) have no serialized form and are set on
/// [`DecodeOptions`](crate::DecodeOptions) and
/// [`EncodeOptions`](crate::EncodeOptions) instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Format names in priority order; empty means every capable built-in
    #[serde(default)]
    pub formats: Vec<String>,

    /// Fixed charset overriding negotiation for every format
    #[serde(default)]
    pub charset: Option<String>,

    /// Sniff a byte order mark when a request has no `Accept-Charset`
    #[serde(default)]
    pub sniff_charset: bool,

    /// Entries kept by each header parse cache
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Per-format codec options, keyed by format name
    #[serde(default)]
    pub options: HashMap<String, CodecOptions>,
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            formats: Vec::new(),
            charset: None,
            sniff_charset: false,
            cache_capacity: default_cache_capacity(),
            options: HashMap::new(),
        }
    }
}

impl FormatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes)
    }

    /// Create configuration from a TOML document
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn with_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formats = formats.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_options(mut self, name: impl Into<String>, options: CodecOptions) -> Self {
        self.options.insert(name.into(), options);
        self
    }

    /// Options for format `name`, or defaults
    pub fn format_options(&self, name: &str) -> CodecOptions {
        self.options.get(name).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod config_tests;
