//! Built-in codec table and per-format options

use crate::codec::Codec;
use crate::edn::EdnCodec;
use crate::json::JsonCodec;
use crate::transit::{TransitCodec, TransitHandlers};
use crate::yaml::YamlCodec;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Built-in format names in registry order
pub const BUILTIN_FORMATS: &[&str] = &[
    "json",
    "edn",
    "clojure",
    "yaml",
    "yaml-in-html",
    "transit-json",
    "transit-msgpack",
];

/// Options passed to one format's codec constructor
///
/// Each codec reads only the options that apply to it. `charset` is not
/// used by codecs themselves; the middleware reads it as a fixed
/// per-format charset override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    pub charset: Option<String>,

    /// JSON only
    pub pretty: bool,

    /// JSON and YAML only: decode map keys as keywords
    #[serde(alias = "kw")]
    pub keywordize: bool,

    /// Transit JSON only
    pub verbose: bool,

    /// YAML only: render as an HTML page
    pub html: bool,

    /// Transit extension handlers
    #[serde(skip)]
    pub handlers: TransitHandlers,
}

impl CodecOptions {
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_keywordize(mut self, keywordize: bool) -> Self {
        self.keywordize = keywordize;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_html(mut self, html: bool) -> Self {
        self.html = html;
        self
    }

    pub fn with_handlers(mut self, handlers: TransitHandlers) -> Self {
        self.handlers = handlers;
        self
    }
}

/// Construct the built-in codec registered under `name`
///
/// Besides [`BUILTIN_FORMATS`] this accepts the `json-kw` and `yaml-kw`
/// shorthands. Returns `None` for unknown names.
pub fn builtin(name: &str, options: &CodecOptions) -> Option<Arc<dyn Codec>> {
    let codec: Arc<dyn Codec> = match name {
        "json" => Arc::new(
            JsonCodec::new()
                .with_pretty(options.pretty)
                .with_keywordize(options.keywordize),
        ),
        "json-kw" => Arc::new(JsonCodec::new().with_pretty(options.pretty).with_keywordize(true)),
        "edn" => Arc::new(EdnCodec::new()),
        "clojure" => Arc::new(EdnCodec::clojure()),
        "yaml" if options.html => Arc::new(YamlCodec::html()),
        "yaml" => Arc::new(YamlCodec::new().with_keywordize(options.keywordize)),
        "yaml-kw" => Arc::new(YamlCodec::new().with_keywordize(true)),
        "yaml-in-html" => Arc::new(YamlCodec::html()),
        "transit-json" => {
            let codec = if options.verbose {
                TransitCodec::json_verbose()
            } else {
                TransitCodec::json()
            };
            Arc::new(codec.with_handlers(options.handlers.clone()))
        }
        "transit-msgpack" => {
            Arc::new(TransitCodec::msgpack().with_handlers(options.handlers.clone()))
        }
        _ => return None,
    };
    Some(codec)
}

/// Default decode formats: every built-in that can decode, in registry order
pub fn default_decode_formats() -> Vec<&'static str> {
    default_formats(|codec| codec.can_decode())
}

/// Default encode formats: every built-in that can encode, in registry order
pub fn default_encode_formats() -> Vec<&'static str> {
    default_formats(|codec| codec.can_encode())
}

fn default_formats(capable: impl Fn(&dyn Codec) -> bool) -> Vec<&'static str> {
    let options = CodecOptions::default();
    BUILTIN_FORMATS
        .iter()
        .copied()
        .filter(|name| builtin(name, &options).is_some_and(|codec| capable(codec.as_ref())))
        .collect()
}
