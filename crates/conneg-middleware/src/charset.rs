//! Charset resolution for request decoding and response encoding

use crate::request::Request;
use conneg_codec::{CharsetDetector, DEFAULT_CHARSET, SupportedCharsets};
use conneg_core::CharsetPreferenceParser;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Function choosing a charset per request
pub type CharsetFn = Arc<dyn Fn(&Request) -> String + Send + Sync>;

/// How a format picks the charset of a body
#[derive(Clone, Default)]
pub enum CharsetPolicy {
    /// Resolve from `Accept-Charset`, sniffing, then the default
    #[default]
    Negotiate,
    /// Always use this charset
    Fixed(String),
    /// Ask a function for each request
    Dynamic(CharsetFn),
}

impl CharsetPolicy {
    pub fn fixed(charset: impl Into<String>) -> Self {
        CharsetPolicy::Fixed(charset.into())
    }

    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&Request) -> String + Send + Sync + 'static,
    {
        CharsetPolicy::Dynamic(Arc::new(f))
    }
}

impl fmt::Debug for CharsetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharsetPolicy::Negotiate => f.write_str("Negotiate"),
            CharsetPolicy::Fixed(charset) => f.debug_tuple("Fixed").field(charset).finish(),
            CharsetPolicy::Dynamic(_) => f.write_str("Dynamic"),
        }
    }
}

/// Picks a runtime-supported charset from request headers or body bytes
#[derive(Clone)]
pub struct CharsetResolver {
    supported: Arc<SupportedCharsets>,
    parser: Arc<CharsetPreferenceParser>,
    detector: Option<Arc<dyn CharsetDetector>>,
}

impl CharsetResolver {
    /// Resolver over every runtime charset, sharing the process-wide parse cache
    pub fn new() -> Self {
        Self {
            supported: SupportedCharsets::runtime(),
            parser: CharsetPreferenceParser::global(),
            detector: None,
        }
    }

    pub fn with_supported(mut self, supported: Arc<SupportedCharsets>) -> Self {
        self.supported = supported;
        self
    }

    pub fn with_parser(mut self, parser: Arc<CharsetPreferenceParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Sniff request bodies when no `Accept-Charset` header is present
    pub fn with_detector(mut self, detector: Arc<dyn CharsetDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn supported(&self) -> &SupportedCharsets {
        &self.supported
    }

    /// Choose a charset from an `Accept-Charset` header value
    ///
    /// NOTE: preferences are sorted by *ascending* q before filtering, so
    /// the lowest-q supported charset wins; ties keep declaration order.
    /// This is deliberate and pinned by tests, see DESIGN.md before
    /// changing it.
    pub fn choose(&self, header: &str) -> Option<String> {
        let prefs = self.parser.parse(header);
        let mut ranked: Vec<_> = prefs.iter().collect();
        ranked.sort_by(|a, b| a.q.total_cmp(&b.q));
        ranked
            .into_iter()
            .find(|pref| self.supported.contains(&pref.charset))
            .map(|pref| pref.charset.trim().to_ascii_lowercase())
    }

    /// Charset for decoding a request body
    ///
    /// An `Accept-Charset` header decides when present (falling back to
    /// utf-8); otherwise the detector, if any, looks at `body`.
    pub fn resolve_request(&self, request: &Request, body: &[u8]) -> String {
        if let Some(header) = accept_charset(request) {
            return self.choose(header).unwrap_or_else(default_charset);
        }
        if let Some(detector) = &self.detector
            && let Some(detected) = detector.detect(body)
        {
            if self.supported.contains(&detected) {
                debug!(charset = %detected, "charset sniffed from request body");
                return detected.trim().to_ascii_lowercase();
            }
            debug!(charset = %detected, "sniffed charset is not supported");
        }
        default_charset()
    }

    /// Charset for encoding a response body; headers only
    pub fn resolve_response(&self, request: &Request) -> String {
        accept_charset(request)
            .and_then(|header| self.choose(header))
            .unwrap_or_else(default_charset)
    }
}

impl Default for CharsetResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CharsetResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharsetResolver")
            .field("supported", &self.supported.len())
            .field("detector", &self.detector.is_some())
            .finish()
    }
}

fn accept_charset(request: &Request) -> Option<&str> {
    request.headers.get("Accept-Charset")
}

fn default_charset() -> String {
    DEFAULT_CHARSET.to_string()
}

#[cfg(test)]
#[path = "charset/charset_tests.rs"]
mod charset_tests;
