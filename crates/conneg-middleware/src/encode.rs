//! Response encoding pipeline

use crate::charset::{CharsetPolicy, CharsetResolver};
use crate::config::FormatConfig;
use crate::error::{EncodeErrorHook, Error, Result, status_response};
use crate::handler::Handler;
use crate::negotiate::Negotiator;
use crate::registry::{CodecDescriptor, Direction, FormatSet, FormatSpec};
use crate::request::{Body, Request, Response};
use conneg_codec::{CodecOptions, SupportedCharsets};
use conneg_core::{AcceptParser, CharsetPreferenceParser, Value};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, warn};

/// Decides whether a response gets encoded
pub type EncodePredicate = Arc<dyn Fn(&Request, &Response) -> bool + Send + Sync>;

/// Default predicate: only structured, non-nil, non-string bodies are encoded
///
/// Missing bodies, text, bytes, streams and files pass through untouched.
pub fn default_predicate(_request: &Request, response: &Response) -> bool {
    match &response.body {
        Some(Body::Value(value)) => !value.is_nil() && !matches!(value, Value::String(_)),
        _ => false,
    }
}

/// Configuration of an [`EncodeResponse`] pipeline
#[derive(Clone, Default)]
pub struct EncodeOptions {
    formats: FormatSet,
    resolver: CharsetResolver,
    negotiator: Negotiator,
    predicate: Option<EncodePredicate>,
    on_error: Option<EncodeErrorHook>,
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options from serialized configuration
    pub fn from_config(config: &FormatConfig) -> Self {
        let mut options = Self::new()
            .with_resolver(
                CharsetResolver::new()
                    .with_parser(Arc::new(CharsetPreferenceParser::new(config.cache_capacity))),
            )
            .with_negotiator(Negotiator::with_parser(Arc::new(AcceptParser::new(
                config.cache_capacity,
            ))));
        if !config.formats.is_empty() {
            options = options.with_formats(config.formats.iter().map(String::as_str));
        }
        if let Some(charset) = &config.charset {
            options = options.with_charset(CharsetPolicy::fixed(charset));
        }
        for (name, codec_options) in &config.options {
            options = options.with_codec_options(name.clone(), codec_options.clone());
        }
        options
    }

    /// Candidate encoders in priority order; the first is also the fallback.
    /// Defaults to every encoding built-in.
    pub fn with_formats<I, F>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FormatSpec>,
    {
        self.formats.formats = Some(formats.into_iter().map(Into::into).collect());
        self
    }

    /// Options handed to the codec constructor of format `name`
    pub fn with_codec_options(mut self, name: impl Into<String>, options: CodecOptions) -> Self {
        self.formats.options.insert(name.into(), options);
        self
    }

    /// Charset policy for every format without its own
    pub fn with_charset(mut self, charset: CharsetPolicy) -> Self {
        self.formats.charset = charset;
        self
    }

    /// Charset policy for one format
    pub fn with_format_charset(mut self, name: impl Into<String>, charset: CharsetPolicy) -> Self {
        self.formats.charsets.insert(name.into(), charset);
        self
    }

    pub fn with_resolver(mut self, resolver: CharsetResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_supported_charsets(mut self, supported: Arc<SupportedCharsets>) -> Self {
        self.resolver = self.resolver.with_supported(supported);
        self
    }

    pub fn with_negotiator(mut self, negotiator: Negotiator) -> Self {
        self.negotiator = negotiator;
        self
    }

    /// Replace [`default_predicate`]
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Request, &Response) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Hook receiving encode failures; without one they are returned as-is
    pub fn with_error_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(Error, &Request, Response) -> Result<Response> + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// Answer encode failures with a plain-text response of `status`
    pub fn with_error_status(self, status: u16) -> Self {
        self.with_error_hook(move |err, _, _| Ok(status_response(status, &err)))
    }
}

/// Encodes structured response bodies with the negotiated codec
///
/// When negotiation finds no acceptable encoder the first configured one is
/// used; this pipeline never answers 406.
pub struct EncodeResponse<H> {
    inner: H,
    encoders: Arc<[CodecDescriptor]>,
    resolver: CharsetResolver,
    negotiator: Negotiator,
    predicate: Option<EncodePredicate>,
    on_error: Option<EncodeErrorHook>,
}

impl<H: Handler> EncodeResponse<H> {
    pub fn new(inner: H, options: EncodeOptions) -> Result<Self> {
        let encoders = options.formats.descriptors(Direction::Encode)?;
        if encoders.is_empty() {
            return Err(Error::Config(
                "encode pipeline needs at least one encoder".to_string(),
            ));
        }
        debug!(
            formats = ?encoders.iter().map(CodecDescriptor::name).collect::<Vec<_>>(),
            "encode pipeline ready"
        );
        Ok(Self {
            inner,
            encoders: encoders.into(),
            resolver: options.resolver,
            negotiator: options.negotiator,
            predicate: options.predicate,
            on_error: options.on_error,
        })
    }

    pub fn encoders(&self) -> &[CodecDescriptor] {
        &self.encoders
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    /// Encoder for `request`, falling back to the first configured one
    pub fn select(&self, request: &Request) -> Result<&CodecDescriptor> {
        let chosen = self.negotiator.preferred(&self.encoders, request)?;
        chosen
            .or_else(|| {
                debug!("no acceptable encoder, using the first configured");
                self.encoders.first()
            })
            .ok_or_else(|| Error::Config("no encoders configured".to_string()))
    }

    fn should_encode(&self, request: &Request, response: &Response) -> bool {
        match &self.predicate {
            Some(predicate) => predicate(request, response),
            None => default_predicate(request, response),
        }
    }

    fn encode(&self, request: &Request, response: &Response) -> Result<(Vec<u8>, String)> {
        let encoder = self.select(request)?;
        let value = match &response.body {
            Some(Body::Value(value)) => Cow::Borrowed(value),
            Some(Body::Text(text)) => Cow::Owned(Value::String(text.clone())),
            None => Cow::Owned(Value::Nil),
            Some(other) => {
                return Err(Error::InvalidBody(format!(
                    "cannot encode a {} body",
                    other.kind()
                )));
            }
        };
        let charset = if encoder.codec().is_binary() {
            Cow::Borrowed(conneg_codec::DEFAULT_CHARSET)
        } else {
            Cow::Owned(encoder.response_charset(&self.resolver, request))
        };
        let encoded = encoder.encode(&value, &charset)?;
        debug!(
            format = encoder.name(),
            content_type = %encoded.1,
            len = encoded.0.len(),
            "response body encoded"
        );
        Ok(encoded)
    }
}

impl<H: Handler> Handler for EncodeResponse<H> {
    fn handle(&self, request: Request) -> Result<Response> {
        let head = request.head();
        let mut response = self.inner.handle(request)?;
        if !self.should_encode(&head, &response) {
            return Ok(response);
        }

        match self.encode(&head, &response) {
            Ok((bytes, content_type)) => {
                response.headers.insert("Content-Type", content_type);
                response
                    .headers
                    .insert("Content-Length", bytes.len().to_string());
                response.body = Some(Body::Bytes(bytes));
                Ok(response)
            }
            Err(err) => {
                warn!(error = %err, "response encoding failed");
                match &self.on_error {
                    Some(hook) => hook(err, &head, response),
                    None => Err(err),
                }
            }
        }
    }
}
