//! Request decoding pipeline

use crate::charset::{CharsetPolicy, CharsetResolver};
use crate::config::FormatConfig;
use crate::error::{DecodeErrorHook, Error, Result, status_response};
use crate::handler::Handler;
use crate::registry::{CodecDescriptor, Direction, FormatSet, FormatSpec};
use crate::request::{Body, Request, Response};
use conneg_codec::{BomDetector, CharsetDetector, CodecOptions, SupportedCharsets};
use conneg_core::{CharsetPreferenceParser, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Configuration of a [`DecodeRequest`] pipeline
#[derive(Clone, Default)]
pub struct DecodeOptions {
    formats: FormatSet,
    resolver: CharsetResolver,
    on_error: Option<DecodeErrorHook>,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options from serialized configuration
    pub fn from_config(config: &FormatConfig) -> Self {
        let mut options = Self::new().with_resolver(
            CharsetResolver::new()
                .with_parser(Arc::new(CharsetPreferenceParser::new(config.cache_capacity))),
        );
        if !config.formats.is_empty() {
            options = options.with_formats(config.formats.iter().map(String::as_str));
        }
        if let Some(charset) = &config.charset {
            options = options.with_charset(CharsetPolicy::fixed(charset));
        }
        if config.sniff_charset {
            options = options.with_detector(Arc::new(BomDetector));
        }
        for (name, codec_options) in &config.options {
            options = options.with_codec_options(name.clone(), codec_options.clone());
        }
        options
    }

    /// Formats to try, in trial order; defaults to every decoding built-in
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

    /// Sniff bodies of requests without `Accept-Charset`
    pub fn with_detector(mut self, detector: Arc<dyn CharsetDetector>) -> Self {
        self.resolver = self.resolver.with_detector(detector);
        self
    }

    /// Hook receiving decode failures; without one they are returned as-is
    pub fn with_error_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(Error, &dyn Handler, Request) -> Result<Response> + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// Answer decode failures with a plain-text response of `status`
    pub fn with_error_status(self, status: u16) -> Self {
        self.with_error_hook(move |err, _, _| Ok(status_response(status, &err)))
    }
}

/// Decodes request bodies before calling the wrapped handler
///
/// Formats are tried in declared order and the first whose predicate
/// matches the request wins; later formats are never tried for that
/// request. On success the decoded value is stored in
/// [`Request::body_params`], merged into [`Request::params`] when it is a
/// map, and the raw bytes stay readable as [`Body::Bytes`].
pub struct DecodeRequest<H> {
    inner: H,
    decoders: Arc<[CodecDescriptor]>,
    resolver: CharsetResolver,
    on_error: Option<DecodeErrorHook>,
}

impl<H: Handler> DecodeRequest<H> {
    pub fn new(inner: H, options: DecodeOptions) -> Result<Self> {
        let decoders = options.formats.descriptors(Direction::Decode)?;
        debug!(
            formats = ?decoders.iter().map(CodecDescriptor::name).collect::<Vec<_>>(),
            "decode pipeline ready"
        );
        Ok(Self {
            inner,
            decoders: decoders.into(),
            resolver: options.resolver,
            on_error: options.on_error,
        })
    }

    pub fn decoders(&self) -> &[CodecDescriptor] {
        &self.decoders
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    fn decode(&self, decoder: &CodecDescriptor, request: &mut Request) -> Result<()> {
        let Some(body) = request.body.take() else {
            return Ok(());
        };
        let bytes = body.into_bytes()?;
        if bytes.is_empty() {
            request.body = Some(Body::Bytes(bytes));
            return Ok(());
        }

        let charset = decoder.request_charset(&self.resolver, request, &bytes);
        let decoded = decoder.decode(&bytes, &charset);
        request.body = Some(Body::Bytes(bytes));
        let value = decoded?;
        debug!(format = decoder.name(), %charset, "request body decoded");

        if value.is_nil() {
            return Ok(());
        }
        if let Value::Map(map) = &value {
            request.params.merge(map.clone());
        }
        request.body_params = Some(value);
        Ok(())
    }
}

impl<H: Handler> Handler for DecodeRequest<H> {
    fn handle(&self, mut request: Request) -> Result<Response> {
        let Some(decoder) = self.decoders.iter().find(|d| d.matches_request(&request)) else {
            return self.inner.handle(request);
        };

        match self.decode(decoder, &mut request) {
            Ok(()) => self.inner.handle(request),
            Err(err) => {
                warn!(format = decoder.name(), error = %err, "request decoding failed");
                match &self.on_error {
                    Some(hook) => hook(err, &self.inner, request),
                    None => Err(err),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "decode/decode_tests.rs"]
mod decode_tests;
