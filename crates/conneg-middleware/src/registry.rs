//! Format resolution: names and custom codecs to codec descriptors

use crate::charset::{CharsetPolicy, CharsetResolver};
use crate::error::{Error, Result};
use crate::request::Request;
use conneg_codec::{Codec, CodecOptions, builtin, default_decode_formats, default_encode_formats};
use conneg_core::{MediaType, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A configured format: a built-in name or a caller-supplied codec
#[derive(Debug, Clone)]
pub enum FormatSpec {
    Named(String),
    Custom(Arc<dyn Codec>),
}

impl FormatSpec {
    pub fn custom(codec: impl Codec + 'static) -> Self {
        FormatSpec::Custom(Arc::new(codec))
    }

    /// Name used to look up per-format options
    pub fn name(&self) -> &str {
        match self {
            FormatSpec::Named(name) => name,
            FormatSpec::Custom(codec) => codec.name(),
        }
    }
}

impl From<&str> for FormatSpec {
    fn from(name: &str) -> Self {
        FormatSpec::Named(name.to_string())
    }
}

impl From<String> for FormatSpec {
    fn from(name: String) -> Self {
        FormatSpec::Named(name)
    }
}

impl From<Arc<dyn Codec>> for FormatSpec {
    fn from(codec: Arc<dyn Codec>) -> Self {
        FormatSpec::Custom(codec)
    }
}

/// A codec bound to its parsed media type and charset policy
///
/// Built once when a pipeline is constructed and shared read-only by every
/// request it handles.
#[derive(Debug, Clone)]
pub struct CodecDescriptor {
    codec: Arc<dyn Codec>,
    media_type: MediaType,
    charset: CharsetPolicy,
}

impl CodecDescriptor {
    pub fn new(codec: Arc<dyn Codec>) -> Result<Self> {
        let media_type = MediaType::parse(codec.content_type())?;
        Ok(Self {
            codec,
            media_type,
            charset: CharsetPolicy::Negotiate,
        })
    }

    pub fn with_charset(mut self, charset: CharsetPolicy) -> Self {
        self.charset = charset;
        self
    }

    pub fn name(&self) -> &str {
        self.codec.name()
    }

    pub fn content_type(&self) -> &str {
        self.codec.content_type()
    }

    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    pub fn codec(&self) -> &Arc<dyn Codec> {
        &self.codec
    }

    pub fn charset(&self) -> &CharsetPolicy {
        &self.charset
    }

    pub fn can_decode(&self) -> bool {
        self.codec.can_decode()
    }

    pub fn can_encode(&self) -> bool {
        self.codec.can_encode()
    }

    /// Decode predicate: a decoder, a body, and a matching content type
    pub fn matches_request(&self, request: &Request) -> bool {
        self.can_decode()
            && request.has_body()
            && request
                .effective_content_type()
                .is_some_and(|content_type| self.codec.matches(content_type))
    }

    /// Whether this codec can produce a response for an accepted media range
    pub fn accepts(&self, accepted: &MediaType) -> bool {
        if accepted.is_type_wildcard() {
            return true;
        }
        self.media_type.type_ == accepted.type_
            && (accepted.is_subtype_wildcard() || self.media_type.subtype == accepted.subtype)
    }

    pub fn decode(&self, data: &[u8], charset: &str) -> Result<Value> {
        Ok(self.codec.decode(data, charset)?)
    }

    /// Encode a value, returning the bytes and the response content type
    ///
    /// Text codecs get a `; charset=` suffix; binary codecs do not.
    pub fn encode(&self, value: &Value, charset: &str) -> Result<(Vec<u8>, String)> {
        let bytes = self.codec.encode(value, charset)?;
        let content_type = if self.codec.declares_charset() {
            format!("{}; charset={charset}", self.codec.content_type())
        } else {
            self.codec.content_type().to_string()
        };
        Ok((bytes, content_type))
    }

    /// Charset for decoding `body` of `request`
    pub fn request_charset(&self, resolver: &CharsetResolver, request: &Request, body: &[u8]) -> String {
        match &self.charset {
            CharsetPolicy::Negotiate => resolver.resolve_request(request, body),
            CharsetPolicy::Fixed(charset) => charset.clone(),
            CharsetPolicy::Dynamic(f) => f(request),
        }
    }

    /// Charset for encoding the response to `request`
    pub fn response_charset(&self, resolver: &CharsetResolver, request: &Request) -> String {
        match &self.charset {
            CharsetPolicy::Negotiate => resolver.resolve_response(request),
            CharsetPolicy::Fixed(charset) => charset.clone(),
            CharsetPolicy::Dynamic(f) => f(request),
        }
    }
}

/// Resolve one configured format into a descriptor
///
/// Names resolve against the built-in table; custom codecs pass through
/// unchanged. A `charset` in `options` becomes a fixed charset policy.
pub fn resolve(spec: &FormatSpec, options: &CodecOptions) -> Result<CodecDescriptor> {
    let codec = match spec {
        FormatSpec::Named(name) => {
            builtin(name, options).ok_or_else(|| Error::UnknownFormat(name.clone()))?
        }
        FormatSpec::Custom(codec) => codec.clone(),
    };
    let descriptor = CodecDescriptor::new(codec)?;
    Ok(match &options.charset {
        Some(charset) => descriptor.with_charset(CharsetPolicy::fixed(charset)),
        None => descriptor,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Decode,
    Encode,
}

/// Ordered formats plus their per-format options, shared by both pipelines'
/// option builders
#[derive(Debug, Clone, Default)]
pub(crate) struct FormatSet {
    pub(crate) formats: Option<Vec<FormatSpec>>,
    pub(crate) options: HashMap<String, CodecOptions>,
    pub(crate) charsets: HashMap<String, CharsetPolicy>,
    pub(crate) charset: CharsetPolicy,
}

impl FormatSet {
    /// Build the descriptors able to work in `direction`, in declared order
    ///
    /// Formats lacking the capability are skipped, so one format list can
    /// configure both pipelines.
    pub(crate) fn descriptors(&self, direction: Direction) -> Result<Vec<CodecDescriptor>> {
        let specs: Vec<FormatSpec> = match &self.formats {
            Some(formats) => formats.clone(),
            None => {
                let names = match direction {
                    Direction::Decode => default_decode_formats(),
                    Direction::Encode => default_encode_formats(),
                };
                names.into_iter().map(FormatSpec::from).collect()
            }
        };

        let mut descriptors = Vec::with_capacity(specs.len());
        for spec in &specs {
            let options = self.options.get(spec.name()).cloned().unwrap_or_default();
            let descriptor = resolve(spec, &options)?;
            let capable = match direction {
                Direction::Decode => descriptor.can_decode(),
                Direction::Encode => descriptor.can_encode(),
            };
            if !capable {
                debug!(format = spec.name(), ?direction, "format skipped, capability missing");
                continue;
            }
            let policy = match self.charsets.get(spec.name()) {
                Some(policy) => policy.clone(),
                None if options.charset.is_some() => descriptor.charset().clone(),
                None => self.charset.clone(),
            };
            descriptors.push(descriptor.with_charset(policy));
        }
        Ok(descriptors)
    }
}
