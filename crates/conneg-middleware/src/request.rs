//! Request and response records exchanged with the host HTTP layer

use crate::error::{Error, Result};
use conneg_core::{Map, MediaType, Value};
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

/// Header list with case-sensitive names
///
/// Lookups are not case-normalized: [`get`](Headers::get) tries the exact
/// name and then its lower-case form, which covers both spellings hosts
/// commonly use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `name`, or of its lower-case form
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_exact(name).or_else(|| {
            let lower = name.to_ascii_lowercase();
            if lower == name {
                None
            } else {
                self.get_exact(&lower)
            }
        })
    }

    fn get_exact(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set a header, replacing an entry with exactly the same name
    ///
    /// Names differing only in case are separate entries.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

/// Request or response body
pub enum Body {
    /// Plain text, never encoded by default
    Text(String),
    /// Raw, already materialized bytes
    Bytes(Vec<u8>),
    /// Byte stream read once, in full, when decoding
    Stream(Box<dyn Read + Send>),
    /// File served as-is
    File(PathBuf),
    /// Structured value awaiting encoding
    Value(Value),
}

impl Body {
    pub fn kind(&self) -> &'static str {
        match self {
            Body::Text(_) => "text",
            Body::Bytes(_) => "bytes",
            Body::Stream(_) => "stream",
            Body::File(_) => "file",
            Body::Value(_) => "value",
        }
    }

    /// Read the whole body into memory
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Body::Text(text) => Ok(text.into_bytes()),
            Body::Bytes(bytes) => Ok(bytes),
            Body::Stream(mut stream) => {
                let mut bytes = Vec::new();
                stream.read_to_end(&mut bytes)?;
                Ok(bytes)
            }
            Body::File(path) => Ok(std::fs::read(path)?),
            Body::Value(_) => Err(Error::InvalidBody(
                "a structured value has no byte representation".to_string(),
            )),
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Body::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Body::Bytes(bytes) => Some(bytes),
            Body::Text(text) => Some(text.as_bytes()),
            _ => None,
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Body::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            Body::Stream(_) => f.write_str("Stream"),
            Body::File(path) => f.debug_tuple("File").field(path).finish(),
            Body::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Value(value)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(bytes)
    }
}

/// Inbound request
#[derive(Debug, Default)]
pub struct Request {
    pub headers: Headers,
    /// Content type set by the host, checked before the headers
    pub content_type: Option<String>,
    /// Query and path parameters; a decoded map body is merged in
    pub params: Map,
    /// Decoded body, set by the decode pipeline
    pub body_params: Option<Value>,
    pub body: Option<Body>,
    /// Pre-ranked accept list that bypasses `Accept` header parsing
    pub ranked_accept: Option<Arc<[MediaType]>>,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_params(mut self, params: Map) -> Self {
        self.params = params;
        self
    }

    pub fn with_ranked_accept(mut self, ranked: impl Into<Arc<[MediaType]>>) -> Self {
        self.ranked_accept = Some(ranked.into());
        self
    }

    /// Content type from the explicit field, then `Content-Type`, then
    /// `content-type`
    pub fn effective_content_type(&self) -> Option<&str> {
        self.content_type
            .as_deref()
            .or_else(|| self.headers.get("Content-Type"))
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Copy of everything but the body
    pub fn head(&self) -> Request {
        Request {
            headers: self.headers.clone(),
            content_type: self.content_type.clone(),
            params: self.params.clone(),
            body_params: self.body_params.clone(),
            body: None,
            ranked_accept: self.ranked_accept.clone(),
        }
    }
}

/// Outbound response
#[derive(Debug)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    pub body: Option<Body>,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: None,
        }
    }

    /// `200` response carrying a structured value
    pub fn value(value: impl Into<Value>) -> Self {
        Self::new(200).with_body(Body::Value(value.into()))
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(200)
    }
}

#[cfg(test)]
#[path = "request/request_tests.rs"]
mod request_tests;
