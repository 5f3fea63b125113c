//! Transit codec over JSON (compact or verbose) and MessagePack
//!
//! Values are first marshalled into a transit representation tree made of
//! plain [`Value`]s (nil, booleans, numbers, strings, vectors, string-keyed
//! maps), which `serde_json` or `rmp_serde` then write. Reading runs the
//! same steps backwards and honours `^N` cache references.

mod reader;
mod writer;

use crate::codec::{Codec, CodecError, content_type_pattern};
use conneg_core::Value;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

static TRANSIT_JSON_TYPE: Lazy<Regex> =
    Lazy::new(|| content_type_pattern(r"^application/(vnd.+)?(x-)?transit\+json"));

static TRANSIT_MSGPACK_TYPE: Lazy<Regex> =
    Lazy::new(|| content_type_pattern(r"^application/(vnd.+)?(x-)?transit\+msgpack"));

/// Turns the representation of a tagged value into a value
pub type ReadHandler = Arc<dyn Fn(Value) -> Result<Value, CodecError> + Send + Sync>;

/// Receives the tag and representation of any tag without a read handler
pub type DefaultReadHandler = Arc<dyn Fn(&str, Value) -> Result<Value, CodecError> + Send + Sync>;

/// Turns the payload of a [`Value::Tagged`] into its transit representation
pub type WriteHandler = Arc<dyn Fn(&Value) -> Result<Value, CodecError> + Send + Sync>;

/// Extension-type handlers keyed by transit tag
#[derive(Clone, Default)]
pub struct TransitHandlers {
    read: HashMap<String, ReadHandler>,
    write: HashMap<String, WriteHandler>,
    default_read: Option<DefaultReadHandler>,
}

impl TransitHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a read handler for `tag`
    pub fn with_read<F>(mut self, tag: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Value) -> Result<Value, CodecError> + Send + Sync + 'static,
    {
        self.read.insert(tag.into(), Arc::new(handler));
        self
    }

    /// Register a write handler for `Value::Tagged` values carrying `tag`
    pub fn with_write<F>(mut self, tag: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, CodecError> + Send + Sync + 'static,
    {
        self.write.insert(tag.into(), Arc::new(handler));
        self
    }

    /// Handler for tags nothing else recognizes; without one they read as
    /// [`Value::Tagged`]
    pub fn with_default_read<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str, Value) -> Result<Value, CodecError> + Send + Sync + 'static,
    {
        self.default_read = Some(Arc::new(handler));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.read.is_empty() && self.write.is_empty() && self.default_read.is_none()
    }

    pub(crate) fn read_handler(&self, tag: &str) -> Option<&ReadHandler> {
        self.read.get(tag)
    }

    pub(crate) fn write_handler(&self, tag: &str) -> Option<&WriteHandler> {
        self.write.get(tag)
    }

    pub(crate) fn default_read(&self) -> Option<&DefaultReadHandler> {
        self.default_read.as_ref()
    }
}

impl fmt::Debug for TransitHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut read: Vec<&String> = self.read.keys().collect();
        read.sort();
        let mut write: Vec<&String> = self.write.keys().collect();
        write.sort();
        f.debug_struct("TransitHandlers")
            .field("read", &read)
            .field("write", &write)
            .field("default_read", &self.default_read.is_some())
            .finish()
    }
}

/// Transit wire sub-format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitFormat {
    /// JSON; `verbose` writes maps and tags as objects and is easier to read
    Json { verbose: bool },
    MessagePack,
}

impl TransitFormat {
    fn is_json(self) -> bool {
        matches!(self, TransitFormat::Json { .. })
    }

    fn is_verbose(self) -> bool {
        matches!(self, TransitFormat::Json { verbose: true })
    }
}

/// Transit codec
#[derive(Debug, Clone)]
pub struct TransitCodec {
    format: TransitFormat,
    handlers: TransitHandlers,
}

impl TransitCodec {
    pub fn new(format: TransitFormat) -> Self {
        Self {
            format,
            handlers: TransitHandlers::default(),
        }
    }

    /// Compact transit-json
    pub fn json() -> Self {
        Self::new(TransitFormat::Json { verbose: false })
    }

    pub fn json_verbose() -> Self {
        Self::new(TransitFormat::Json { verbose: true })
    }

    pub fn msgpack() -> Self {
        Self::new(TransitFormat::MessagePack)
    }

    pub fn with_handlers(mut self, handlers: TransitHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn format(&self) -> TransitFormat {
        self.format
    }

    /// Marshal a value into its transit representation tree
    pub fn to_rep(&self, value: &Value) -> Result<Value, CodecError> {
        writer::Writer::new(&self.handlers, self.format).write_top(value)
    }

    /// Unmarshal a transit representation tree
    pub fn from_rep(&self, rep: Value) -> Result<Value, CodecError> {
        reader::Reader::new(&self.handlers).read(rep)
    }
}

impl Codec for TransitCodec {
    fn name(&self) -> &str {
        match self.format {
            TransitFormat::Json { .. } => "transit-json",
            TransitFormat::MessagePack => "transit-msgpack",
        }
    }

    fn content_type(&self) -> &str {
        match self.format {
            TransitFormat::Json { .. } => "application/transit+json",
            TransitFormat::MessagePack => "application/transit+msgpack",
        }
    }

    fn is_binary(&self) -> bool {
        true
    }

    fn can_decode(&self) -> bool {
        true
    }

    fn can_encode(&self) -> bool {
        true
    }

    fn matches(&self, content_type: &str) -> bool {
        match self.format {
            TransitFormat::Json { .. } => TRANSIT_JSON_TYPE.is_match(content_type),
            TransitFormat::MessagePack => TRANSIT_MSGPACK_TYPE.is_match(content_type),
        }
    }

    fn decode(&self, data: &[u8], _charset: &str) -> Result<Value, CodecError> {
        let rep: Value = match self.format {
            TransitFormat::Json { .. } => serde_json::from_slice(data)?,
            TransitFormat::MessagePack => rmp_serde::from_slice(data)?,
        };
        self.from_rep(rep)
    }

    fn encode(&self, value: &Value, _charset: &str) -> Result<Vec<u8>, CodecError> {
        let rep = self.to_rep(value)?;
        match self.format {
            TransitFormat::Json { .. } => Ok(serde_json::to_vec(&rep)?),
            TransitFormat::MessagePack => Ok(rmp_serde::to_vec(&rep)?),
        }
    }
}
