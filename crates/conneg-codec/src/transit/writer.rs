use super::{TransitFormat, TransitHandlers};
use crate::codec::CodecError;
use conneg_core::{Map, Value};

/// Largest integer a JSON reader is guaranteed to hold exactly
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

pub(super) struct Writer<'a> {
    handlers: &'a TransitHandlers,
    format: TransitFormat,
}

impl<'a> Writer<'a> {
    pub(super) fn new(handlers: &'a TransitHandlers, format: TransitFormat) -> Self {
        Self { handlers, format }
    }

    /// Marshal a whole document; scalars are wrapped in a quote tag
    pub(super) fn write_top(&self, value: &Value) -> Result<Value, CodecError> {
        let rep = self.marshal(value)?;
        match rep {
            Value::Vector(_) | Value::Map(_) => Ok(rep),
            scalar => Ok(self.tag_rep("'", scalar)),
        }
    }

    fn marshal(&self, value: &Value) -> Result<Value, CodecError> {
        Ok(match value {
            Value::Nil => Value::Nil,
            Value::Bool(b) => Value::Bool(*b),
            Value::Integer(i) => self.integer(*i),
            Value::Float(f) => float_rep(*f),
            Value::String(s) => Value::String(escape(s)),
            Value::Keyword(name) => Value::String(format!("~:{name}")),
            Value::Symbol(name) => Value::String(format!("~${name}")),
            Value::Vector(items) => Value::Vector(
                items
                    .iter()
                    .map(|item| self.marshal(item))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Map(map) => self.map(map)?,
            Value::Tagged { tag, value } => self.tagged(tag, value)?,
        })
    }

    fn integer(&self, i: i64) -> Value {
        if self.format.is_json() && i.unsigned_abs() > MAX_SAFE_INTEGER {
            Value::String(format!("~i{i}"))
        } else {
            Value::Integer(i)
        }
    }

    fn map(&self, map: &Map) -> Result<Value, CodecError> {
        let keys: Option<Vec<String>> = map.keys().map(key_rep).collect();
        let Some(keys) = keys else {
            // composite keys
            let mut items = Vec::with_capacity(map.len() * 2);
            for (k, v) in map.iter() {
                items.push(self.marshal(k)?);
                items.push(self.marshal(v)?);
            }
            return Ok(self.tag_rep("cmap", Value::Vector(items)));
        };

        if matches!(self.format, TransitFormat::Json { verbose: false }) {
            let mut items = Vec::with_capacity(1 + map.len() * 2);
            items.push(Value::from("^ "));
            for (key, (_, v)) in keys.into_iter().zip(map.iter()) {
                items.push(Value::String(key));
                items.push(self.marshal(v)?);
            }
            Ok(Value::Vector(items))
        } else {
            let mut out = Map::with_capacity(map.len());
            for (key, (_, v)) in keys.into_iter().zip(map.iter()) {
                out.insert(key, self.marshal(v)?);
            }
            Ok(Value::Map(out))
        }
    }

    fn tagged(&self, tag: &str, value: &Value) -> Result<Value, CodecError> {
        let rep = match self.handlers.write_handler(tag) {
            Some(handler) => self.marshal(&handler(value)?)?,
            None => self.marshal(value)?,
        };
        Ok(self.tag_rep(tag, rep))
    }

    fn tag_rep(&self, tag: &str, rep: Value) -> Value {
        let tag = format!("~#{tag}");
        if self.format.is_verbose() {
            let mut map = Map::with_capacity(1);
            map.insert(tag, rep);
            Value::Map(map)
        } else {
            Value::Vector(vec![Value::String(tag), rep])
        }
    }
}

fn escape(s: &str) -> String {
    if s.starts_with(['~', '^', '`']) {
        format!("~{s}")
    } else {
        s.to_string()
    }
}

fn float_rep(f: f64) -> Value {
    if f.is_nan() {
        Value::from("~zNaN")
    } else if f.is_infinite() {
        Value::from(if f > 0.0 { "~zINF" } else { "~z-INF" })
    } else {
        Value::Float(f)
    }
}

/// String form of a map key, or `None` when the key is composite
fn key_rep(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(escape(s)),
        Value::Keyword(name) => Some(format!("~:{name}")),
        Value::Symbol(name) => Some(format!("~${name}")),
        Value::Nil => Some("~_".to_string()),
        Value::Bool(b) => Some(if *b { "~?t" } else { "~?f" }.to_string()),
        Value::Integer(i) => Some(format!("~i{i}")),
        Value::Float(f) => match float_rep(*f) {
            Value::String(special) => Some(special),
            _ => Some(format!("~d{f:?}")),
        },
        Value::Vector(_) | Value::Map(_) | Value::Tagged { .. } => None,
    }
}
