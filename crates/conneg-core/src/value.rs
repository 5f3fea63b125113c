//! Structured values produced by decoders and consumed by encoders

use serde::de::{self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher, RandomState};

/// Upper bound on capacity reserved from a decoder's length hint
pub const MAX_PREALLOCATION: usize = 4096;

/// A format-neutral data value
///
/// Keywords, symbols and tagged values exist so the EDN and Transit codecs
/// can round-trip their own types. Formats without those notions write a
/// keyword or symbol as its name and a tagged value as its inner value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Symbolic name, written `:name` in EDN
    Keyword(String),
    Symbol(String),
    Vector(Vec<Value>),
    Map(Map),
    /// Extension value, e.g. `#inst "..."` in EDN or `["~#inst", ...]` in Transit
    Tagged { tag: String, value: Box<Value> },
}

impl Value {
    pub fn keyword(name: impl Into<String>) -> Self {
        Value::Keyword(name.into())
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    pub fn tagged(tag: impl Into<String>, value: Value) -> Self {
        Value::Tagged {
            tag: tag.into(),
            value: Box::new(value),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Short name of the variant, for logs and error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Keyword(_) => "keyword",
            Value::Symbol(_) => "symbol",
            Value::Vector(_) => "vector",
            Value::Map(_) => "map",
            Value::Tagged { .. } => "tagged",
        }
    }

    /// Turn every string map key into a keyword, recursively
    pub fn keywordize_keys(self) -> Value {
        match self {
            Value::Map(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| {
                        let k = match k {
                            Value::String(name) => Value::Keyword(name),
                            other => other,
                        };
                        (k, v.keywordize_keys())
                    })
                    .collect(),
            ),
            Value::Vector(items) => {
                Value::Vector(items.into_iter().map(Value::keywordize_keys).collect())
            }
            Value::Tagged { tag, value } => Value::Tagged {
                tag,
                value: Box::new(value.keywordize_keys()),
            },
            other => other,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Vector(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

/// Insertion-ordered map with unique keys
///
/// Keys are indexed by a structural hash, so lookups and inserts stay
/// constant time on average. Keys compare with `PartialEq`, so a `NaN`
/// float key never matches an existing entry.
#[derive(Clone, Default)]
pub struct Map {
    entries: Vec<(Value, Value)>,
    index: HashMap<u64, Vec<usize>>,
    hasher: RandomState,
}

/// Hash/`PartialEq` agreement: equal values hash equally, `0.0` and `-0.0` included
struct KeyHash<'a>(&'a Value);

impl Hash for KeyHash<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_value(self.0, state);
    }
}

fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        Value::Nil => {}
        Value::Bool(b) => b.hash(state),
        Value::Integer(i) => i.hash(state),
        Value::Float(f) => {
            let f = if *f == 0.0 { 0.0 } else { *f };
            f.to_bits().hash(state);
        }
        Value::String(s) | Value::Keyword(s) | Value::Symbol(s) => s.hash(state),
        Value::Vector(items) => {
            items.len().hash(state);
            for item in items {
                hash_value(item, state);
            }
        }
        Value::Map(map) => {
            map.len().hash(state);
            for (k, v) in map.iter() {
                hash_value(k, state);
                hash_value(v, state);
            }
        }
        Value::Tagged { tag, value } => {
            tag.hash(state);
            hash_value(value, state);
        }
    }
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map with room for `capacity` entries, capped at
    /// [`MAX_PREALLOCATION`]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_PREALLOCATION);
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            hasher: RandomState::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key_hash(&self, key: &Value) -> u64 {
        self.hasher.hash_one(KeyHash(key))
    }

    fn position(&self, key: &Value, hash: u64) -> Option<usize> {
        self.index
            .get(&hash)?
            .iter()
            .copied()
            .find(|&i| self.entries[i].0 == *key)
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.position(key, self.key_hash(key))
            .map(|i| &self.entries[i].1)
    }

    /// Look up a string or keyword key by name
    ///
    /// When both spellings are present the earlier entry wins.
    pub fn get_named(&self, name: &str) -> Option<&Value> {
        let string = Value::String(name.to_string());
        let keyword = Value::Keyword(name.to_string());
        let found = [string, keyword]
            .iter()
            .filter_map(|key| self.position(key, self.key_hash(key)))
            .min()?;
        Some(&self.entries[found].1)
    }

    /// Insert an entry, replacing the value of an equal key in place
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        let hash = self.key_hash(&key);
        match self.position(&key, hash) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.index.entry(hash).or_default().push(self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Insert every entry of `other`, later keys winning
    pub fn merge(&mut self, other: Map) {
        for (k, v) in other {
            self.insert(k, v);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl FromIterator<(Value, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for Map {
    type Item = (Value, Value);
    type IntoIter = std::vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) | Value::Keyword(s) | Value::Symbol(s) => serializer.serialize_str(s),
            Value::Vector(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => map.serialize(serializer),
            Value::Tagged { value, .. } => value.serialize(serializer),
        }
    }
}

impl Serialize for Map {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            out.serialize_entry(k, v)?;
        }
        out.end()
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any self-describing value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(i64::try_from(v)
            .map(Value::Integer)
            .unwrap_or(Value::Float(v as f64)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Value, E> {
        Ok(Value::String(String::from_utf8_lossy(v).into_owned()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Nil)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Nil)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let capacity = seq.size_hint().unwrap_or(0).min(MAX_PREALLOCATION);
        let mut items = Vec::with_capacity(capacity);
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::Vector(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut map = Map::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((k, v)) = access.next_entry::<Value, Value>()? {
            map.insert(k, v);
        }
        Ok(Value::Map(map))
    }

    // YAML `!tag value`
    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Value, A::Error> {
        let (tag, variant) = data.variant::<String>()?;
        let value = variant.newtype_variant::<Value>()?;
        Ok(Value::tagged(tag, value))
    }
}

#[cfg(test)]
#[path = "value/value_tests.rs"]
mod value_tests;
