use super::TransitHandlers;
use crate::codec::CodecError;
use conneg_core::{Map, Value};
use tracing::trace;

const CACHE_CODE_DIGITS: usize = 44;
const BASE_CHAR_INDEX: u32 = 48;
const MAX_CACHE_ENTRIES: usize = CACHE_CODE_DIGITS * CACHE_CODE_DIGITS;
const MIN_CACHEABLE_LENGTH: usize = 4;
const MAP_MARKER: &str = "^ ";

pub(super) struct Reader<'a> {
    handlers: &'a TransitHandlers,
    cache: Vec<String>,
}

impl<'a> Reader<'a> {
    pub(super) fn new(handlers: &'a TransitHandlers) -> Self {
        Self {
            handlers,
            cache: Vec::new(),
        }
    }

    pub(super) fn read(&mut self, rep: Value) -> Result<Value, CodecError> {
        self.decode(rep)
    }

    fn decode(&mut self, rep: Value) -> Result<Value, CodecError> {
        match rep {
            Value::String(s) => {
                let s = self.resolve(s, false)?;
                self.parse_string(&s)
            }
            Value::Vector(items) => self.decode_array(items),
            Value::Map(map) => self.decode_map(map),
            other => Ok(other),
        }
    }

    fn decode_key(&mut self, key: Value) -> Result<Value, CodecError> {
        match key {
            Value::String(s) => {
                let s = self.resolve(s, true)?;
                self.parse_string(&s)
            }
            other => self.decode(other),
        }
    }

    fn decode_array(&mut self, items: Vec<Value>) -> Result<Value, CodecError> {
        let mut items = items.into_iter();
        let first = match items.next() {
            None => return Ok(Value::Vector(Vec::new())),
            Some(Value::String(s)) if s == MAP_MARKER => return self.decode_pairs(items),
            Some(Value::String(s)) => self.resolve(s, false)?,
            Some(other) => {
                let mut out = vec![self.decode(other)?];
                for item in items {
                    out.push(self.decode(item)?);
                }
                return Ok(Value::Vector(out));
            }
        };

        if let Some(tag) = first.strip_prefix("~#")
            && items.len() == 1
            && let Some(rep) = items.next()
        {
            let rep = self.decode(rep)?;
            return self.tagged(tag, rep);
        }

        let mut out = Vec::with_capacity(1 + items.len());
        out.push(self.parse_string(&first)?);
        for item in items {
            out.push(self.decode(item)?);
        }
        Ok(Value::Vector(out))
    }

    fn decode_pairs(&mut self, mut items: impl ExactSizeIterator<Item = Value>) -> Result<Value, CodecError> {
        if items.len() % 2 != 0 {
            return Err(CodecError::InvalidFormat(
                "transit map has an odd number of entries".to_string(),
            ));
        }
        let mut map = Map::with_capacity(items.len() / 2);
        while let (Some(k), Some(v)) = (items.next(), items.next()) {
            let key = self.decode_key(k)?;
            let value = self.decode(v)?;
            map.insert(key, value);
        }
        Ok(Value::Map(map))
    }

    fn decode_map(&mut self, map: Map) -> Result<Value, CodecError> {
        let single = map.len() == 1;
        let mut out = Map::with_capacity(map.len());
        for (k, v) in map {
            let key = match k {
                Value::String(s) => self.resolve(s, true)?,
                other => {
                    let key = self.decode(other)?;
                    out.insert(key, self.decode(v)?);
                    continue;
                }
            };
            // verbose form of a tagged value
            if single && let Some(tag) = key.strip_prefix("~#") {
                let rep = self.decode(v)?;
                return self.tagged(tag, rep);
            }
            let key = self.parse_string(&key)?;
            out.insert(key, self.decode(v)?);
        }
        Ok(Value::Map(out))
    }

    /// Expand a cache reference or record a cacheable string
    fn resolve(&mut self, s: String, as_key: bool) -> Result<String, CodecError> {
        if is_cache_ref(&s) {
            let index = cache_index(&s[1..]).ok_or_else(|| invalid_ref(&s))?;
            return self.cache.get(index).cloned().ok_or_else(|| invalid_ref(&s));
        }
        if is_cacheable(&s, as_key) {
            if self.cache.len() == MAX_CACHE_ENTRIES {
                self.cache.clear();
            }
            self.cache.push(s.clone());
        }
        Ok(s)
    }

    fn parse_string(&self, s: &str) -> Result<Value, CodecError> {
        let mut chars = s.chars();
        if chars.next() != Some('~') {
            return Ok(Value::String(s.to_string()));
        }
        let Some(tag) = chars.next() else {
            return Ok(Value::String(s.to_string()));
        };
        let rest = chars.as_str();
        match tag {
            '~' | '^' | '`' => Ok(Value::String(s[1..].to_string())),
            '_' => Ok(Value::Nil),
            '?' => Ok(Value::Bool(rest == "t")),
            ':' => Ok(Value::Keyword(rest.to_string())),
            '$' => Ok(Value::Symbol(rest.to_string())),
            'i' | 'n' => match rest.parse::<i64>() {
                Ok(i) => Ok(Value::Integer(i)),
                Err(_) => rest
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| invalid_scalar(s)),
            },
            'd' | 'f' => rest
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| invalid_scalar(s)),
            'z' => match rest {
                "NaN" => Ok(Value::Float(f64::NAN)),
                "INF" => Ok(Value::Float(f64::INFINITY)),
                "-INF" => Ok(Value::Float(f64::NEG_INFINITY)),
                _ => Err(invalid_scalar(s)),
            },
            'c' => Ok(Value::String(rest.to_string())),
            '#' => Ok(Value::String(s.to_string())),
            other => self.tagged(&other.to_string(), Value::String(rest.to_string())),
        }
    }

    fn tagged(&self, tag: &str, rep: Value) -> Result<Value, CodecError> {
        if tag == "'" {
            return Ok(rep);
        }
        if let Some(handler) = self.handlers.read_handler(tag) {
            return handler(rep);
        }
        match (tag, rep) {
            ("cmap", Value::Vector(items)) => {
                if items.len() % 2 != 0 {
                    return Err(CodecError::InvalidFormat(
                        "transit cmap has an odd number of entries".to_string(),
                    ));
                }
                let mut map = Map::with_capacity(items.len() / 2);
                let mut items = items.into_iter();
                while let (Some(k), Some(v)) = (items.next(), items.next()) {
                    map.insert(k, v);
                }
                Ok(Value::Map(map))
            }
            ("set" | "list", Value::Vector(items)) => Ok(Value::Vector(items)),
            (tag, rep) => match self.handlers.default_read() {
                Some(handler) => handler(tag, rep),
                None => {
                    trace!(tag, "no transit read handler, keeping tagged value");
                    Ok(Value::tagged(tag, rep))
                }
            },
        }
    }
}

fn is_cache_ref(s: &str) -> bool {
    s.starts_with('^') && s != MAP_MARKER && (2..=3).contains(&s.len())
}

fn is_cacheable(s: &str, as_key: bool) -> bool {
    s.len() >= MIN_CACHEABLE_LENGTH
        && (as_key || s.starts_with("~:") || s.starts_with("~$") || s.starts_with("~#"))
}

fn cache_index(code: &str) -> Option<usize> {
    let digit = |c: char| -> Option<usize> {
        let d = (c as u32).checked_sub(BASE_CHAR_INDEX)? as usize;
        (d < CACHE_CODE_DIGITS).then_some(d)
    };
    let mut chars = code.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(a), None, None) => digit(a),
        (Some(a), Some(b), None) => Some(digit(a)? * CACHE_CODE_DIGITS + digit(b)?),
        _ => None,
    }
}

fn invalid_ref(s: &str) -> CodecError {
    CodecError::InvalidFormat(format!("unknown transit cache reference {s}"))
}

fn invalid_scalar(s: &str) -> CodecError {
    CodecError::InvalidFormat(format!("invalid transit scalar {s}"))
}
