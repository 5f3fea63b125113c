//! Bounded memoization of header parsing

use crate::error::ParseError;
use crate::media_type::{CharsetPreference, MediaType, parse_accept, parse_accept_charset};
use lru::LruCache;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Default number of distinct header strings remembered per cache
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// LRU cache keyed by raw header string
///
/// Parsing is a pure function of its input, so racing inserts and evictions
/// only cost a re-parse. The lock is never held while parsing.
pub struct ParseCache<V> {
    entries: Mutex<LruCache<String, V>>,
}

impl<V: Clone> ParseCache<V> {
    /// Create a cache holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Return the cached value for `key`, or compute and remember it
    ///
    /// Errors from `parse` are returned as-is and not remembered.
    pub fn get_or_try_insert<E>(
        &self,
        key: &str,
        parse: impl FnOnce(&str) -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(hit) = self.entries.lock().get(key) {
            tracing::trace!(key, "parse cache hit");
            return Ok(hit.clone());
        }

        let value = parse(key)?;
        self.entries.lock().put(key.to_string(), value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains(key)
    }

    /// Drop every cached entry
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl<V> fmt::Debug for ParseCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.lock();
        f.debug_struct("ParseCache")
            .field("len", &entries.len())
            .field("capacity", &entries.cap())
            .finish()
    }
}

/// Memoizing front end for [`parse_accept`]
#[derive(Debug)]
pub struct AcceptParser {
    cache: ParseCache<Arc<[MediaType]>>,
}

impl AcceptParser {
    /// Create an isolated parser with its own cache
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: ParseCache::new(capacity),
        }
    }

    /// Get the process-wide parser
    pub fn global() -> Arc<AcceptParser> {
        static INSTANCE: OnceCell<Arc<AcceptParser>> = OnceCell::new();
        INSTANCE
            .get_or_init(|| Arc::new(AcceptParser::default()))
            .clone()
    }

    /// Parse an `Accept` header, reusing an earlier result for the same string
    pub fn parse(&self, header: &str) -> Result<Arc<[MediaType]>, ParseError> {
        self.cache
            .get_or_try_insert(header, |h| parse_accept(h).map(Arc::from))
    }

    pub fn cache(&self) -> &ParseCache<Arc<[MediaType]>> {
        &self.cache
    }
}

impl Default for AcceptParser {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

/// Memoizing front end for [`parse_accept_charset`]
#[derive(Debug)]
pub struct CharsetPreferenceParser {
    cache: ParseCache<Arc<[CharsetPreference]>>,
}

impl CharsetPreferenceParser {
    /// Create an isolated parser with its own cache
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: ParseCache::new(capacity),
        }
    }

    /// Get the process-wide parser
    pub fn global() -> Arc<CharsetPreferenceParser> {
        static INSTANCE: OnceCell<Arc<CharsetPreferenceParser>> = OnceCell::new();
        INSTANCE
            .get_or_init(|| Arc::new(CharsetPreferenceParser::default()))
            .clone()
    }

    /// Parse an `Accept-Charset` header, reusing an earlier result for the same string
    pub fn parse(&self, header: &str) -> Arc<[CharsetPreference]> {
        let parsed: Result<_, std::convert::Infallible> = self
            .cache
            .get_or_try_insert(header, |h| Ok(Arc::from(parse_accept_charset(h))));
        match parsed {
            Ok(prefs) => prefs,
            Err(never) => match never {},
        }
    }

    pub fn cache(&self) -> &ParseCache<Arc<[CharsetPreference]>> {
        &self.cache
    }
}

impl Default for CharsetPreferenceParser {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
