//! Verse cache for repeat builds.
//!
//! Every page build needs one round trip to the verse service. Passages never
//! change, so repeat builds can reuse what an earlier build fetched. This
//! module persists fetched [`VerseContent`] between builds and wraps any
//! [`VerseSource`] so cache hits skip the network entirely.
//!
//! # Cache keys
//!
//! Entries are keyed by SHA-256 of the source origin (the service base URL)
//! and the reference string, NUL-separated. The reference already encodes
//! book, chapter and verse range, so editing a catalog entry's range misses
//! the cache, while renaming its title does not. Pointing the build at another
//! service changes the origin and therefore every key.
//!
//! # Storage
//!
//! The cache lives at `<output_dir>/.verse-cache.json` so it travels with the
//! generated site when the output directory is cached in CI.
//!
//! # Bypassing the cache
//!
//! `build --no-cache` starts from an empty cache. Every passage is fetched and
//! the file is rewritten with fresh entries.

use crate::types::VerseContent;
use crate::verse::{VerseError, VerseSource};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Name of the cache file within the output directory.
const CACHE_FILENAME: &str = ".verse-cache.json";

/// Bump to invalidate existing caches when the format or key changes.
const CACHE_VERSION: u32 = 1;

/// On-disk verse cache.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct VerseCache {
    pub version: u32,
    pub entries: HashMap<String, VerseContent>,
}

impl VerseCache {
    /// Create an empty cache (used for `--no-cache` or first build).
    pub fn empty() -> Self {
        Self {
            version: CACHE_VERSION,
            entries: HashMap::new(),
        }
    }

    /// Load from the output directory. Returns an empty cache if the file
    /// doesn't exist or can't be parsed (version mismatch, corruption).
    pub fn load(output_dir: &Path) -> Self {
        let content = match std::fs::read_to_string(cache_path(output_dir)) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        let cache: Self = match serde_json::from_str(&content) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        if cache.version != CACHE_VERSION {
            return Self::empty();
        }
        cache
    }

    /// Save to the output directory.
    pub fn save(&self, output_dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(cache_path(output_dir), json)
    }

    pub fn get(&self, key: &str) -> Option<&VerseContent> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, content: VerseContent) {
        self.entries.insert(key, content);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// SHA-256 cache key for a reference fetched from `origin`.
pub fn cache_key(origin: &str, reference: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(origin.as_bytes());
    hasher.update(b"\0");
    hasher.update(reference.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Resolve the cache file path for an output directory.
pub fn cache_path(output_dir: &Path) -> PathBuf {
    output_dir.join(CACHE_FILENAME)
}

/// Summary of cache performance for a build run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn total(&self) -> u32 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} fetched ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        } else {
            write!(f, "{} fetched", self.misses)
        }
    }
}

/// Wraps a [`VerseSource`] with a shared [`VerseCache`].
///
/// Uses `Mutex` so the wrapper stays `Sync` for rayon's `par_iter`. The lock
/// is never held across a network call.
pub struct CachedVerseSource<S> {
    inner: S,
    cache: Mutex<VerseCache>,
    stats: Mutex<CacheStats>,
}

impl<S: VerseSource> CachedVerseSource<S> {
    pub fn new(inner: S, cache: VerseCache) -> Self {
        Self {
            inner,
            cache: Mutex::new(cache),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    pub fn stats(&self) -> CacheStats {
        *self.stats.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Consume the wrapper and return the (possibly extended) cache.
    pub fn into_cache(self) -> VerseCache {
        self.cache.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<S: VerseSource> VerseSource for CachedVerseSource<S> {
    fn fetch(&self, reference: &str) -> Result<VerseContent, VerseError> {
        let key = cache_key(self.inner.origin(), reference);

        let cached = self
            .cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
            .cloned();
        if let Some(content) = cached {
            self.stats.lock().unwrap_or_else(|e| e.into_inner()).hits += 1;
            return Ok(content);
        }

        let content = self.inner.fetch(reference)?;
        self.stats.lock().unwrap_or_else(|e| e.into_inner()).misses += 1;
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, content.clone());
        Ok(content)
    }

    fn origin(&self) -> &str {
        self.inner.origin()
    }
}
