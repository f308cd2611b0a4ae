use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Default number of recently accessed documents kept materialized.
pub const CACHE_SIZE: usize = 100;

/// Half-open byte interval into the raw corpus buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentRange {
    pub offset: u64,
    pub length: u64,
}

struct StoreInner {
    raw: String,
    index: Vec<DocumentRange>,
    cache: LruCache<usize, String>,
    cache_capacity: NonZeroUsize,
}

/// Owns the raw corpus buffer, the ordered byte-range index, and an LRU cache
/// of recently extracted documents.
///
/// All mutation goes through the inner mutex; the readiness flag and
/// generation counter sit outside it so per-frame polling never blocks on the
/// ingestion thread. Readiness flips on only after the index for the current
/// generation is fully populated.
pub struct DocumentStore {
    inner: Mutex<StoreInner>,
    ready: AtomicBool,
    generation: AtomicU64,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::with_cache_capacity(CACHE_SIZE)
    }

    /// A store with a custom cache capacity. The cache is a pure performance
    /// layer: capacity changes hit rates, never results.
    pub fn with_cache_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        DocumentStore {
            inner: Mutex::new(StoreInner {
                raw: String::new(),
                index: Vec::new(),
                cache: LruCache::new(capacity),
                cache_capacity: capacity,
            }),
            ready: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    /// Drops the corpus, index, and cache, and bumps the generation exactly
    /// once. Readers still holding text extracted before the reset keep a
    /// self-consistent copy; they can detect the replacement via
    /// [`DocumentStore::generation`].
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        self.ready.store(false, Ordering::Release);
        inner.raw = String::new();
        inner.index.clear();
        inner.cache = LruCache::new(inner.cache_capacity);
        self.generation.fetch_add(1, Ordering::Release);
    }

    /// Publishes the raw corpus buffer. Ingestion-side mutator.
    pub fn set_raw(&self, raw: String) {
        self.inner.lock().raw = raw;
    }

    /// Appends one document's byte range. Ingestion-side mutator; each call
    /// is atomic with respect to concurrent readers.
    pub fn push_range(&self, offset: u64, length: u64) {
        self.inner.lock().index.push(DocumentRange { offset, length });
    }

    /// Marks the corpus queryable. Must only be called once the index for
    /// this generation is fully populated.
    pub fn set_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn document_count(&self) -> usize {
        self.inner.lock().index.len()
    }

    /// Raw text of the document at `index`, with an LRU cache in front of the
    /// buffer slice. Out-of-range indices and an unloaded corpus are normal
    /// query outcomes and return an empty string.
    pub fn get_document(&self, index: usize) -> String {
        let mut inner = self.inner.lock();
        if let Some(text) = inner.cache.get(&index) {
            return text.clone();
        }

        let Some(range) = inner.index.get(index).copied() else {
            return String::new();
        };
        let start = range.offset as usize;
        let end = start.saturating_add(range.length as usize);
        let Some(text) = inner.raw.get(start..end).map(str::to_string) else {
            return String::new();
        };

        inner.cache.put(index, text.clone());
        text
    }

    /// Whether `index` currently sits in the cache, without touching its
    /// recency. Instrumentation for eviction tests.
    pub fn is_cached(&self, index: usize) -> bool {
        self.inner.lock().cache.contains(&index)
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}
