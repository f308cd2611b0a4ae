use crate::store::DocumentStore;

/// Documents examined per `advance` call unless the caller overrides it.
pub const SEARCH_BATCH_SIZE: usize = 1000;

/// Resumable, time-sliced substring scan over one corpus generation.
///
/// The caller drives [`SearchScan::advance`] once per refresh cycle; each
/// call does at most one batch of work, so the refresh loop stays responsive
/// however large the corpus is. Matches accumulate in ascending document
/// order. A generation change observed during `advance` discards the partial
/// scan wholesale and restarts against the current corpus.
pub struct SearchScan {
    query: String,
    generation: u64,
    cursor: usize,
    matches: Vec<usize>,
    complete: bool,
}

impl SearchScan {
    /// Starts a scan for a literal, case-sensitive substring. An empty query
    /// matches every document and completes immediately with no documents
    /// materialized.
    pub fn new(store: &DocumentStore, query: impl Into<String>) -> Self {
        let mut scan = SearchScan {
            query: query.into(),
            generation: store.generation(),
            cursor: 0,
            matches: Vec::new(),
            complete: false,
        };
        if scan.query.is_empty() {
            let count = store.document_count();
            scan.matches.extend(0..count);
            scan.cursor = count;
            scan.complete = true;
        }
        scan
    }

    /// Scans at most `batch_limit` further documents, appending matching
    /// indices. Returns true once the cursor has reached the document count
    /// for the store's current generation.
    pub fn advance(&mut self, store: &DocumentStore, batch_limit: usize) -> bool {
        let generation = store.generation();
        if generation != self.generation {
            // The corpus was replaced under us; partial results refer to
            // destroyed ranges and must not survive.
            self.generation = generation;
            self.cursor = 0;
            self.matches.clear();
            self.complete = false;
        }
        if self.complete {
            return true;
        }

        let count = store.document_count();
        let end = self.cursor.saturating_add(batch_limit).min(count);
        for index in self.cursor..end {
            if store.get_document(index).contains(&self.query) {
                self.matches.push(index);
            }
        }
        self.cursor = end;
        self.complete = self.cursor >= count;
        self.complete
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Next document index to examine; equals the document count once the
    /// scan is complete.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Matching document indices found so far, in ascending order.
    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
