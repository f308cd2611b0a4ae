use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Shared ingestion progress. Written only by the ingestion pipeline and
/// polled by the host's refresh loop; counters and flags are atomics so the
/// hot polling path never contends with the pipeline's lock.
#[derive(Default)]
pub struct LoadingProgress {
    is_loading: AtomicBool,
    is_complete: AtomicBool,
    documents_loaded: AtomicU64,
    file_size_bytes: AtomicU64,
    status: Mutex<String>,
    error: Mutex<String>,
}

/// Point-in-time copy of the progress channel, safe to hold across frames.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProgressSnapshot {
    pub is_loading: bool,
    pub is_complete: bool,
    pub documents_loaded: u64,
    pub file_size_bytes: u64,
    pub status: String,
    pub error: String,
}

impl LoadingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every field back to its initial value. Called at the start of
    /// each ingestion attempt.
    pub fn reset(&self) {
        self.is_loading.store(false, Ordering::Relaxed);
        self.is_complete.store(false, Ordering::Relaxed);
        self.documents_loaded.store(0, Ordering::Relaxed);
        self.file_size_bytes.store(0, Ordering::Relaxed);
        self.status.lock().clear();
        self.error.lock().clear();
    }

    pub(crate) fn set_loading(&self, loading: bool) {
        self.is_loading.store(loading, Ordering::Relaxed);
    }

    pub(crate) fn set_complete(&self) {
        self.is_complete.store(true, Ordering::Relaxed);
    }

    pub(crate) fn set_documents_loaded(&self, count: u64) {
        self.documents_loaded.store(count, Ordering::Relaxed);
    }

    pub(crate) fn set_file_size(&self, bytes: u64) {
        self.file_size_bytes.store(bytes, Ordering::Relaxed);
    }

    pub(crate) fn set_status(&self, message: impl Into<String>) {
        *self.status.lock() = message.into();
    }

    pub(crate) fn set_error(&self, message: impl Into<String>) {
        *self.error.lock() = message.into();
    }

    pub fn has_error(&self) -> bool {
        !self.error.lock().is_empty()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            is_loading: self.is_loading.load(Ordering::Relaxed),
            is_complete: self.is_complete.load(Ordering::Relaxed),
            documents_loaded: self.documents_loaded.load(Ordering::Relaxed),
            file_size_bytes: self.file_size_bytes.load(Ordering::Relaxed),
            status: self.status.lock().clone(),
            error: self.error.lock().clone(),
        }
    }
}
