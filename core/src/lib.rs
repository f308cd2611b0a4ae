pub mod format;
pub mod ingest;
pub mod progress;
pub mod search;
pub mod store;

pub use format::{human_size, sniff, FileFormat};
pub use ingest::{ingest, spawn_ingest};
pub use progress::{LoadingProgress, ProgressSnapshot};
pub use search::{SearchScan, SEARCH_BATCH_SIZE};
pub use store::{DocumentRange, DocumentStore, CACHE_SIZE};
