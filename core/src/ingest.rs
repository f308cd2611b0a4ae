use crate::format::{self, FileFormat};
use crate::progress::LoadingProgress;
use crate::store::DocumentStore;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use serde::de::IgnoredAny;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

const GZ_BUFFER_SIZE: usize = 128 * 1024;
const PROGRESS_INTERVAL: u64 = 100_000;

/// Runs [`ingest`] on a background thread so the caller's refresh loop is
/// never blocked. Outcome is reported through `progress` and the store's
/// readiness flag, not through the handle.
pub fn spawn_ingest(
    store: Arc<DocumentStore>,
    progress: Arc<LoadingProgress>,
    path: PathBuf,
) -> JoinHandle<()> {
    thread::spawn(move || ingest(&store, &progress, &path))
}

/// Loads `path` into the store: resets the previous corpus, reads (and
/// decompresses) the file, indexes each document's byte range, and flips the
/// store ready. Every failure is terminal for this attempt and lands in
/// `progress`'s error field; nothing is raised across the boundary because
/// the pipeline usually runs detached from its caller.
pub fn ingest(store: &DocumentStore, progress: &LoadingProgress, path: &Path) {
    store.reset();
    progress.reset();
    progress.set_loading(true);
    progress.set_status("Loading file...");

    let file_format = format::sniff(&path.to_string_lossy());

    let raw = match load_raw(path, file_format, progress) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ingestion failed");
            progress.set_error(err.to_string());
            progress.set_loading(false);
            return;
        }
    };

    progress.set_file_size(raw.len() as u64);
    progress.set_status(format!("File loaded: {}", format::human_size(raw.len() as u64)));

    if file_format.ndjson {
        index_ndjson(store, progress, raw);
    } else {
        index_single(store, progress, raw);
    }
}

fn load_raw(path: &Path, file_format: FileFormat, progress: &LoadingProgress) -> Result<String> {
    if file_format.gzip {
        progress.set_status("Decompressing gzip file...");
        return decompress_gzip(path);
    }
    let bytes =
        std::fs::read(path).with_context(|| format!("error loading {}", path.display()))?;
    String::from_utf8(bytes).context("file is not valid UTF-8")
}

fn decompress_gzip(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("error opening {}", path.display()))?;
    let mut decoder = GzDecoder::new(file);
    let mut out = Vec::new();
    let mut buf = vec![0u8; GZ_BUFFER_SIZE];
    loop {
        let n = decoder.read(&mut buf).context("error decompressing gzip stream")?;
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    String::from_utf8(out).context("decompressed file is not valid UTF-8")
}

/// Streams whitespace-delimited top-level JSON values, recording each value's
/// byte range without materializing it. A malformed record stops the stream
/// but keeps everything indexed so far queryable.
fn index_ndjson(store: &DocumentStore, progress: &LoadingProgress, raw: String) {
    progress.set_status("NDJSON detected, streaming...");

    let mut count: u64 = 0;
    let mut failure = None;
    let mut stream = serde_json::Deserializer::from_str(&raw).into_iter::<IgnoredAny>();
    loop {
        let start = stream.byte_offset();
        match stream.next() {
            None => break,
            Some(Ok(_)) => {
                // byte_offset stops exactly past the value; the slice's
                // leading delimiter whitespace is trimmed off the range.
                let end = stream.byte_offset();
                let slice = &raw[start..end];
                let lead = slice.len()
                    - slice.trim_start_matches(|c: char| c.is_ascii_whitespace()).len();
                store.push_range((start + lead) as u64, (end - start - lead) as u64);
                count += 1;
                progress.set_documents_loaded(count);
                if count % PROGRESS_INTERVAL == 0 {
                    progress.set_status(format!("Processed {count} documents..."));
                }
            }
            Some(Err(err)) => {
                failure = Some(format!("error at document {count}: {err}"));
                break;
            }
        }
    }
    drop(stream);

    store.set_raw(raw);
    store.set_ready();

    match failure {
        Some(message) => {
            tracing::warn!(documents = count, error = %message, "ndjson stream aborted");
            progress.set_error(message);
            progress.set_status(format!("Stopped after {count} documents"));
        }
        None => {
            tracing::info!(documents = count, "ndjson stream indexed");
            progress.set_status(format!("Complete! Total: {count} documents"));
            progress.set_complete();
        }
    }
    progress.set_loading(false);
}

/// Validates the whole buffer as one JSON value; the index gets a single
/// range spanning the buffer.
fn index_single(store: &DocumentStore, progress: &LoadingProgress, raw: String) {
    if let Err(err) = serde_json::from_str::<IgnoredAny>(&raw) {
        progress.set_error(format!("error parsing JSON: {err}"));
        progress.set_loading(false);
        return;
    }

    store.push_range(0, raw.len() as u64);
    store.set_raw(raw);
    store.set_ready();

    tracing::info!("single document parsed");
    progress.set_documents_loaded(1);
    progress.set_status("Parsed successfully");
    progress.set_complete();
    progress.set_loading(false);
}
