use core::{ingest, DocumentStore, LoadingProgress, SearchScan};
use std::fs;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

fn write_corpus(count: usize) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corpus.ndjson");
    let lines: Vec<String> = (0..count)
        .map(|i| {
            let parity = if i % 2 == 0 { "even" } else { "odd" };
            format!("{{\"id\":{i},\"parity\":\"{parity}\"}}")
        })
        .collect();
    fs::write(&path, lines.join("\n")).unwrap();
    (dir, path)
}

fn loaded_store(path: &PathBuf) -> DocumentStore {
    let store = DocumentStore::new();
    let progress = LoadingProgress::new();
    ingest(&store, &progress, path);
    assert!(store.is_ready());
    store
}

#[test]
fn incremental_scan_equals_full_scan_for_any_batch_limit() {
    let (_dir, path) = write_corpus(100);
    let store = loaded_store(&path);
    let expected: Vec<usize> = (0..100).filter(|i| i % 2 == 0).collect();

    for batch_limit in [1, 7, 100, 1000] {
        let mut scan = SearchScan::new(&store, "\"parity\":\"even\"");
        let mut cycles = 0;
        while !scan.advance(&store, batch_limit) {
            cycles += 1;
            assert!(cycles <= 200, "scan must terminate");
        }
        assert_eq!(scan.cursor(), store.document_count());
        assert_eq!(scan.matches(), expected.as_slice(), "batch_limit {batch_limit}");
    }
}

#[test]
fn matches_accumulate_in_ascending_order_across_slices() {
    let (_dir, path) = write_corpus(30);
    let store = loaded_store(&path);

    let mut scan = SearchScan::new(&store, "\"id\":");
    scan.advance(&store, 10);
    assert_eq!(scan.cursor(), 10);
    assert_eq!(scan.matches(), (0..10usize).collect::<Vec<_>>().as_slice());
    assert!(!scan.is_complete());

    scan.advance(&store, 10);
    scan.advance(&store, 10);
    assert!(scan.is_complete());
    assert_eq!(scan.matches(), (0..30usize).collect::<Vec<_>>().as_slice());
}

#[test]
fn no_match_query_completes_with_empty_results() {
    let (_dir, path) = write_corpus(20);
    let store = loaded_store(&path);

    let mut scan = SearchScan::new(&store, "no such substring");
    while !scan.advance(&store, 6) {}
    assert!(scan.matches().is_empty());
    assert_eq!(scan.cursor(), 20);
}

#[test]
fn empty_query_matches_everything_without_scanning() {
    let (_dir, path) = write_corpus(15);
    let store = loaded_store(&path);

    let scan = SearchScan::new(&store, "");
    assert!(scan.is_complete());
    assert_eq!(scan.matches(), (0..15usize).collect::<Vec<_>>().as_slice());

    // Advancing a completed scan is a no-op.
    let mut scan = scan;
    assert!(scan.advance(&store, 5));
    assert_eq!(scan.matches().len(), 15);
}

#[test]
fn search_is_case_sensitive_literal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("case.ndjson");
    fs::write(&path, "{\"name\":\"Alpha\"}\n{\"name\":\"alpha\"}\n{\"name\":\"ALPHA\"}\n").unwrap();
    let store = loaded_store(&path);

    let mut scan = SearchScan::new(&store, "alpha");
    while !scan.advance(&store, 10) {}
    assert_eq!(scan.matches(), &[1usize]);
}

#[test]
fn cache_capacity_never_changes_results() {
    let (_dir, path) = write_corpus(50);
    let progress = LoadingProgress::new();
    let tiny = DocumentStore::with_cache_capacity(1);
    let large = DocumentStore::with_cache_capacity(1000);
    ingest(&tiny, &progress, &path);
    ingest(&large, &progress, &path);

    for index in [0, 1, 49, 1, 0, 25, 25, 3] {
        assert_eq!(tiny.get_document(index), large.get_document(index));
    }

    let mut scan_tiny = SearchScan::new(&tiny, "\"parity\":\"odd\"");
    let mut scan_large = SearchScan::new(&large, "\"parity\":\"odd\"");
    while !scan_tiny.advance(&tiny, 9) {}
    while !scan_large.advance(&large, 9) {}
    assert_eq!(scan_tiny.matches(), scan_large.matches());
}

#[test]
fn corpus_replacement_mid_scan_discards_partial_results() {
    let (_dir, path) = write_corpus(50);
    let store = loaded_store(&path);
    let progress = LoadingProgress::new();

    let mut scan = SearchScan::new(&store, "\"id\":");
    scan.advance(&store, 10);
    assert_eq!(scan.matches().len(), 10);

    // Replace the corpus with a smaller one mid-scan.
    let dir = tempdir().unwrap();
    let small = dir.path().join("small.ndjson");
    fs::write(&small, "{\"id\":0}\n{\"id\":1}\n{\"id\":2}\n").unwrap();
    ingest(&store, &progress, &small);
    assert!(store.is_ready());

    // The next advance observes the new generation and restarts; nothing
    // from the old corpus survives.
    while !scan.advance(&store, 10) {}
    assert_eq!(scan.generation(), store.generation());
    assert_eq!(scan.matches(), &[0usize, 1, 2]);
    assert_eq!(scan.cursor(), 3);
}

#[test]
fn scan_against_reset_store_sees_empty_corpus() {
    let (_dir, path) = write_corpus(10);
    let store = loaded_store(&path);

    let mut scan = SearchScan::new(&store, "\"id\":");
    scan.advance(&store, 4);

    store.reset();
    assert!(scan.advance(&store, 4));
    assert!(scan.matches().is_empty());
    assert_eq!(scan.cursor(), 0);
}
