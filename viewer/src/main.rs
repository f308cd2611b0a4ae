use anyhow::Result;
use clap::Parser;
use core::{spawn_ingest, DocumentStore, LoadingProgress, SearchScan, SEARCH_BATCH_SIZE};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "viewer")]
#[command(about = "Load a JSON/NDJSON file and search its documents", long_about = None)]
struct Args {
    /// File to load: .json or .ndjson, optionally gzip-compressed (.gz)
    #[arg(long)]
    file: PathBuf,
    /// Substring to search for; omit to just load and summarize
    #[arg(long)]
    query: Option<String>,
    /// Documents scanned per refresh cycle
    #[arg(long, default_value_t = SEARCH_BATCH_SIZE)]
    batch: usize,
    /// Pretty-print matching documents
    #[arg(long, default_value_t = false)]
    pretty: bool,
    /// Number of matching documents to print
    #[arg(long, default_value_t = 3)]
    show: usize,
    /// Poll interval for the refresh loop, in milliseconds
    #[arg(long, default_value_t = 50)]
    poll_ms: u64,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let store = Arc::new(DocumentStore::new());
    let progress = Arc::new(LoadingProgress::new());
    let handle = spawn_ingest(store.clone(), progress.clone(), args.file.clone());
    tracing::info!(file = %args.file.display(), "ingestion started");

    // Poll the progress channel the way a UI refresh loop would.
    let mut last_status = String::new();
    loop {
        let snap = progress.snapshot();
        if snap.status != last_status && !snap.status.is_empty() {
            println!("{}", snap.status);
            last_status = snap.status;
        }
        if snap.is_complete || !snap.error.is_empty() {
            break;
        }
        std::thread::sleep(Duration::from_millis(args.poll_ms));
    }
    handle.join().ok();

    let snap = progress.snapshot();
    if !snap.error.is_empty() {
        eprintln!("error: {}", snap.error);
    }
    if !store.is_ready() {
        std::process::exit(1);
    }
    println!("{} documents loaded", store.document_count());

    if let Some(query) = args.query {
        let total = store.document_count();
        let mut scan = SearchScan::new(&store, query);
        let mut cycles = 0u64;
        while !scan.advance(&store, args.batch) {
            cycles += 1;
            if cycles % 100 == 0 {
                println!(
                    "searched {} / {} documents, {} matches",
                    scan.cursor(),
                    total,
                    scan.matches().len()
                );
            }
        }
        println!("{} matches for {:?}", scan.matches().len(), scan.query());

        for &index in scan.matches().iter().take(args.show) {
            let text = store.get_document(index);
            println!("--- document {index} ---");
            if args.pretty {
                println!("{}", format_json(&text));
            } else {
                println!("{text}");
            }
        }
    }

    if !snap.error.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

/// Pretty-print a raw JSON document; input that does not parse comes back
/// unchanged.
fn format_json(raw: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}
