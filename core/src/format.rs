//! Filename-based format detection. Detection looks only at the suffix so it
//! can run before any bytes are read.

/// What the filename suffix says about a file's encoding and layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFormat {
    /// File is gzip-compressed and must be decompressed before parsing.
    pub gzip: bool,
    /// File holds one JSON value per line rather than a single value.
    pub ndjson: bool,
}

/// Classify a path by its extension suffix.
pub fn sniff(path: &str) -> FileFormat {
    FileFormat {
        gzip: path.ends_with(".gz"),
        ndjson: path.ends_with(".ndjson") || path.ends_with(".ndjson.gz"),
    }
}

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const BYTES_PER_GB: f64 = 1024.0 * BYTES_PER_MB;

/// Human-readable byte count for status messages, e.g. "5242880 bytes (5.00 MB)".
pub fn human_size(bytes: u64) -> String {
    let gb = bytes as f64 / BYTES_PER_GB;
    if gb >= 1.0 {
        format!("{bytes} bytes ({gb:.2} GB)")
    } else {
        format!("{bytes} bytes ({:.2} MB)", bytes as f64 / BYTES_PER_MB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_json() {
        let f = sniff("data.json");
        assert!(!f.gzip);
        assert!(!f.ndjson);
    }

    #[test]
    fn ndjson_variants() {
        assert!(sniff("events.ndjson").ndjson);
        assert!(!sniff("events.ndjson").gzip);
        let f = sniff("events.ndjson.gz");
        assert!(f.ndjson);
        assert!(f.gzip);
    }

    #[test]
    fn gzipped_single_json() {
        let f = sniff("data.json.gz");
        assert!(f.gzip);
        assert!(!f.ndjson);
    }

    #[test]
    fn suffix_must_terminate_path() {
        // "ndjson" appearing mid-path does not make the file NDJSON.
        assert!(!sniff("ndjson-export/data.json").ndjson);
    }

    #[test]
    fn human_size_units() {
        assert_eq!(human_size(5 * 1024 * 1024), "5242880 bytes (5.00 MB)");
        assert_eq!(human_size(2 * 1024 * 1024 * 1024), "2147483648 bytes (2.00 GB)");
    }
}
