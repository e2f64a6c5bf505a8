//! Test utilities for scanfill-rs
// Writes vertex files into temporary locations for loader tests.

use std::io::Write;
use tempfile::NamedTempFile;

/// Write raw vertex file contents to a temp file with the given suffix (e.g. ".txt").
pub fn write_temp_vertices(contents: &[u8], suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

/// Same as [`write_temp_vertices`] but gzip-compressed; the suffix should end in ".gz".
pub fn write_temp_gz(contents: &[u8], suffix: &str) -> NamedTempFile {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(contents).unwrap();
    let compressed = encoder.finish().unwrap();
    write_temp_vertices(&compressed, suffix)
}
