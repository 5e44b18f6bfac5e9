use std::fs;
use std::path::{Path, PathBuf};

pub fn get_test_file_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("src/edgar/parsing/tests/data")
        .join(filename)
}

pub fn read_test_file(filename: &str) -> String {
    fs::read_to_string(get_test_file_path(filename))
        .unwrap_or_else(|e| panic!("Failed to read test file {}: {}", filename, e))
}

/// Writes `content` as `<filing_dir>/<accession>/<document>`.
pub fn write_filing(filing_dir: &Path, accession: &str, document: &str, content: &str) -> PathBuf {
    let accession_dir = filing_dir.join(accession);
    fs::create_dir_all(&accession_dir).unwrap();
    let path = accession_dir.join(document);
    fs::write(&path, content).unwrap();
    path
}
