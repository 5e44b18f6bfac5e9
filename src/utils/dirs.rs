use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

// Default download root, relative to the working directory
pub const DATA_DIR: &str = "sec_filings";

// Provider directory under the download root
pub const EDGAR_FILINGS_DIR: &str = "sec-edgar-filings";

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

pub fn ensure_edgar_dirs(data_dir: &Path) -> Result<()> {
    ensure_dir(data_dir)?;
    ensure_dir(&data_dir.join(EDGAR_FILINGS_DIR))?;
    Ok(())
}

/// `<data_dir>/sec-edgar-filings/<registrant_id>/<filing_type>`
pub fn filing_type_dir(data_dir: &Path, registrant_id: &str, filing_type: &str) -> PathBuf {
    data_dir
        .join(EDGAR_FILINGS_DIR)
        .join(registrant_id)
        .join(filing_type)
}

pub fn accession_dir(
    data_dir: &Path,
    registrant_id: &str,
    filing_type: &str,
    accession_number: &str,
) -> PathBuf {
    filing_type_dir(data_dir, registrant_id, filing_type).join(accession_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filing_type_dir_layout() {
        let dir = filing_type_dir(Path::new("/data"), "0000036405", "NPORT-P");
        assert_eq!(
            dir,
            PathBuf::from("/data/sec-edgar-filings/0000036405/NPORT-P")
        );
    }

    #[test]
    fn test_accession_dir_nests_under_filing_type() {
        let dir = accession_dir(
            Path::new("root"),
            "0000751158",
            "N-Q",
            "0000932471-19-000123",
        );
        assert_eq!(
            dir,
            PathBuf::from("root/sec-edgar-filings/0000751158/N-Q/0000932471-19-000123")
        );
    }

    #[test]
    fn test_ensure_edgar_dirs_creates_provider_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let data_dir = tmp.path().join("downloads");
        ensure_edgar_dirs(&data_dir).unwrap();
        assert!(data_dir.join(EDGAR_FILINGS_DIR).is_dir());
    }
}
