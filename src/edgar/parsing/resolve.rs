use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use super::error::ParseError;

/// Conventional names for a standalone holdings document, most preferred first.
pub const DIRECT_DOCUMENT_NAMES: [&str; 3] = ["primary_doc.xml", "formNPORT-P.xml", "NPORT-P.xml"];

/// The complete text submission written next to the documents.
pub const SUBMISSION_ENVELOPE_NAME: &str = "full-submission.txt";

const XML_EXTENSION: &str = "xml";

/// The file chosen for parsing, and whether it is XML as-is or a text
/// submission the XML must be extracted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateDocument {
    pub path: PathBuf,
    pub direct: bool,
}

/// Picks the accession directory with the greatest name.
///
/// Accession numbers are zero-padded and issued in sequence, so the greatest
/// name is taken as the most recent filing.
pub fn latest_accession_dir(filing_dir: &Path) -> Result<PathBuf, ParseError> {
    if !filing_dir.is_dir() {
        return Err(ParseError::DirectoryNotFound(filing_dir.to_path_buf()));
    }

    let entries = fs::read_dir(filing_dir).map_err(|e| ParseError::io(filing_dir, e))?;
    let latest = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .max()
        .ok_or_else(|| ParseError::NoAccession(filing_dir.to_path_buf()))?;

    debug!("Using accession directory {}", latest);
    Ok(filing_dir.join(latest))
}

/// Direct document by conventional name, then the text submission, then any
/// `.xml` file in the directory.
pub fn resolve_document(accession_dir: &Path) -> Result<CandidateDocument, ParseError> {
    for name in DIRECT_DOCUMENT_NAMES {
        let path = accession_dir.join(name);
        if path.is_file() {
            info!("Found preferred XML file: {:?}", path);
            return Ok(CandidateDocument { path, direct: true });
        }
    }

    let envelope = accession_dir.join(SUBMISSION_ENVELOPE_NAME);
    if envelope.is_file() {
        info!("Found text submission file: {:?}", envelope);
        return Ok(CandidateDocument {
            path: envelope,
            direct: false,
        });
    }

    let entries = fs::read_dir(accession_dir).map_err(|e| ParseError::io(accession_dir, e))?;
    let mut xml_files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == XML_EXTENSION))
        .collect();
    xml_files.sort();

    match xml_files.into_iter().next() {
        Some(path) => {
            info!("Found other XML file: {:?}", path);
            Ok(CandidateDocument { path, direct: true })
        }
        None => Err(ParseError::DocumentNotFound(accession_dir.to_path_buf())),
    }
}
