//! Holdings extraction from downloaded fund filings.
//!
//! A filing directory (`.../<registrant>/<filing type>`) holds one directory
//! per accession. The newest accession is read, preferring a standalone XML
//! document and falling back to the XML embedded in the complete text
//! submission.

pub mod error;
mod envelope;
mod index;
mod nport;
mod resolve;
pub mod text;
pub mod types;

#[cfg(test)]
pub(crate) mod tests;

use log::{error, info};
use std::path::Path;

pub use envelope::extract_xml;
pub use error::ParseError;
pub use index::LocalNameIndex;
pub use nport::parse_document;
pub use resolve::{
    latest_accession_dir, resolve_document, CandidateDocument, DIRECT_DOCUMENT_NAMES,
    SUBMISSION_ENVELOPE_NAME,
};
pub use types::{FilingMetadata, HoldingRecord, ParsedFiling};

/// Parses the newest filing under `filing_dir`, reporting why it failed.
pub fn parse_filing_dir(filing_dir: &Path) -> Result<ParsedFiling, ParseError> {
    let accession_dir = latest_accession_dir(filing_dir)?;
    let candidate = resolve_document(&accession_dir)?;

    let content =
        text::read_filing_text(&candidate.path).map_err(|e| ParseError::io(&candidate.path, e))?;

    let xml = if candidate.direct {
        info!("Parsing XML file: {:?}", candidate.path);
        content.as_str()
    } else {
        info!("Parsing text submission file: {:?}", candidate.path);
        extract_xml(&content)
            .ok_or_else(|| ParseError::EnvelopeExtractionFailed(candidate.path.clone()))?
    };

    parse_document(xml).map_err(|source| ParseError::MalformedDocument {
        path: candidate.path.clone(),
        source,
    })
}

/// Like [`parse_filing_dir`], but every failure becomes the empty
/// "not found" result after being logged.
pub fn parse_nport_filing(filing_dir: &Path) -> ParsedFiling {
    match parse_filing_dir(filing_dir) {
        Ok(filing) => filing,
        Err(e) => {
            error!("Could not parse filing in {:?}: {}", filing_dir, e);
            ParsedFiling::not_found()
        }
    }
}
