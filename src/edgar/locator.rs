use log::{info, warn};
use std::path::PathBuf;

use super::filing::FilingRetriever;
use super::filing_type::FilingType;
use crate::utils::dirs;

/// Finds the directory holding the most recent filing of the most preferred
/// type a registrant has on file.
pub struct FilingLocator<R> {
    retriever: R,
    data_dir: PathBuf,
    filing_types: Vec<FilingType>,
}

impl<R: FilingRetriever> FilingLocator<R> {
    pub fn new(retriever: R, data_dir: impl Into<PathBuf>) -> Self {
        FilingLocator {
            retriever,
            data_dir: data_dir.into(),
            filing_types: FilingType::preference_order(),
        }
    }

    pub fn with_filing_types(mut self, filing_types: Vec<FilingType>) -> Self {
        self.filing_types = filing_types;
        self
    }

    pub fn filing_types(&self) -> &[FilingType] {
        &self.filing_types
    }

    pub fn retriever(&self) -> &R {
        &self.retriever
    }

    /// Tries each filing type in order and stops at the first one that yields a
    /// filing. Retrieval faults count as "nothing found" for that type.
    pub async fn locate(&self, registrant_id: &str) -> Option<PathBuf> {
        info!("Locating fund holdings filings for {}", registrant_id);

        for &filing_type in &self.filing_types {
            match self.retriever.get(filing_type, registrant_id, 1).await {
                Ok(count) if count > 0 => {
                    info!(
                        "Downloaded {} {} filing(s) for {}",
                        count, filing_type, registrant_id
                    );
                    return Some(dirs::filing_type_dir(
                        &self.data_dir,
                        registrant_id,
                        filing_type.as_str(),
                    ));
                }
                Ok(_) => info!("No {} filings found for {}", filing_type, registrant_id),
                Err(e) => warn!(
                    "Failed to retrieve {} filings for {}: {}",
                    filing_type, registrant_id, e
                ),
            }
        }

        warn!(
            "No suitable filings found for {} after trying {} filing types",
            registrant_id,
            self.filing_types.len()
        );
        None
    }
}
