use std::path::PathBuf;
use thiserror::Error;

/// Terminal failures for a single parse of a filing directory.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Filing directory not found: {0:?}")]
    DirectoryNotFound(PathBuf),
    #[error("No accession number directories found in {0:?}")]
    NoAccession(PathBuf),
    #[error("No suitable XML or text submission file found in {0:?}")]
    DocumentNotFound(PathBuf),
    #[error("Neither an <XML> block nor an <?xml ...?> declaration found in {0:?}")]
    EnvelopeExtractionFailed(PathBuf),
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("XML parse error for {path:?}: {source}")]
    MalformedDocument {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },
}

impl ParseError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ParseError::Io {
            path: path.into(),
            source,
        }
    }
}
