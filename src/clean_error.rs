use std::path::PathBuf;

use crate::dataset::DatasetError;
use crate::importers::ImportError;
use crate::outage::area_parser::AreaParseError;
use crate::outage::timestamp::TimestampError;

#[derive(Debug, thiserror::Error)]
pub enum CleanError {
    #[error("Malformed timestamp at source row {row}: {source}")]
    MalformedTimestamp {
        row: usize,
        #[source]
        source: TimestampError,
    },
    #[error("Malformed area at source row {row}: {source}")]
    MalformedArea {
        row: usize,
        #[source]
        source: AreaParseError,
    },
    #[error("Missing column: {0}")]
    MissingColumn(String),
    #[error("I/O error on {path:?}: {source}")]
    SourceIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
    #[error("Cleaning task failed: {0}")]
    Task(String),
}
