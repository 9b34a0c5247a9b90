//! Canonical outage dataset CSV: one row per (event, location)

use std::fs;
use std::io::Write;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::outage::NormalizedOutageRecord;

pub const DATASET_HEADER: [&str; 7] = [
    "Start Date",
    "Start Time",
    "End Date",
    "End Time",
    "County",
    "State",
    "Number of Customers Affected",
];

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to persist {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: tempfile::PersistError,
    },
}

/// Serialize records as CSV (header always written, even with no records)
pub fn write_records<W: Write>(
    output: W,
    records: &[NormalizedOutageRecord],
) -> Result<(), DatasetError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(output);
    writer.write_record(DATASET_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the dataset next to its final path, then move it into place
///
/// A failure part-way leaves any previous file at `path` untouched.
pub fn write_dataset(path: &Path, records: &[NormalizedOutageRecord]) -> Result<(), DatasetError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    write_records(temp.as_file_mut(), records)?;
    temp.persist(path).map_err(|source| DatasetError::Persist {
        path: path.display().to_string(),
        source,
    })?;

    info!("Wrote {} records to {:?}", records.len(), path);
    Ok(())
}

pub fn read_dataset(path: &Path) -> Result<Vec<NormalizedOutageRecord>, DatasetError> {
    debug!("Reading dataset {:?}", path);
    let reader = ReaderBuilder::new().from_path(path)?;
    read_records(reader)
}

pub fn read_records<R: std::io::Read>(
    mut reader: csv::Reader<R>,
) -> Result<Vec<NormalizedOutageRecord>, DatasetError> {
    let mut records = Vec::new();
    for result in reader.deserialize() {
        records.push(result?);
    }
    Ok(records)
}
