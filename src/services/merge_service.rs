use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::clean_error::CleanError;
use crate::config::{CleanConfig, ANNUAL_SUMMARY_SUFFIX};
use crate::dataset::{read_dataset, write_dataset};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStats {
    pub output: PathBuf,
    pub files_merged: usize,
    pub records_merged: usize,
}

/// Per-year outputs in `dest_dir`, sorted by path
pub fn annual_summaries(dest_dir: &Path) -> Result<Vec<PathBuf>, CleanError> {
    let io_err = |source| CleanError::SourceIo {
        path: dest_dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dest_dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_summary = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(ANNUAL_SUMMARY_SUFFIX));
        if path.is_file() && is_summary {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Concatenate every per-year output in the destination directory into
/// `merged_data.csv`, then remove them
///
/// The intermediates are deleted only after the merged file is in place.
#[instrument(skip(config), fields(dest_dir = %config.dest_dir.display()))]
pub fn merge_annual_summaries(config: &CleanConfig) -> Result<MergeStats, CleanError> {
    let files = annual_summaries(&config.dest_dir)?;
    info!("Merging {} annual summaries", files.len());

    let mut records = Vec::new();
    for file in &files {
        let mut rows = read_dataset(file)?;
        debug!("{:?}: {} records", file, rows.len());
        records.append(&mut rows);
    }

    let output = config.merged_path();
    write_dataset(&output, &records)?;

    for file in &files {
        fs::remove_file(file).map_err(|source| CleanError::SourceIo {
            path: file.clone(),
            source,
        })?;
    }

    info!(
        "Merged {} records from {} files into {:?}",
        records.len(),
        files.len(),
        output
    );
    Ok(MergeStats {
        output,
        files_merged: files.len(),
        records_merged: records.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_annual_summaries_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "2020_Annual_Summary.csv",
            "2019_Annual_Summary.csv",
            "merged_data.csv",
            "2019_notes.csv",
        ] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let files = annual_summaries(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["2019_Annual_Summary.csv", "2020_Annual_Summary.csv"]);
    }

    #[test]
    fn test_merge_with_no_summaries_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();

        let config = CleanConfig::new("raw").with_dest_dir(dir.path());

        let stats = merge_annual_summaries(&config).unwrap();

        assert_eq!(stats.output, dir.path().join("merged_data.csv"));
        assert_eq!(stats.files_merged, 0);
        assert_eq!(stats.records_merged, 0);
        assert!(read_dataset(&stats.output).unwrap().is_empty());
    }
}
