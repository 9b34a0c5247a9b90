use futures::stream::{self, StreamExt};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, instrument, warn};

use crate::clean_error::CleanError;
use crate::config::CleanConfig;
use crate::dataset::{write_dataset, DatasetError};
use crate::importers::read_source;
use crate::utils::file_name;
use crate::outage::Normalizer;

/// Statistics for one cleaned source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanStats {
    pub source: PathBuf,
    pub output: PathBuf,
    pub rows_read: usize,
    pub rows_retained: usize,
    pub malformed_timestamps: usize,
    pub malformed_areas: usize,
    pub records_written: usize,
}

/// Cleans OE-417 annual summaries into canonical per-year CSV files
#[derive(Debug, Clone)]
pub struct CleanService {
    config: CleanConfig,
}

impl CleanService {
    pub fn new(config: CleanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleanConfig {
        &self.config
    }

    /// List the source files of the configured format, sorted by path
    pub fn discover_sources(&self) -> Result<Vec<PathBuf>, CleanError> {
        let dir = &self.config.source_dir;
        let entries = fs::read_dir(dir).map_err(|source| CleanError::SourceIo {
            path: dir.clone(),
            source,
        })?;

        let extensions = self.config.input_format.extensions();
        let mut sources = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| CleanError::SourceIo {
                    path: dir.clone(),
                    source,
                })?
                .path();
            let matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)));
            if path.is_file() && matches {
                sources.push(path);
            }
        }
        sources.sort();

        info!("Found {} source files in {:?}", sources.len(), dir);
        Ok(sources)
    }

    /// Clean one source file
    ///
    /// This is the main per-file pipeline:
    /// 1. Read the first sheet (or CSV) into a raw table
    /// 2. Normalize it (filters, coercion, area expansion)
    /// 3. Write the canonical CSV, only after everything above succeeded
    #[instrument(skip(self, source), fields(source = %source.display()))]
    pub fn clean_file(&self, source: &Path) -> Result<CleanStats, CleanError> {
        let start_time = Instant::now();
        let table = read_source(source, self.config.input_format, self.config.header_row)?;

        let normalizer = Normalizer::for_source(&self.config, &file_name(source));
        let outcome = normalizer.normalize(table)?;

        let output = self.config.output_path_for(source);
        write_dataset(&output, &outcome.records).map_err(|e| match e {
            DatasetError::Io(io) => CleanError::SourceIo {
                path: output.clone(),
                source: io,
            },
            other => CleanError::Dataset(other),
        })?;

        info!(
            "Cleaned {:?} -> {:?}: {} records in {:.2}s",
            source,
            output,
            outcome.records.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(CleanStats {
            source: source.to_path_buf(),
            output,
            rows_read: outcome.rows_read,
            rows_retained: outcome.rows_retained,
            malformed_timestamps: outcome.malformed_timestamps,
            malformed_areas: outcome.malformed_areas,
            records_written: outcome.records.len(),
        })
    }

    /// Clean every source file, up to `concurrency` at a time
    ///
    /// Files are independent. All of them finish before this returns; the
    /// first failure (by source path) is then reported.
    pub async fn clean_all<F>(
        &self,
        sources: Vec<PathBuf>,
        on_file_done: F,
    ) -> Result<Vec<CleanStats>, CleanError>
    where
        F: Fn(&Path, &Result<CleanStats, CleanError>),
    {
        let concurrency = self.config.concurrency.max(1);
        info!(
            "Cleaning {} files ({} at a time)",
            sources.len(),
            concurrency
        );

        let mut results: Vec<(PathBuf, Result<CleanStats, CleanError>)> = stream::iter(sources)
            .map(|source| {
                let service = self.clone();
                async move {
                    let path = source.clone();
                    // calamine and csv reads are blocking
                    let result = tokio::task::spawn_blocking(move || service.clean_file(&path))
                        .await
                        .unwrap_or_else(|e| Err(CleanError::Task(e.to_string())));
                    (source, result)
                }
            })
            .buffer_unordered(concurrency)
            .inspect(|(source, result)| on_file_done(source, result))
            .collect()
            .await;

        results.sort_by(|a, b| a.0.cmp(&b.0));

        let mut stats = Vec::with_capacity(results.len());
        let mut first_error = None;
        for (source, result) in results {
            match result {
                Ok(s) => stats.push(s),
                Err(e) => {
                    error!("Failed to clean {:?}: {}", source, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => {
                warn!("{} files cleaned before the failure", stats.len());
                Err(e)
            }
            None => Ok(stats),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputFormat;

    #[test]
    fn test_discover_sources_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["2019_Annual_Summary.csv", "2018_Annual_Summary.CSV", "notes.txt", "2017_Annual_Summary.xls"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        fs::create_dir(dir.path().join("archive.csv")).unwrap();

        let service = CleanService::new(
            CleanConfig::new(dir.path()).with_input_format(InputFormat::Csv),
        );
        let names: Vec<String> = service
            .discover_sources()
            .unwrap()
            .iter()
            .map(|p| file_name(p))
            .collect();

        assert_eq!(names, vec!["2018_Annual_Summary.CSV", "2019_Annual_Summary.csv"]);
    }

    #[test]
    fn test_discover_sources_missing_dir() {
        let service = CleanService::new(CleanConfig::new("/nonexistent/oe417"));
        assert!(matches!(
            service.discover_sources(),
            Err(CleanError::SourceIo { .. })
        ));
    }
}
