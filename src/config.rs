use std::env;
use std::path::{Path, PathBuf};

use crate::utils::source_year;

/// Years whose summaries list locations as free text in "Area Affected"
pub const DEFAULT_LATER_FORMAT_YEARS: [&str; 5] = ["2017", "2018", "2019", "2020", "2021"];

/// Suffix shared by every per-year output that the merge step picks up
pub const ANNUAL_SUMMARY_SUFFIX: &str = "_Annual_Summary.csv";

pub const MERGED_FILE_NAME: &str = "merged_data.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Excel,
    Csv,
}

impl InputFormat {
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            InputFormat::Excel => &["xls", "xlsx"],
            InputFormat::Csv => &["csv"],
        }
    }
}

#[derive(Debug, Clone)]
pub struct CleanConfig {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub input_format: InputFormat,
    pub merge: bool,
    pub later_format_years: Vec<String>,
    pub concurrency: usize,
    /// Zero-based row holding the column labels (row 0 is the report title)
    pub header_row: usize,
}

impl CleanConfig {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            dest_dir: PathBuf::from("hist_data/"),
            input_format: InputFormat::Excel,
            merge: false,
            later_format_years: DEFAULT_LATER_FORMAT_YEARS
                .iter()
                .map(|y| y.to_string())
                .collect(),
            concurrency: 1,
            header_row: 1,
        }
    }

    /// Apply the optional OUTAGE_* variables on top of the current values
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dest) = env::var("OUTAGE_DEST_DIR") {
            self.dest_dir = PathBuf::from(dest);
        }
        if let Ok(years) = env::var("OUTAGE_LATER_FORMAT_YEARS") {
            let years = parse_year_list(&years);
            if !years.is_empty() {
                self.later_format_years = years;
            }
        }
        self.concurrency = env::var("OUTAGE_CLEAN_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(self.concurrency);
        self
    }

    pub fn with_dest_dir(mut self, dest_dir: impl Into<PathBuf>) -> Self {
        self.dest_dir = dest_dir.into();
        self
    }

    pub fn with_input_format(mut self, input_format: InputFormat) -> Self {
        self.input_format = input_format;
        self
    }

    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_later_format_years(mut self, years: Vec<String>) -> Self {
        self.later_format_years = years;
        self
    }

    /// Whether a source file uses the free-text "Area Affected" layout
    pub fn is_later_format(&self, file_name: &str) -> bool {
        source_year(file_name)
            .is_some_and(|year| self.later_format_years.iter().any(|y| y == year))
    }

    /// Destination of the cleaned CSV for a source file (same stem, .csv)
    pub fn output_path_for(&self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.dest_dir.join(format!("{stem}.csv"))
    }

    pub fn merged_path(&self) -> PathBuf {
        self.dest_dir.join(MERGED_FILE_NAME)
    }
}

/// Parse a comma-separated year list such as "2017,2018, 2019"
pub fn parse_year_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|y| !y.is_empty())
        .map(str::to_string)
        .collect()
}
