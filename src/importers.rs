//! Readers for OE-417 annual summary files (Excel workbooks and CSV exports)

pub mod csv_importer;
pub mod raw_table;
pub mod spreadsheet_importer;

use std::path::Path;

use thiserror::Error;

use crate::config::InputFormat;

// Re-export commonly used items
pub use csv_importer::CsvImporter;
pub use raw_table::{Cell, RawRow, RawTable};
pub use spreadsheet_importer::SpreadsheetImporter;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to open workbook: {0}")]
    WorkbookOpen(String),

    #[error("Workbook has no worksheets: {0}")]
    NoWorksheets(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Header row {row} not found in {source_name}")]
    MissingHeader { source_name: String, row: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Read one source file into a `RawTable`, choosing the reader by format
pub fn read_source(
    path: &Path,
    format: InputFormat,
    header_row: usize,
) -> Result<RawTable, ImportError> {
    match format {
        InputFormat::Excel => SpreadsheetImporter::new(path)
            .with_header_row(header_row)
            .read_first_sheet(),
        InputFormat::Csv => CsvImporter::new(path).with_header_row(header_row).read(),
    }
}
