use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::importers::raw_table::{Cell, RawRow, RawTable};
use crate::importers::ImportError;
use crate::utils::file_name;

/// Reader for OE-417 annual summary workbooks (.xls and .xlsx)
pub struct SpreadsheetImporter {
    workbook_path: PathBuf,
    header_row: usize,
}

impl SpreadsheetImporter {
    pub fn new(workbook_path: impl Into<PathBuf>) -> Self {
        Self {
            workbook_path: workbook_path.into(),
            header_row: 1,
        }
    }

    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }

    /// Read the first worksheet of the workbook
    ///
    /// # Expected Sheet Structure:
    /// ```text
    /// Row 1: Report title ("Annual Summary ...")
    /// Row 2: Column labels (Month, Date Event Began, Time Event Began, ...)
    /// Row 3+: One row per reported event (blank rows are skipped)
    /// ```
    pub fn read_first_sheet(&self) -> Result<RawTable, ImportError> {
        // Opening is synchronous, callers on a runtime should use spawn_blocking
        let mut workbook = open_workbook_auto(&self.workbook_path)
            .map_err(|e| ImportError::WorkbookOpen(e.to_string()))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::NoWorksheets(self.source_name()))?;

        info!("Reading sheet '{}' from {:?}", sheet_name, self.workbook_path);

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|_| ImportError::SheetNotFound(sheet_name.clone()))?;

        self.table_from_range(&range)
    }

    /// Convert a worksheet range into a `RawTable`
    pub fn table_from_range(&self, range: &Range<Data>) -> Result<RawTable, ImportError> {
        // Range positions are relative to the first used cell
        let (start_row, _) = range.start().unwrap_or((0, 0));
        let start_row = start_row as usize;
        let header_idx = self.header_row.checked_sub(start_row).ok_or_else(|| {
            ImportError::MissingHeader {
                source_name: self.source_name(),
                row: self.header_row,
            }
        })?;

        let mut rows = range.rows().enumerate().skip(header_idx);
        let headers: Vec<String> = match rows.next() {
            Some((_, header)) => header.iter().map(header_label).collect(),
            None => {
                return Err(ImportError::MissingHeader {
                    source_name: self.source_name(),
                    row: self.header_row,
                })
            }
        };
        debug!("Found {} columns: {:?}", headers.len(), headers);

        let mut data_rows = Vec::new();
        for (rel_idx, row) in rows {
            let line = start_row + rel_idx + 1;
            let cells: Vec<Cell> = row
                .iter()
                .enumerate()
                .map(|(col, value)| convert_cell(value, line, col))
                .collect();

            if cells.iter().all(Cell::is_empty) {
                continue;
            }
            data_rows.push(RawRow::new(line, cells));
        }

        info!(
            "Read {} data rows from {}",
            data_rows.len(),
            self.source_name()
        );
        Ok(RawTable::new(self.source_name(), headers, data_rows))
    }

    fn source_name(&self) -> String {
        file_name(&self.workbook_path)
    }
}

fn header_label(value: &Data) -> String {
    match value {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        _ => String::new(),
    }
}

fn convert_cell(value: &Data, line: usize, col: usize) -> Cell {
    match value {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(excel_date) => match excel_date.as_datetime() {
            Some(dt) => Cell::DateTime(dt),
            None => Cell::Float(excel_date.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s),
        Data::Error(e) => {
            warn!("Cell error at line {}, col {}: {:?}", line, col, e);
            Cell::Empty
        }
    }
}
