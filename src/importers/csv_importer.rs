use csv::ReaderBuilder;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::importers::raw_table::{Cell, RawRow, RawTable};
use crate::utils::file_name;
use crate::importers::ImportError;

/// Reader for annual summaries exported as CSV
///
/// Blank lines are skipped before the header row is counted, so a title line
/// followed by the column labels gives a header row of 1.
pub struct CsvImporter {
    path: PathBuf,
    header_row: usize,
}

impl CsvImporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            header_row: 1,
        }
    }

    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }

    pub fn read(&self) -> Result<RawTable, ImportError> {
        info!("Reading CSV: {:?}", self.path);
        let reader = ReaderBuilder::new()
            .has_headers(false)
            // title lines usually carry fewer fields than the data
            .flexible(true)
            .from_path(&self.path)?;
        self.read_from(file_name(&self.path), reader)
    }

    /// Parse CSV content from any reader (used for in-memory data)
    pub fn read_reader<R: Read>(
        &self,
        source_name: impl Into<String>,
        input: R,
    ) -> Result<RawTable, ImportError> {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(input);
        self.read_from(source_name.into(), reader)
    }

    fn read_from<R: Read>(
        &self,
        source_name: String,
        mut reader: csv::Reader<R>,
    ) -> Result<RawTable, ImportError> {
        let mut headers: Option<Vec<String>> = None;
        let mut rows = Vec::new();
        let mut non_blank = 0usize;

        for result in reader.records() {
            let record = result?;
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(non_blank + 1);
            non_blank += 1;

            if headers.is_some() {
                rows.push(RawRow::new(line, record.iter().map(Cell::text).collect()));
            } else if non_blank == self.header_row + 1 {
                headers = Some(record.iter().map(str::to_string).collect());
            } else {
                debug!("Skipping pre-header line {}", line);
            }
        }

        let headers = headers.ok_or_else(|| ImportError::MissingHeader {
            source_name: source_name.clone(),
            row: self.header_row,
        })?;

        info!("Read {} data rows from {}", rows.len(), source_name);
        Ok(RawTable::new(source_name, headers, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = "\
Annual Summary,,,
Event Type,Area Affected,Date Event Began,Number of Customers Affected
,,,
Severe Weather,\"Florida: Duval, Orange\",1/5/2019,500
Vandalism,Texas:,1/6/2019,
";

    #[test]
    fn test_read_skips_title_and_blank_lines() {
        let table = CsvImporter::new("2019_Annual_Summary.csv")
            .read_reader("2019_Annual_Summary.csv", SUMMARY.as_bytes())
            .unwrap();

        assert_eq!(table.source_name, "2019_Annual_Summary.csv");
        assert_eq!(table.headers[1], "Area Affected");
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.rows[0].cell(1),
            &Cell::Text("Florida: Duval, Orange".to_string())
        );
        assert_eq!(table.rows[0].line, 4);
        assert_eq!(table.rows[1].cell(3), &Cell::Empty);
    }

    #[test]
    fn test_header_on_first_line() {
        let table = CsvImporter::new("merged_data.csv")
            .with_header_row(0)
            .read_reader("merged_data.csv", "State,County\nOhio,Lucas\n".as_bytes())
            .unwrap();
        assert_eq!(table.headers, vec!["State", "County"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_missing_header() {
        let result = CsvImporter::new("empty.csv").read_reader("empty.csv", "Title only\n".as_bytes());
        assert!(matches!(result, Err(ImportError::MissingHeader { row: 1, .. })));
    }

    #[test]
    fn test_file_not_found() {
        let result = CsvImporter::new("/nonexistent/2019_Annual_Summary.csv").read();
        assert!(matches!(result, Err(ImportError::Csv(_))));
    }
}
