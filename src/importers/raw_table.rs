use chrono::NaiveDateTime;

use crate::utils::collapse_whitespace;

/// A single source cell, independent of the file format it came from
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Build a text cell, mapping blank strings to `Cell::Empty`
    pub fn text(value: impl AsRef<str>) -> Self {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Borrow the cell as text (text cells only)
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Render any non-empty cell as text
    pub fn to_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) if s.trim().is_empty() => None,
            Cell::Text(s) => Some(s.trim().to_string()),
            Cell::Int(i) => Some(i.to_string()),
            Cell::Float(f) => Some(f.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
            Cell::DateTime(dt) => Some(dt.to_string()),
        }
    }
}

/// One data row plus the 1-based line it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub line: usize,
    pub cells: Vec<Cell>,
}

impl RawRow {
    pub fn new(line: usize, cells: Vec<Cell>) -> Self {
        Self { line, cells }
    }

    pub fn cell(&self, col: usize) -> &Cell {
        self.cells.get(col).unwrap_or(&Cell::Empty)
    }
}

/// In-memory table read from one source file
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub source_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(source_name: impl Into<String>, headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self {
            source_name: source_name.into(),
            headers: headers.iter().map(|h| collapse_whitespace(h)).collect(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find a column by label (whitespace-insensitive, ASCII case-insensitive)
    pub fn column_index(&self, label: &str) -> Option<usize> {
        let wanted = collapse_whitespace(label);
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(&wanted))
    }

    /// First column matching any of the given labels
    pub fn column_index_any(&self, labels: &[&str]) -> Option<usize> {
        labels.iter().find_map(|label| self.column_index(label))
    }

    pub fn retain_rows<F>(&mut self, keep: F)
    where
        F: FnMut(&RawRow) -> bool,
    {
        self.rows.retain(keep);
    }

    /// Remove columns that are empty in every row, returning their labels
    pub fn drop_empty_columns(&mut self) -> Vec<String> {
        let empty: Vec<usize> = (0..self.headers.len())
            .filter(|&col| self.rows.iter().all(|row| row.cell(col).is_empty()))
            .collect();

        let mut dropped = Vec::with_capacity(empty.len());
        for &col in empty.iter().rev() {
            dropped.push(self.headers.remove(col));
            for row in &mut self.rows {
                if col < row.cells.len() {
                    row.cells.remove(col);
                }
            }
        }
        dropped.reverse();
        dropped
    }
}
