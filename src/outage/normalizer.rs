use tracing::{debug, info, instrument, warn};

use crate::clean_error::CleanError;
use crate::config::CleanConfig;
use crate::importers::{Cell, RawRow, RawTable};
use crate::outage::area_parser::{parse_area, parse_columns};
use crate::outage::models::{NormalizedOutageRecord, OutageEvent, RawLocation, RawOutageRecord};
use crate::outage::record_expander::expand;

// Source labels first, canonical labels second, so cleaned output reads back
const EVENT_TYPE: &[&str] = &["Event Type"];
const DATE_BEGAN: &[&str] = &["Date Event Began", "Start Date"];
const TIME_BEGAN: &[&str] = &["Time Event Began", "Start Time"];
const DATE_RESTORED: &[&str] = &["Date of Restoration", "End Date"];
const TIME_RESTORED: &[&str] = &["Time of Restoration", "End Time"];
const AREA: &[&str] = &["Area Affected", "Area"];
const STATE: &[&str] = &["State"];
const COUNTY: &[&str] = &["County"];
const CUSTOMERS: &[&str] = &["Number of Customers Affected"];

const WEATHER_MARKER: &str = "Weather";
const UNKNOWN_MARKER: &str = "Unknown";

/// Result of normalizing one table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeOutcome {
    pub records: Vec<NormalizedOutageRecord>,
    pub rows_read: usize,
    /// Rows left after the event-type and restoration-date filters
    pub rows_retained: usize,
    pub malformed_timestamps: usize,
    pub malformed_areas: usize,
    pub dropped_columns: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum LocationColumns {
    Area(usize),
    Split { state: usize, county: Option<usize> },
}

/// Column positions resolved once per table
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    event_type: Option<usize>,
    date_began: usize,
    time_began: usize,
    date_restored: usize,
    time_restored: usize,
    location: LocationColumns,
    customers: Option<usize>,
}

impl ColumnMap {
    fn resolve(table: &RawTable, later_format: bool) -> Result<Self, CleanError> {
        let area = table.column_index_any(AREA);
        let state = table.column_index_any(STATE);

        let location = match (later_format, area, state) {
            (true, Some(area), _) => LocationColumns::Area(area),
            (_, _, Some(state)) => LocationColumns::Split {
                state,
                county: table.column_index_any(COUNTY),
            },
            (true, None, None) => return Err(CleanError::MissingColumn(AREA[0].to_string())),
            (false, _, None) => return Err(CleanError::MissingColumn(STATE[0].to_string())),
        };

        Ok(ColumnMap {
            event_type: table.column_index_any(EVENT_TYPE),
            date_began: required(table, DATE_BEGAN)?,
            time_began: required(table, TIME_BEGAN)?,
            date_restored: required(table, DATE_RESTORED)?,
            time_restored: required(table, TIME_RESTORED)?,
            location,
            customers: table.column_index_any(CUSTOMERS),
        })
    }

    fn record(&self, row: &RawRow) -> RawOutageRecord {
        let location = match self.location {
            LocationColumns::Area(col) => {
                RawLocation::AreaText(row.cell(col).to_text().unwrap_or_default())
            }
            LocationColumns::Split { state, county } => RawLocation::Columns {
                state: row.cell(state).to_text(),
                county: county.and_then(|col| row.cell(col).to_text()),
            },
        };

        RawOutageRecord {
            line: row.line,
            event_type: self.event_type.and_then(|col| row.cell(col).to_text()),
            date_event_began: row.cell(self.date_began).clone(),
            time_event_began: row.cell(self.time_began).clone(),
            date_of_restoration: row.cell(self.date_restored).clone(),
            time_of_restoration: row.cell(self.time_restored).clone(),
            location,
            customers_affected: self
                .customers
                .map(|col| row.cell(col).clone())
                .unwrap_or(Cell::Empty),
        }
    }
}

fn required(table: &RawTable, labels: &[&str]) -> Result<usize, CleanError> {
    table
        .column_index_any(labels)
        .ok_or_else(|| CleanError::MissingColumn(labels[0].to_string()))
}

/// Turns the rows of one annual summary into canonical outage records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    later_format: bool,
}

impl Normalizer {
    /// `later_format` selects free-text "Area Affected" parsing
    pub fn new(later_format: bool) -> Self {
        Self { later_format }
    }

    pub fn for_source(config: &CleanConfig, source_name: &str) -> Self {
        Self::new(config.is_later_format(source_name))
    }

    /// Filter, coerce and expand a table
    ///
    /// Rows with bad timestamps or unparsable areas are logged and skipped;
    /// a missing required column fails the whole table.
    #[instrument(skip(self, table), fields(source = %table.source_name, later_format = self.later_format))]
    pub fn normalize(&self, mut table: RawTable) -> Result<NormalizeOutcome, CleanError> {
        let rows_read = table.len();

        match table.column_index_any(EVENT_TYPE) {
            Some(col) => table.retain_rows(|row| {
                row.cell(col)
                    .as_str()
                    .is_some_and(|event| event.contains(WEATHER_MARKER))
            }),
            None => debug!("No Event Type column, treating rows as pre-filtered"),
        }

        let restored = required(&table, DATE_RESTORED)?;
        table.retain_rows(|row| {
            !row.cell(restored)
                .as_str()
                .is_some_and(|date| date.contains(UNKNOWN_MARKER))
        });

        let mut outcome = NormalizeOutcome {
            rows_read,
            rows_retained: table.len(),
            ..Default::default()
        };
        info!(
            "Retained {} of {} rows (weather events with a known restoration date)",
            outcome.rows_retained, rows_read
        );
        if table.is_empty() {
            return Ok(outcome);
        }

        outcome.dropped_columns = table.drop_empty_columns();
        if !outcome.dropped_columns.is_empty() {
            debug!("Dropped empty columns: {:?}", outcome.dropped_columns);
        }

        let columns = ColumnMap::resolve(&table, self.later_format)?;

        for row in &table.rows {
            let record = columns.record(row);
            match self.normalize_record(&record) {
                Ok(records) => outcome.records.extend(records),
                Err(e @ CleanError::MalformedTimestamp { .. }) => {
                    warn!("Dropping row: {}", e);
                    outcome.malformed_timestamps += 1;
                }
                Err(e @ CleanError::MalformedArea { .. }) => {
                    warn!("Dropping row: {}", e);
                    outcome.malformed_areas += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Normalized {} rows into {} records ({} bad timestamps, {} bad areas)",
            outcome.rows_retained,
            outcome.records.len(),
            outcome.malformed_timestamps,
            outcome.malformed_areas
        );
        Ok(outcome)
    }

    /// Coerce one row and fan it out over its locations
    pub fn normalize_record(
        &self,
        record: &RawOutageRecord,
    ) -> Result<Vec<NormalizedOutageRecord>, CleanError> {
        let event = OutageEvent::try_from(record).map_err(|source| {
            CleanError::MalformedTimestamp {
                row: record.line,
                source,
            }
        })?;

        let locations = match &record.location {
            RawLocation::AreaText(text) => parse_area(text),
            RawLocation::Columns { state, county } => {
                parse_columns(state.as_deref(), county.as_deref()).map(|location| vec![location])
            }
        }
        .map_err(|source| CleanError::MalformedArea {
            row: record.line,
            source,
        })?;

        if locations.is_empty() {
            debug!("Row {} has no area text, nothing to emit", record.line);
        }
        Ok(expand(&event, &locations))
    }
}
