use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::importers::Cell;
use crate::outage::timestamp::{coerce_date, coerce_time, TimestampError};

/// One location parsed out of an "Area Affected" cell
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedLocation {
    pub state: String,
    /// `None` for statewide entries
    pub county: Option<String>,
}

impl ParsedLocation {
    pub fn statewide(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            county: None,
        }
    }

    pub fn county(state: impl Into<String>, county: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            county: Some(county.into()),
        }
    }
}

/// Where a row's location comes from, depending on the summary layout
#[derive(Debug, Clone, PartialEq)]
pub enum RawLocation {
    /// Free text such as "Ohio: Lucas County, Wood County;"
    AreaText(String),
    /// Already separate State / County columns
    Columns {
        state: Option<String>,
        county: Option<String>,
    },
}

/// One source row with its fields resolved by name
#[derive(Debug, Clone, PartialEq)]
pub struct RawOutageRecord {
    /// 1-based line in the source file
    pub line: usize,
    pub event_type: Option<String>,
    pub date_event_began: Cell,
    pub time_event_began: Cell,
    pub date_of_restoration: Cell,
    pub time_of_restoration: Cell,
    pub location: RawLocation,
    pub customers_affected: Cell,
}

/// Temporal and impact fields of a row after coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutageEvent {
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
    pub customers_affected: Option<u64>,
}

impl TryFrom<&RawOutageRecord> for OutageEvent {
    type Error = TimestampError;

    fn try_from(record: &RawOutageRecord) -> Result<Self, Self::Error> {
        Ok(OutageEvent {
            start_date: coerce_date(&record.date_event_began, "Date Event Began")?,
            start_time: coerce_time(&record.time_event_began, "Time Event Began")?,
            end_date: coerce_date(&record.date_of_restoration, "Date of Restoration")?,
            end_time: coerce_time(&record.time_of_restoration, "Time of Restoration")?,
            customers_affected: parse_customers(&record.customers_affected),
        })
    }
}

/// Canonical output row, serialized with the dataset column labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedOutageRecord {
    #[serde(rename = "Start Date")]
    pub start_date: NaiveDate,
    #[serde(rename = "Start Time")]
    pub start_time: NaiveTime,
    #[serde(rename = "End Date")]
    pub end_date: NaiveDate,
    #[serde(rename = "End Time")]
    pub end_time: NaiveTime,
    #[serde(rename = "County")]
    pub county: Option<String>,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Number of Customers Affected")]
    pub customers_affected: Option<u64>,
}

/// Customer counts arrive as numbers, "12,500" style text, or markers like "Unknown"
pub fn parse_customers(cell: &Cell) -> Option<u64> {
    match cell {
        Cell::Int(i) if *i >= 0 => Some(*i as u64),
        Cell::Float(f) if f.is_finite() && *f >= 0.0 => Some(f.round() as u64),
        Cell::Text(s) => {
            let cleaned: String = s.chars().filter(|c| *c != ',').collect();
            let cleaned = cleaned.trim();
            cleaned
                .parse::<u64>()
                .ok()
                .or_else(|| {
                    cleaned
                        .parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite() && *f >= 0.0)
                        .map(|f| f.round() as u64)
                })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_customers() {
        assert_eq!(parse_customers(&Cell::Int(500)), Some(500));
        assert_eq!(parse_customers(&Cell::Float(1200.0)), Some(1200));
        assert_eq!(parse_customers(&Cell::text("12,500")), Some(12_500));
        assert_eq!(parse_customers(&Cell::text("750.0")), Some(750));
        assert_eq!(parse_customers(&Cell::text("Unknown")), None);
        assert_eq!(parse_customers(&Cell::Int(-1)), None);
        assert_eq!(parse_customers(&Cell::Empty), None);
    }

    #[test]
    fn test_outage_event_from_record() {
        let record = RawOutageRecord {
            line: 3,
            event_type: Some("Severe Weather".to_string()),
            date_event_began: Cell::text("1/5/2019"),
            time_event_began: Cell::text("2:30 PM"),
            date_of_restoration: Cell::text("1/6/2019"),
            time_of_restoration: Cell::Float(0.25),
            location: RawLocation::AreaText("Ohio:".to_string()),
            customers_affected: Cell::Int(500),
        };

        let event = OutageEvent::try_from(&record).unwrap();
        assert_eq!(event.start_date, NaiveDate::from_ymd_opt(2019, 1, 5).unwrap());
        assert_eq!(event.start_time, NaiveTime::from_hms_opt(14, 30, 0).unwrap());
        assert_eq!(event.end_date, NaiveDate::from_ymd_opt(2019, 1, 6).unwrap());
        assert_eq!(event.end_time, NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        assert_eq!(event.customers_affected, Some(500));
    }

    #[test]
    fn test_outage_event_reports_failing_field() {
        let record = RawOutageRecord {
            line: 9,
            event_type: None,
            date_event_began: Cell::text("1/5/2019"),
            time_event_began: Cell::text("later"),
            date_of_restoration: Cell::text("1/6/2019"),
            time_of_restoration: Cell::text("10:00"),
            location: RawLocation::AreaText("Ohio:".to_string()),
            customers_affected: Cell::Empty,
        };

        match OutageEvent::try_from(&record) {
            Err(TimestampError::InvalidTime { field, value }) => {
                assert_eq!(field, "Time Event Began");
                assert_eq!(value, "later");
            }
            other => panic!("Expected InvalidTime, got {other:?}"),
        }
    }
}
