/// Date/time coercion for outage report cells
///
/// Annual summaries mix native spreadsheet dates, Excel serial numbers and
/// free text ("1/5/2019", "2:30 p.m.", "Noon"). Everything is reduced to a
/// `NaiveDate` or `NaiveTime`.
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::importers::Cell;

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    // two-digit years first: "%Y" would happily read "19" as year 19
    "%m/%d/%y",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d-%b-%y",
];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
];

const TIME_FORMATS: [&str; 7] = [
    "%H:%M:%S",
    "%H:%M:%S%.f",
    "%H:%M",
    "%I:%M:%S %p",
    "%I:%M %p",
    "%I:%M%p",
    "%H%M",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    #[error("{field} is empty")]
    Missing { field: &'static str },

    #[error("{field}: cannot parse a date from {value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("{field}: cannot parse a time from {value:?}")]
    InvalidTime { field: &'static str, value: String },
}

/// Coerce a cell to a date, dropping any time-of-day component
pub fn coerce_date(cell: &Cell, field: &'static str) -> Result<NaiveDate, TimestampError> {
    let invalid = |value: String| TimestampError::InvalidDate { field, value };

    match cell {
        Cell::Empty => Err(TimestampError::Missing { field }),
        Cell::DateTime(dt) => Ok(dt.date()),
        Cell::Float(f) => excel_serial_to_date(*f).ok_or_else(|| invalid(f.to_string())),
        Cell::Int(i) => excel_serial_to_date(*i as f64).ok_or_else(|| invalid(i.to_string())),
        Cell::Text(s) => parse_date_text(s).ok_or_else(|| invalid(s.clone())),
        Cell::Bool(b) => Err(invalid(b.to_string())),
    }
}

/// Coerce a cell to a time of day, dropping any date component
pub fn coerce_time(cell: &Cell, field: &'static str) -> Result<NaiveTime, TimestampError> {
    let invalid = |value: String| TimestampError::InvalidTime { field, value };

    match cell {
        Cell::Empty => Err(TimestampError::Missing { field }),
        Cell::DateTime(dt) => Ok(dt.time()),
        Cell::Float(f) => day_fraction_to_time(*f).ok_or_else(|| invalid(f.to_string())),
        Cell::Int(i) => military_time(*i).ok_or_else(|| invalid(i.to_string())),
        Cell::Text(s) => parse_time_text(s).ok_or_else(|| invalid(s.clone())),
        Cell::Bool(b) => Err(invalid(b.to_string())),
    }
}

/// Convert Excel serial date to NaiveDate (1900 date system)
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(Duration::days(serial.trunc() as i64))
}

/// Convert the fractional part of an Excel serial to a time of day
pub fn day_fraction_to_time(value: f64) -> Option<NaiveTime> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let seconds = (value.fract() * 86_400.0).round() as u32 % 86_400;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
}

/// 0-2359 style integer times (1430 = 14:30)
fn military_time(value: i64) -> Option<NaiveTime> {
    if !(0..2400).contains(&value) {
        return None;
    }
    NaiveTime::from_hms_opt((value / 100) as u32, (value % 100) as u32, 0)
}

fn parse_date_text(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| parse_datetime_text(value).map(|dt| dt.date()))
}

fn parse_datetime_text(value: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

fn parse_time_text(value: &str) -> Option<NaiveTime> {
    let value = format_am_or_pm(value.trim());

    if value.contains("NOON") {
        return NaiveTime::from_hms_opt(12, 0, 0);
    }
    if value.contains("MIDNIGHT") {
        return NaiveTime::from_hms_opt(0, 0, 0);
    }

    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&value, fmt).ok())
        .or_else(|| parse_datetime_text(&value).map(|dt| dt.time()))
        .map(|t| t.with_nanosecond(0).unwrap_or(t))
}

fn format_am_or_pm(value: &str) -> String {
    value
        .to_uppercase()
        .replace("P.M.", "PM")
        .replace("P.M", "PM")
        .replace("A.M.", "AM")
        .replace("A.M", "AM")
}
