// Outage history normalization
//
// Turns the rows of one OE-417 annual summary into canonical outage records:
// - normalizer: row filtering, column resolution, per-row orchestration
// - timestamp: date/time cell coercion
// - area_parser: free-text "Area Affected" grammar
// - record_expander: one record per parsed location

pub mod area_parser;
pub mod models;
pub mod normalizer;
pub mod record_expander;
pub mod timestamp;

pub use area_parser::{parse_area, AreaDialect, AreaParseError};
pub use models::{NormalizedOutageRecord, OutageEvent, ParsedLocation, RawLocation, RawOutageRecord};
pub use normalizer::{NormalizeOutcome, Normalizer};
pub use record_expander::expand;
