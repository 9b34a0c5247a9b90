use chrono::NaiveDate;
use std::path::Path;
use tracing::{debug, instrument};

use crate::dataset::{read_dataset, DatasetError};
use crate::outage::NormalizedOutageRecord;

/// Location and start-date filter over the canonical dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutageQuery {
    pub state: String,
    /// Substring match; statewide rows of the state always match
    pub county: Option<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl OutageQuery {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            county: None,
            start: Self::default_start(),
            end: Self::default_end(),
        }
    }

    pub fn default_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 1, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn default_end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 6, 28).unwrap_or(NaiveDate::MAX)
    }

    pub fn with_county(mut self, county: impl Into<String>) -> Self {
        self.county = Some(county.into());
        self
    }

    /// Inclusive on both ends
    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn matches_location(&self, record: &NormalizedOutageRecord) -> bool {
        if record.state != self.state {
            return false;
        }
        match (&self.county, &record.county) {
            (None, _) | (Some(_), None) => true,
            (Some(wanted), Some(county)) => county.contains(wanted.as_str()),
        }
    }

    pub fn matches_dates(&self, record: &NormalizedOutageRecord) -> bool {
        (self.start..=self.end).contains(&record.start_date)
    }

    pub fn matches(&self, record: &NormalizedOutageRecord) -> bool {
        self.matches_location(record) && self.matches_dates(record)
    }
}

/// Read-only access to a merged outage dataset
pub struct QueryService {
    records: Vec<NormalizedOutageRecord>,
}

impl QueryService {
    pub fn new(records: Vec<NormalizedOutageRecord>) -> Self {
        Self { records }
    }

    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        Ok(Self::new(read_dataset(path)?))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[instrument(skip(self), fields(state = %query.state))]
    pub fn query(&self, query: &OutageQuery) -> Vec<&NormalizedOutageRecord> {
        let results: Vec<_> = self.records.iter().filter(|r| query.matches(r)).collect();
        debug!("{} of {} records matched", results.len(), self.records.len());
        results
    }
}
