use crate::outage::models::{NormalizedOutageRecord, OutageEvent, ParsedLocation};

/// Fan one event out to one record per location, in location order
///
/// Every record shares the event's dates, times and customer count.
pub fn expand(event: &OutageEvent, locations: &[ParsedLocation]) -> Vec<NormalizedOutageRecord> {
    locations
        .iter()
        .map(|location| NormalizedOutageRecord {
            start_date: event.start_date,
            start_time: event.start_time,
            end_date: event.end_date,
            end_time: event.end_time,
            county: location.county.clone(),
            state: location.state.clone(),
            customers_affected: event.customers_affected,
        })
        .collect()
}
