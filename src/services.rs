pub mod clean_service;
pub mod merge_service;
pub mod query_service;

pub use clean_service::{CleanService, CleanStats};
pub use merge_service::{merge_annual_summaries, MergeStats};
pub use query_service::{OutageQuery, QueryService};
