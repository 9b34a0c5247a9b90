pub mod clean_error;
pub mod config;
pub mod dataset;
pub mod importers;
pub mod outage;
pub mod services;
pub mod utils;
