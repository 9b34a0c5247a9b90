use chrono::NaiveDate;
use clap::Parser;
use outage_history::services::{OutageQuery, QueryService};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "query-outages")]
#[command(about = "Query the merged outage dataset by location and start date", long_about = None)]
struct Cli {
    /// Merged dataset produced by `clean-hist-data --merge`
    #[arg(long, env = "OUTAGE_DATASET", default_value = "data/merged_data.csv")]
    dataset: PathBuf,

    /// State name, e.g. "Texas"
    #[arg(long)]
    state: String,

    /// County name or part of it; statewide outages are always included
    #[arg(long)]
    county: Option<String>,

    /// First start date to include (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Last start date to include (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Only print the number of matching outages
    #[arg(long)]
    count_only: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if it exists (ignore errors if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut query = OutageQuery::new(&cli.state).with_date_range(
        cli.start_date.unwrap_or_else(OutageQuery::default_start),
        cli.end_date.unwrap_or_else(OutageQuery::default_end),
    );
    if let Some(county) = &cli.county {
        query = query.with_county(county);
    }

    info!("Loading dataset {:?}", cli.dataset);
    let service = QueryService::from_path(&cli.dataset)?;
    info!("Loaded {} records", service.len());

    let results = service.query(&query);

    println!(
        "{} outages in {}{} between {} and {}",
        results.len(),
        query.county.as_deref().map(|c| format!("{c}, ")).unwrap_or_default(),
        query.state,
        query.start,
        query.end
    );
    if cli.count_only {
        return Ok(());
    }

    println!("{}", "=".repeat(80));
    for record in results {
        println!(
            "{} {} -> {} {}  {:<20} {:>10}",
            record.start_date,
            record.start_time,
            record.end_date,
            record.end_time,
            record.county.as_deref().unwrap_or("(statewide)"),
            record
                .customers_affected
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
    }

    Ok(())
}
