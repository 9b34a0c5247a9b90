use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use outage_history::config::{CleanConfig, InputFormat};
use outage_history::services::{merge_annual_summaries, CleanService};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "clean-hist-data")]
#[command(about = "Clean OE-417 annual summaries into per-county outage CSVs", long_about = None)]
struct Cli {
    /// Directory holding the downloaded annual summaries
    #[arg(short, long, env = "OUTAGE_SOURCE_DIR")]
    path: PathBuf,

    /// Read .csv files instead of .xls/.xlsx workbooks
    #[arg(short, long)]
    csv: bool,

    /// Destination directory for cleaned files
    #[arg(short, long, env = "OUTAGE_DEST_DIR", default_value = "hist_data/")]
    dest: PathBuf,

    /// Merge the cleaned files into merged_data.csv and remove them
    #[arg(short, long)]
    merge: bool,

    /// Number of files cleaned at once
    #[arg(long, env = "OUTAGE_CLEAN_CONCURRENCY", default_value = "1")]
    parallel: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if it exists (ignore errors if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,outage_history=debug")),
        )
        .init();

    let cli = Cli::parse();
    let start_time = Instant::now();

    let input_format = if cli.csv {
        InputFormat::Csv
    } else {
        InputFormat::Excel
    };
    let config = CleanConfig::new(&cli.path)
        .with_env_overrides()
        .with_dest_dir(&cli.dest)
        .with_input_format(input_format)
        .with_merge(cli.merge)
        .with_concurrency(cli.parallel);

    info!("Source directory: {:?}", config.source_dir);
    info!("Destination directory: {:?}", config.dest_dir);
    info!("Later-format years: {}", config.later_format_years.join(", "));

    let service = CleanService::new(config.clone());
    let sources = service.discover_sources()?;
    if sources.is_empty() {
        error!("No {:?} source files found in {:?}", input_format, config.source_dir);
        return Err(format!("No source files found in {:?}", config.source_dir).into());
    }

    let pb = ProgressBar::new(sources.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let clean_start = Instant::now();
    let stats = service
        .clean_all(sources, |source, result| {
            let name = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match result {
                Ok(s) => pb.set_message(format!("{name}: {} records", s.records_written)),
                Err(_) => pb.set_message(format!("{name}: failed")),
            }
            pb.inc(1);
        })
        .await;

    let stats = match stats {
        Ok(stats) => {
            pb.finish_with_message(format!("✓ Cleaned {} files", stats.len()));
            stats
        }
        Err(e) => {
            pb.abandon_with_message("✗ Cleaning failed");
            return Err(e.into());
        }
    };
    let clean_duration = clean_start.elapsed();

    let merged = if config.merge {
        info!("Merging annual summaries in {:?}", config.dest_dir);
        Some(merge_annual_summaries(&config)?)
    } else {
        None
    };

    let rows_read: usize = stats.iter().map(|s| s.rows_read).sum();
    let rows_retained: usize = stats.iter().map(|s| s.rows_retained).sum();
    let records_written: usize = stats.iter().map(|s| s.records_written).sum();
    let bad_timestamps: usize = stats.iter().map(|s| s.malformed_timestamps).sum();
    let bad_areas: usize = stats.iter().map(|s| s.malformed_areas).sum();

    println!("\n{}", "=".repeat(60));
    println!("Cleaning Summary");
    println!("{}", "=".repeat(60));
    for s in &stats {
        println!(
            "{:<36}{:>8} rows -> {:>8} records",
            s.source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            s.rows_retained,
            s.records_written
        );
    }
    println!("{}", "-".repeat(60));
    println!("Files Cleaned:      {}", stats.len());
    println!("Rows Read:          {rows_read}");
    println!("Weather Rows:       {rows_retained}");
    println!("Records Written:    {records_written}");
    println!("Bad Timestamps:     {bad_timestamps}");
    println!("Bad Areas:          {bad_areas}");
    if let Some(merged) = &merged {
        println!("{}", "-".repeat(60));
        println!("Merged Files:       {}", merged.files_merged);
        println!("Merged Records:     {}", merged.records_merged);
        println!("Merged Output:      {}", merged.output.display());
    }
    println!("{}", "-".repeat(60));
    println!("Clean Time:         {:.2}s", clean_duration.as_secs_f64());
    println!("Total Time:         {:.2}s", start_time.elapsed().as_secs_f64());
    println!("{}", "=".repeat(60));
    println!();

    Ok(())
}
