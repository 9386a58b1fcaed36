//! Aerovia CLI binary.
//!
//! Generates or fetches daily air-quality and ridership series, runs the
//! cleaning and feature pipeline, and reports correlation analytics.

mod report;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use aerovia_gen::{
    AqiGenConfig, FetchOptions, SeriesSource, TransportGenConfig, aqi_series, generate_aqi,
    generate_transport,
};
use aerovia_openaq::OpenAqClient;
use aerovia_pipeline::io::{read_aqi_file, read_transport_file, write_aqi_file, write_transport_file};
use aerovia_pipeline::{
    CleanConfig, FeatureCacheKey, LoadReport, ResultCache, clean_aqi, clean_transport,
    engineer_features, merge,
};
use aerovia_stats::{AnalysisEngine, AnalysisFilter};

#[derive(Parser)]
#[command(name = "aerovia")]
#[command(about = "Air-quality and transit-ridership correlation analytics", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate synthetic sample data and write it to CSV files
    Generate {
        /// First date of the window (YYYY-MM-DD)
        #[arg(long, default_value = "2024-01-01")]
        start: String,

        /// Number of days to generate
        #[arg(short, long, default_value = "90")]
        days: usize,

        /// Seed for the random number generator
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Directory to write aqi_data.csv and transport_data.csv into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Fetch a daily AQI series from OpenAQ, falling back to synthetic data
    Fetch {
        /// OpenAQ location identifier
        #[arg(short, long, default_value = "2178")]
        location: String,

        /// First date of the window (YYYY-MM-DD)
        #[arg(long, default_value = "2024-01-01")]
        start: String,

        /// Number of days to fetch
        #[arg(short, long, default_value = "90")]
        days: usize,

        /// Seed for the synthetic fallback
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Fetch timeout in seconds
        #[arg(long, default_value = "10")]
        timeout: u64,

        /// Write the resulting series to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the full pipeline and report correlation analytics
    Analyze {
        /// AQI CSV file (generated synthetically when omitted)
        #[arg(long)]
        aqi: Option<PathBuf>,

        /// Transport CSV file (generated synthetically when omitted)
        #[arg(long)]
        transport: Option<PathBuf>,

        /// First date of the window, and lower filter bound (YYYY-MM-DD)
        #[arg(long, default_value = "2024-01-01")]
        start: String,

        /// Upper filter bound (YYYY-MM-DD, inclusive)
        #[arg(long)]
        end: Option<String>,

        /// Exclude days with AQI above this ceiling
        #[arg(long)]
        max_aqi: Option<f64>,

        /// Number of days to generate when no input files are given
        #[arg(short, long, default_value = "90")]
        days: usize,

        /// Seed for synthetic generation
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Longest run of missing days the cleaner will fill
        #[arg(long, default_value = "2")]
        gap_fill: usize,

        /// Output format (text or json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            start,
            days,
            seed,
            out_dir,
        } => {
            generate_samples(&start, days, seed, &out_dir)?;
        }
        Commands::Fetch {
            location,
            start,
            days,
            seed,
            timeout,
            output,
        } => {
            fetch_series(&location, &start, days, seed, timeout, output).await?;
        }
        Commands::Analyze {
            aqi,
            transport,
            start,
            end,
            max_aqi,
            days,
            seed,
            gap_fill,
            format,
        } => {
            analyze(
                aqi, transport, &start, end, max_aqi, days, seed, gap_fill, &format,
            )?;
        }
    }

    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", raw))
}

fn report_skipped(label: &str, load: &LoadReport) {
    if load.skipped.is_empty() {
        println!("Loaded {} rows of {} data", load.rows_read, label);
    } else {
        println!(
            "Loaded {} rows of {} data ({} skipped)",
            load.rows_read,
            label,
            load.skipped.len()
        );
        for skip in &load.skipped {
            println!("  {}", skip.to_error());
        }
    }
}

fn generate_samples(start: &str, days: usize, seed: u64, out_dir: &Path) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                   Sample Data Generation                     ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let start = parse_date(start)?;
    println!("Window:   {} + {} days", start, days);
    println!("Seed:     {}", seed);
    println!();

    let aqi = generate_aqi(&AqiGenConfig::new(start, days, seed))?;
    let transport = generate_transport(&TransportGenConfig::new(start, days, seed), &aqi)?;

    let aqi_path = out_dir.join("aqi_data.csv");
    let transport_path = out_dir.join("transport_data.csv");
    write_aqi_file(&aqi_path, &aqi)?;
    write_transport_file(&transport_path, &transport)?;

    println!("Wrote {} AQI records to {}", aqi.len(), aqi_path.display());
    println!(
        "Wrote {} transport records to {}",
        transport.len(),
        transport_path.display()
    );
    println!();

    Ok(())
}

async fn fetch_series(
    location: &str,
    start: &str,
    days: usize,
    seed: u64,
    timeout_secs: u64,
    output: Option<PathBuf>,
) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                       AQI Series Fetch                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let start = parse_date(start)?;
    println!("Location: {}", location);
    println!("Window:   {} + {} days", start, days);
    println!("Timeout:  {}s", timeout_secs);
    println!();

    let client = OpenAqClient::from_env();
    let options = FetchOptions {
        location_id: location.to_string(),
        timeout: Duration::from_secs(timeout_secs),
    };
    let config = AqiGenConfig::new(start, days, seed);

    let series = aqi_series(&client, &options, &config).await?;

    match series.source {
        SeriesSource::Fetched => println!("Source:   OpenAQ measurements"),
        SeriesSource::Synthetic => println!("Source:   synthetic fallback (fetch unavailable)"),
    }
    println!(
        "Range:    {} to {} ({} days)",
        series.table.first_date().map_or_else(String::new, |d| d.to_string()),
        series.table.last_date().map_or_else(String::new, |d| d.to_string()),
        series.table.len()
    );

    if let Some(path) = output {
        write_aqi_file(&path, &series.table)?;
        println!("Wrote series to {}", path.display());
    }
    println!();

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn analyze(
    aqi_path: Option<PathBuf>,
    transport_path: Option<PathBuf>,
    start: &str,
    end: Option<String>,
    max_aqi: Option<f64>,
    days: usize,
    seed: u64,
    gap_fill: usize,
    format: &str,
) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Correlation Analysis                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let start = parse_date(start)?;
    let end = end.as_deref().map(parse_date).transpose()?;

    println!("Window:   {} + {} days", start, days);
    if let Some(e) = end {
        println!("End:      {}", e);
    }
    if let Some(ceiling) = max_aqi {
        println!("Max AQI:  {}", ceiling);
    }
    println!("Seed:     {}", seed);
    println!("Gap fill: up to {} missing days", gap_fill);
    println!();

    let clean_config = CleanConfig {
        max_gap_fill: gap_fill,
    };
    let aqi_config = AqiGenConfig::new(start, days, seed);
    let transport_config = TransportGenConfig::new(start, days, seed);

    // AQI series: file if given, synthetic otherwise.
    let aqi_records = match aqi_path {
        Some(ref path) => {
            let (records, load) = read_aqi_file(path)?;
            report_skipped("AQI", &load);
            records
        }
        None => generate_aqi(&aqi_config)?.into_records(),
    };
    let aqi = clean_aqi(aqi_records, &clean_config)?;

    // Transport series is coupled to the cleaned AQI series when generated.
    let transport_records = match transport_path {
        Some(ref path) => {
            let (records, load) = read_transport_file(path)?;
            report_skipped("transport", &load);
            records
        }
        None => generate_transport(&transport_config, &aqi)?.into_records(),
    };
    let transport = clean_transport(transport_records, &clean_config)?;

    let merged = merge(&aqi, &transport)?;
    println!(
        "Merged {} days ({} AQI, {} transport)",
        merged.len(),
        aqi.len(),
        transport.len()
    );

    let mut feature_cache = ResultCache::new();
    let cache_key = FeatureCacheKey {
        seed,
        start,
        days,
        max_gap_fill: gap_fill,
        config_digest: FeatureCacheKey::digest(&(
            &aqi_config,
            &transport_config,
            &aqi_path,
            &transport_path,
        )),
    };
    let features = feature_cache.try_get_or_compute(cache_key, || engineer_features(&merged))?;
    let filter = AnalysisFilter {
        start: Some(start),
        end,
        max_aqi,
    };
    let analysis = AnalysisEngine::default().analyze(&features, &filter)?;

    if format == "json" {
        let json = serde_json::to_string_pretty(&analysis)
            .map_err(|e| anyhow::anyhow!("JSON serialization error: {}", e))?;
        println!("{}", json);
    } else {
        report::print_report(&analysis);
    }

    Ok(())
}
