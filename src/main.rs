//! CLI entry point for the ward crime prediction tool.
//!
//! Provides subcommands for one-shot predictions, resolving points to
//! wards, inspecting the boundary dataset, and an interactive prompt loop.

mod interactive;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use ward_predictor::{
    api::{self, PredictClient, PredictionApi},
    boundaries::BoundaryStore,
    geometry::GeoPoint,
    output::{append_series, log_demographics, log_series, print_json, print_pretty},
    resolve::WardResolver,
    timebucket::TimeBucket,
};

const DEFAULT_DATA_PATH: &str = "raw_data/ward_demographics_boundaries.csv";
const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/predict";

#[derive(Parser)]
#[command(name = "ward_predictor")]
#[command(about = "Ward-level crime prediction from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict crime probabilities for a location and time window
    Predict {
        /// Latitude of the location
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude of the location
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Date to predict for, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Time window label, e.g. "Late Night" (default: the current one)
        #[arg(long)]
        bucket: Option<TimeBucket>,

        /// Ward boundary CSV to load
        #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
        data: String,

        /// Prediction service URL (overrides PREDICT_API_URL)
        #[arg(long)]
        api_url: Option<String>,

        /// CSV file to append the prediction series to
        #[arg(short, long)]
        output: Option<String>,

        /// Print the series as JSON instead of per-row log lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Resolve a point to its ward and show the ward's demographics
    Resolve {
        /// Latitude of the location
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude of the location
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Ward boundary CSV to load
        #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
        data: String,
    },
    /// List the wards in the boundary dataset
    Wards {
        /// Ward boundary CSV to load
        #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
        data: String,
    },
    /// Show the fixed time windows and their representative timestamps
    Buckets,
    /// Prompt-driven prediction loop
    Interactive {
        /// Ward boundary CSV to load
        #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
        data: String,

        /// Prediction service URL (overrides PREDICT_API_URL)
        #[arg(long)]
        api_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/ward_predictor.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ward_predictor.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Predict {
            lat,
            lon,
            date,
            bucket,
            data,
            api_url,
            output,
            json,
        } => {
            predict(lat, lon, date, bucket, &data, api_url, output.as_deref(), json).await?;
        }
        Commands::Resolve { lat, lon, data } => {
            let store = BoundaryStore::load(&data)?;
            let resolver = WardResolver::new(&store);
            let point = GeoPoint::new(lat, lon)?;

            match resolver.resolve(&point) {
                Some(ward) => {
                    info!(ward, lat, lon, "Point resolved");
                    if let Some(demographics) = store.demographics(ward) {
                        log_demographics(ward, demographics);
                    }
                }
                None => warn!(lat, lon, "Point is outside every ward boundary"),
            }
        }
        Commands::Wards { data } => {
            let store = BoundaryStore::load(&data)?;
            for ward in store.ward_ids() {
                if let Some(d) = store.demographics(ward) {
                    info!(
                        ward,
                        white_pct = d.race_white_pct,
                        black_pct = d.race_black_pct,
                        asian_pct = d.race_asian_pct,
                        hispanic_pct = d.ethnicity_hispanic_pct,
                        under_25k_pct = d.income_under_25k_pct,
                        "Ward"
                    );
                }
            }
            info!(total = store.len(), "Boundary dataset loaded");
        }
        Commands::Buckets => {
            let today = Local::now().date_naive();
            for bucket in TimeBucket::ALL {
                let (start, end) = bucket.hours();
                let window = format!("{start:02}:00-{end:02}:00");
                info!(
                    label = bucket.label(),
                    window = %window,
                    midpoint = %bucket.midpoint(today).format("%H:%M"),
                    "Time window"
                );
            }
        }
        Commands::Interactive { data, api_url } => {
            let store = BoundaryStore::load(&data)?;
            let resolver = WardResolver::new(&store);
            interactive::run(&store, &resolver, &endpoint(api_url)).await?;
        }
    }

    Ok(())
}

/// Resolves the prediction endpoint: CLI flag first, then the
/// `PREDICT_API_URL` environment variable, then the local default.
fn endpoint(cli_value: Option<String>) -> String {
    cli_value
        .or_else(|| std::env::var("PREDICT_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
}

/// Runs the one-shot prediction flow: resolve the ward, fill in the time
/// window, call the service, and render the series.
#[tracing::instrument(skip(data, api_url, output, json))]
async fn predict(
    lat: f64,
    lon: f64,
    date: Option<NaiveDate>,
    bucket: Option<TimeBucket>,
    data: &str,
    api_url: Option<String>,
    output: Option<&str>,
    json: bool,
) -> Result<()> {
    let store = BoundaryStore::load(data)?;
    let resolver = WardResolver::new(&store);
    info!(wards = store.len(), data, "Boundary dataset loaded");

    let point = GeoPoint::new(lat, lon)?;
    let ward = match resolver.resolve(&point) {
        Some(ward) => ward,
        None => {
            warn!(lat, lon, "Point is outside every ward boundary, nothing to predict");
            return Ok(());
        }
    };

    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let bucket = bucket.unwrap_or_else(|| TimeBucket::for_time(Local::now().time()));
    info!(ward, date = %date, bucket = %bucket, "Selection complete");

    if let Some(demographics) = store.demographics(ward) {
        log_demographics(ward, demographics);
    }

    let request = api::build_request(Some(ward), Some(point), bucket.midpoint(date))?;
    let client = PredictClient::new(&endpoint(api_url))?;
    let response = client.predict(&request).await?;
    let points = api::adapt(&response);

    print_pretty(&points);
    if json {
        print_json(&points)?;
    } else {
        log_series(ward, &request.date_of_occurrence, &points);
    }

    if let Some(path) = output {
        append_series(path, ward, &request.date_of_occurrence, &points)?;
    }

    Ok(())
}
