//! pjmlake CLI — fetch PJM Data Miner feeds into CSV files.
//!
//! Commands:
//! - `fetch`: plan windows, fetch each feed, and write one CSV per feed
//! - `plan`: print the windows (and optionally request URLs) without fetching
//! - `feeds`: list the supported feeds

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Timelike};
use chrono_tz::America::New_York;
use clap::{Parser, Subcommand};
use pjmlake_core::data::{
    download_feeds, parse_timestamp, plan_windows_with_step, BoundaryStep, DateRange, Feed,
    HttpTransport, LogProgress, RequestTemplate,
};
use pjmlake_core::Config;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pjmlake",
    about = "pjmlake: windowed downloads from the PJM Data Miner API"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by `fetch` and `plan`.
#[derive(clap::Args)]
struct RangeArgs {
    /// Range start (MM/DD/YYYY HH:MM or YYYY-MM-DD HH:MM).
    #[arg(long)]
    start: String,

    /// Range end. Defaults to now in US Eastern time.
    #[arg(long)]
    end: Option<String>,

    /// Widest range a single request may cover, in days.
    #[arg(long)]
    max_span_days: Option<u32>,

    /// Separate windows by one minute instead of one day.
    #[arg(long, default_value_t = false)]
    minute_step: bool,

    /// rowCount sent with every request.
    #[arg(long)]
    row_count: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch feeds over a date range and write one CSV per feed.
    Fetch {
        /// Feeds to fetch: load, lmp, solar, wind. Defaults to all four.
        #[arg(value_parser = parse_feed)]
        feeds: Vec<Feed>,

        #[command(flatten)]
        range: RangeArgs,

        /// Output root. Defaults to DataLake/Raw.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// API subscription key (overrides config and PJM_SUBSCRIPTION_KEY).
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Print the planned windows without contacting the API.
    Plan {
        #[command(flatten)]
        range: RangeArgs,

        /// Also print the request URL for each window of this feed.
        #[arg(long, value_parser = parse_feed)]
        feed: Option<Feed>,
    },
    /// List supported feeds.
    Feeds,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pjmlake_core=info,pjmlake=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Fetch {
            feeds,
            range,
            output_dir,
            api_key,
        } => run_fetch(config, feeds, range, output_dir, api_key),
        Commands::Plan { range, feed } => run_plan(config, range, feed),
        Commands::Feeds => {
            run_feeds();
            Ok(())
        }
    }
}

fn parse_feed(s: &str) -> Result<Feed, String> {
    s.parse()
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    Ok(config.with_env())
}

/// Apply range flags on top of the config and resolve the date range.
fn resolve_range(config: &mut Config, args: &RangeArgs) -> Result<DateRange> {
    if let Some(span) = args.max_span_days {
        config.fetch.max_span_days = span;
    }
    if args.minute_step {
        config.fetch.boundary_step = BoundaryStep::Minute;
    }
    if let Some(rows) = args.row_count {
        config.fetch.row_count = rows;
    }
    config.validate()?;

    let start = parse_timestamp(&args.start)?;
    let end = match args.end.as_deref() {
        Some(end) => parse_timestamp(end)?,
        None => eastern_now()?,
    };
    Ok(DateRange::new(start, end)?)
}

/// Current wall-clock time in US Eastern, truncated to the minute.
fn eastern_now() -> Result<NaiveDateTime> {
    chrono::Utc::now()
        .with_timezone(&New_York)
        .naive_local()
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .context("failed to truncate current time to the minute")
}

fn run_fetch(
    mut config: Config,
    feeds: Vec<Feed>,
    range_args: RangeArgs,
    output_dir: Option<PathBuf>,
    api_key: Option<String>,
) -> Result<()> {
    let range = resolve_range(&mut config, &range_args)?;
    if let Some(dir) = output_dir {
        config.output.root = dir;
    }
    if let Some(key) = api_key {
        config.api.subscription_key = key;
    }
    config.api.require_key()?;

    let feeds = if feeds.is_empty() {
        Feed::ALL.to_vec()
    } else {
        feeds
    };

    let transport = HttpTransport::new(Duration::from_secs(config.api.timeout_secs))?;
    tracing::info!(
        feeds = feeds.len(),
        %range,
        output = %config.output.root.display(),
        "starting fetch"
    );

    let summaries = download_feeds(&feeds, &transport, &config, &range, &LogProgress)
        .with_context(|| format!("fetch aborted for range {range}"))?;

    for s in &summaries {
        println!(
            "CSV file created: {} ({} records from {} windows)",
            s.path.display(),
            s.records,
            s.windows
        );
    }

    Ok(())
}

fn run_plan(mut config: Config, range_args: RangeArgs, feed: Option<Feed>) -> Result<()> {
    let range = resolve_range(&mut config, &range_args)?;
    let windows = plan_windows_with_step(
        &range,
        config.fetch.max_span_days,
        config.fetch.boundary_step,
    )?;

    println!("Range: {range}");
    println!(
        "Windows: {} (max span {} days, {:?} step)",
        windows.len(),
        config.fetch.max_span_days,
        config.fetch.boundary_step
    );
    println!();

    let request =
        feed.map(|f| RequestTemplate::new(&config.api.base_url, f, config.fetch.row_count));

    for (i, w) in windows.iter().enumerate() {
        println!("{:>4}  {w}", i + 1);
        if let Some(request) = &request {
            println!("      {}", request.render(w));
        }
    }

    Ok(())
}

fn run_feeds() {
    println!("{:<8} {:<30} {:<30}", "Alias", "Endpoint", "Range Filter");
    println!("{}", "-".repeat(68));
    for (alias, feed) in ["load", "lmp", "solar", "wind"].iter().zip(Feed::ALL) {
        println!(
            "{:<8} {:<30} {:<30}",
            alias,
            feed.endpoint(),
            feed.range_param()
        );
    }
}
