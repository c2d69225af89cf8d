//! Meeting Summary - where does your calendar time go?
//!
//! A CLI client for the calendar summary service. It obtains an
//! authorization link, lists calendars, fetches categorized events and
//! reports how attended meeting time splits across categories.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (connection, config, bad input, etc.)

mod analysis;
mod cli;
mod client;
mod config;
mod models;
mod report;

use analysis::buckets::{self, RawEventFile};
use analysis::periods;
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use client::SummaryClient;
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use models::{Event, Palette, RawSummaryInput, ReportMetadata, SummaryReport, BASELINE_CATEGORY};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config comes first: it can turn on verbose logging.
    let (mut config, origin) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(config.log_level(args.quiet));

    info!("Meeting Summary v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    origin.log();

    if let Err(e) = run(args, config).await {
        error!("Summary failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .meeting-summary.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(config::CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", config::CONFIG_FILE);
    println!("   Edit it to customize the server, palette and report.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Pick the event source from the arguments and produce a report.
async fn run(args: Args, config: Config) -> Result<()> {
    let palette = config.palette()?;
    debug!("Chart palette: {}", palette.colors().join(", "));

    // Offline sources
    if let Some(ref path) = args.input {
        let input = load_summary_input(path)?;
        let source = path.display().to_string();
        return write_report(&config, &palette, Some(&input), source, Vec::new());
    }

    if let Some(ref path) = args.raw_events {
        let owner = args
            .owner
            .as_deref()
            .context("--raw-events requires --owner")?;
        let input = load_raw_events(path, owner)?;
        let source = path.display().to_string();
        return write_report(&config, &palette, Some(&input), source, vec![owner.to_string()]);
    }

    let client = SummaryClient::new(config.server.base_url.clone(), config.server.timeout_seconds)
        .context("Failed to create HTTP client")?;
    let source = client.base_url().to_string();

    // No code yet: the user has to grant access first.
    let Some(code) = args.code.as_deref() else {
        let link = with_spinner("Requesting authorization link...", args.quiet, client.auth_link())
            .await
            .context("Failed to get authorization link")?;

        println!("🔑 Allow calendar access:");
        println!("   {}", link);
        println!("\n   Then run again with --code <CODE>.");
        return Ok(());
    };

    let calendars = args.calendars();
    if calendars.is_empty() {
        let available = with_spinner("Listing calendars...", args.quiet, client.list_calendars(code))
            .await
            .context("Failed to list calendars")?;

        if available.is_empty() {
            println!("📅 No calendars available for this code.");
        } else {
            println!("📅 Available calendars:");
            for calendar in &available {
                println!("   - {}", calendar);
            }
            println!("\n   Pick some with --calendar <ID,ID,...>.");
        }

        return write_report(&config, &palette, None, source, Vec::new());
    }

    info!("Fetching events for {} calendar(s)", calendars.len());
    let input = with_spinner(
        "Fetching categorized events...",
        args.quiet,
        client.fetch_summary_input(code, calendars),
    )
    .await
    .context("Failed to fetch calendar events; no summary was generated")?;

    write_report(&config, &palette, Some(&input), source, calendars.to_vec())
}

/// Summarize the input, render the report and save it.
fn write_report(
    config: &Config,
    palette: &Palette,
    input: Option<&RawSummaryInput<Event>>,
    source: String,
    calendars: Vec<String>,
) -> Result<()> {
    match input {
        Some(input) if input.is_empty() => warn!("No categories in the event data"),
        Some(input) => info!("Summarizing {} categories", input.len()),
        None => debug!("No event data, writing an empty summary"),
    }

    let (summary, chart) = analysis::summarize(input, palette);

    let periods = if config.report.include_periods {
        input.map(|i| periods::breakdown(i.get(BASELINE_CATEGORY).unwrap_or(&[])))
    } else {
        None
    };

    let report = SummaryReport {
        metadata: ReportMetadata {
            source,
            calendars,
            generated_at: Utc::now(),
            palette: palette.clone(),
        },
        summary,
        chart,
        periods,
    };

    let output = match config.report.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    let output_path = Path::new(&config.general.output);
    std::fs::write(output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    // Print summary
    let baseline = &report.summary.baseline;
    println!("\n📊 Meeting Summary:");
    println!(
        "   Attended: {} meetings, {:.2} hours",
        baseline.count, baseline.total_hours
    );
    for category in &report.summary.categories {
        let share = match category.displayable_percent() {
            Some(percent) => format!("{:.2}% of attended", percent),
            None => "no attended baseline".to_string(),
        };
        println!(
            "   - {}: {} meetings, {:.2} hours ({})",
            report::generator::title_case(&category.title),
            category.count,
            category.total_hours,
            share
        );
    }
    println!("\n✅ Report saved to: {}", output_path.display());

    Ok(())
}

/// Read a category → events JSON file.
fn load_summary_input(path: &Path) -> Result<RawSummaryInput<Event>> {
    info!("Loading categorized events from: {}", path.display());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse categorized events in {}", path.display()))
}

/// Read a raw event export and bucket it for `owner`.
fn load_raw_events(path: &Path, owner: &str) -> Result<RawSummaryInput<Event>> {
    info!("Loading raw events from: {}", path.display());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let events = serde_json::from_str::<RawEventFile>(&content)
        .with_context(|| format!("Failed to parse events in {}", path.display()))?
        .into_events();

    let input = buckets::bucket_events(&events, owner);
    debug!(
        "Bucketed {} events into: {}",
        events.len(),
        input.categories().collect::<Vec<_>>().join(", ")
    );

    Ok(input)
}

/// Show a spinner while waiting on the summary service.
async fn with_spinner<T>(message: &str, quiet: bool, task: impl Future<Output = T>) -> T {
    if quiet {
        return task.await;
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = task.await;
    spinner.finish_and_clear();
    result
}

/// Where the configuration came from, reported once logging is up.
enum ConfigOrigin {
    Explicit(PathBuf),
    DefaultFile,
    Builtin,
    Fallback(anyhow::Error),
}

impl ConfigOrigin {
    fn log(&self) {
        match self {
            ConfigOrigin::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigOrigin::DefaultFile => info!("Loaded default config from {}", config::CONFIG_FILE),
            ConfigOrigin::Builtin => debug!("No config file found, using defaults"),
            ConfigOrigin::Fallback(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigOrigin)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigOrigin::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigOrigin::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigOrigin::Builtin)),
        Err(e) => Ok((Config::default(), ConfigOrigin::Fallback(e))),
    }
}
