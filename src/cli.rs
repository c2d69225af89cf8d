//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Meeting Summary - see where your calendar time goes
///
/// Fetches categorized calendar events from the summary service and reports
/// how much of your attended meeting time falls into each category.
///
/// Examples:
///   meeting-summary
///   meeting-summary --code 4/0Adeu5B --calendar me@example.com
///   meeting-summary --input events.json --format json
///   meeting-summary --raw-events export.json --owner me@example.com
///   meeting-summary --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Access code returned by the authorization link
    ///
    /// Without a code, the authorization link is printed instead.
    #[arg(long, env = "MEETING_SUMMARY_CODE")]
    pub code: Option<String>,

    /// Calendars to summarize (comma-separated)
    ///
    /// Without a selection, the available calendars are listed.
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    pub calendar: Option<Vec<String>>,

    /// Summarize a local JSON file of category → events instead of
    /// calling the service
    #[arg(long, value_name = "FILE", conflicts_with = "raw_events")]
    pub input: Option<PathBuf>,

    /// Bucket and summarize a local export of raw calendar events
    #[arg(long, value_name = "FILE", requires = "owner")]
    pub raw_events: Option<PathBuf>,

    /// Calendar owner email used to decide which raw events were attended
    #[arg(long, value_name = "EMAIL")]
    pub owner: Option<String>,

    /// Summary service URL
    #[arg(long, value_name = "URL", env = "MEETING_SUMMARY_SERVER")]
    pub server: Option<String>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Chart colors (comma-separated), reused in order when exhausted
    #[arg(long, value_name = "COLORS", value_delimiter = ',')]
    pub palette: Option<Vec<String>>,

    /// Leave out the weekly and monthly breakdown
    #[arg(long)]
    pub no_periods: bool,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .meeting-summary.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .meeting-summary.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Selected calendars, empty when none were given.
    pub fn calendars(&self) -> &[String] {
        self.calendar.as_deref().unwrap_or(&[])
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref server) = self.server {
            if !server.starts_with("http://") && !server.starts_with("https://") {
                return Err("Server URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref palette) = self.palette {
            if palette.iter().all(|c| c.trim().is_empty()) {
                return Err("Palette must contain at least one color".to_string());
            }
        }

        if let Some(ref code) = self.code {
            if code.trim().is_empty() {
                return Err("Access code must not be empty".to_string());
            }
        }

        if self.raw_events.is_some() && self.owner.is_none() {
            return Err("--raw-events requires --owner".to_string());
        }

        for path in [&self.input, &self.raw_events].into_iter().flatten() {
            if !path.is_file() {
                return Err(format!("Input file does not exist: {}", path.display()));
            }
        }

        Ok(())
    }
}
