//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.meeting-summary.toml` files.

use crate::cli::OutputFormat;
use crate::models::Palette;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE: &str = ".meeting-summary.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Summary service settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Chart settings.
    #[serde(default)]
    pub chart: ChartConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "meeting_summary.md".to_string()
}

/// Summary service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the summary service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:37555".to_string()
}

fn default_timeout() -> u64 {
    60 // the service pages through three months of events per request
}

/// Chart settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Colors assigned to categories by position.
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
        }
    }
}

fn default_palette() -> Vec<String> {
    Palette::default().colors().to_vec()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Include weekly and monthly breakdown of attended time.
    #[serde(default = "default_true")]
    pub include_periods: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            include_periods: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.meeting-summary.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref server) = args.server {
            self.server.base_url = server.clone();
        }
        if let Some(timeout) = args.timeout {
            self.server.timeout_seconds = timeout;
        }

        if let Some(ref palette) = args.palette {
            self.chart.palette = palette.clone();
        }

        if let Some(ref output) = args.output {
            self.general.output = output.to_string_lossy().to_string();
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }

        // Flags always override
        if args.no_periods {
            self.report.include_periods = false;
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Log level for this run. `--quiet` wins over any verbose setting.
    pub fn log_level(&self, quiet: bool) -> tracing::Level {
        if quiet {
            tracing::Level::ERROR
        } else if self.general.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// The configured chart palette, with blank entries dropped.
    pub fn palette(&self) -> Result<Palette> {
        let colors: Vec<String> = self
            .chart
            .palette
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();

        Palette::new(colors).context("Chart palette must contain at least one color")
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
