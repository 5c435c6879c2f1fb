//! Configuration module for buffer-receiver.
//!
//! Supports both command-line arguments and TOML configuration file.
//! CLI arguments take precedence over config file values. The listening
//! port is fixed and not part of either.

use clap::Parser;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Port the receiver listens on.
pub const DEFAULT_PORT: u16 = 8520;

/// Command-line arguments for the receiver
#[derive(Parser, Debug)]
#[command(name = "buffer-receiver")]
#[command(author = "buffer-receiver authors")]
#[command(version = "0.1.0")]
#[command(about = "Receive one length-prefixed buffer over TCP and save it", long_about = None)]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// The output format (either 'bin' or 'png')
    #[arg(short, long)]
    pub output: Option<String>,

    /// Directory the output file is written to
    #[arg(short = 'd', long)]
    pub output_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// TOML configuration file structure
#[derive(Debug, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Output-related configuration
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output format name
    #[serde(default = "default_format")]
    pub format: String,
    /// Output directory
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            dir: default_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_format() -> String {
    "bin".to_string()
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_level() -> String {
    "info".to_string()
}

/// How the received buffer is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Raw bytes, verbatim.
    #[default]
    Bin,
    /// 128x128 RGB565 decoded to a PNG.
    Png,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bin" => Ok(OutputFormat::Bin),
            "png" => Ok(OutputFormat::Png),
            other => Err(ConfigError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Bin => f.write_str("bin"),
            OutputFormat::Png => f.write_str("png"),
        }
    }
}

/// Final resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub format: OutputFormat,
    pub output_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Load configuration from CLI args and optional TOML file.
    /// CLI arguments take precedence over TOML file values.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_args(CliArgs::parse())
    }

    /// Resolve already-parsed CLI args against the optional TOML file.
    pub fn from_args(cli: CliArgs) -> Result<Self, ConfigError> {
        let toml_config = if let Some(ref config_path) = cli.config {
            let contents = std::fs::read_to_string(config_path)
                .map_err(|e| ConfigError::FileRead(config_path.clone(), e))?;
            toml::from_str(&contents)
                .map_err(|e| ConfigError::TomlParse(config_path.clone(), e))?
        } else {
            TomlConfig::default()
        };

        let format = cli
            .output
            .as_deref()
            .unwrap_or(&toml_config.output.format)
            .parse::<OutputFormat>()?;

        Ok(Config {
            port: DEFAULT_PORT,
            format,
            output_dir: cli.output_dir.unwrap_or(toml_config.output.dir),
            log_level: if cli.log_level != "info" {
                cli.log_level
            } else {
                toml_config.logging.level
            },
        })
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {}", .0.display(), .1)]
    FileRead(PathBuf, #[source] std::io::Error),
    #[error("Failed to parse config file '{}': {}", .0.display(), .1)]
    TomlParse(PathBuf, #[source] toml::de::Error),
    #[error("unknown output format '{0}' -- must be either 'bin' or 'png'")]
    UnknownFormat(String),
}
