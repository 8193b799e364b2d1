//! Command-line interface definitions for geodupe.
//!
//! Global options (verbosity, color, error format, config file) apply to
//! every subcommand.
//!
//! # Example
//!
//! ```bash
//! # Check a scene, answering the tolerance prompts on the terminal
//! geodupe scan plan.json --interactive
//!
//! # Non-interactive run with explicit tolerances and JSON output
//! geodupe scan plan.json --distance-tol 0.01 --angle-tol 0.5 --output json
//!
//! # Only consider some objects and persist the resulting selection
//! geodupe scan plan.json --select 3,4,9 --save-selection dupes.json
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::duplicates::ResolveOrder;

/// Tolerance-aware duplicate geometry finder.
///
/// geodupe finds points, curves, solids and block instances that duplicate
/// each other within a distance and an angle tolerance, and selects the
/// redundant copies.
#[derive(Debug, Parser)]
#[command(name = "geodupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file to use instead of the platform default
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find duplicate objects in a scene file
    Scan(ScanArgs),
    /// Show the effective configuration, optionally saving it
    Config(ConfigArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Scene file (JSON) to check
    #[arg(value_name = "SCENE")]
    pub scene: PathBuf,

    /// Maximum distance between duplicates, in model units
    ///
    /// Defaults to the scene's absolute tolerance.
    #[arg(long, value_name = "UNITS", value_parser = parse_non_negative)]
    pub distance_tol: Option<f64>,

    /// Maximum angle between duplicates, in degrees (0-180)
    #[arg(long, value_name = "DEGREES", value_parser = parse_angle)]
    pub angle_tol: Option<f64>,

    /// Ask for the tolerances on the terminal
    #[arg(short, long)]
    pub interactive: bool,

    /// Object ids to check instead of the scene's selection
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    pub select: Vec<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Write the duplicate selection to this file
    #[arg(long, value_name = "PATH")]
    pub save_selection: Option<PathBuf>,

    /// Order in which candidate pairs are resolved
    #[arg(long, value_enum)]
    pub order: Option<ResolveOrder>,
}

/// Arguments for the config subcommand.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Write the effective configuration to the config file
    #[arg(long)]
    pub save: bool,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable message
    #[default]
    Text,
    /// JSON for scripting
    Json,
    /// CSV, one row per duplicate
    Csv,
}

impl OutputFormat {
    /// Whether the format is meant for other programs.
    #[must_use]
    pub fn is_machine_readable(self) -> bool {
        !matches!(self, Self::Text)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a finite, non-negative real number.
///
/// # Examples
///
/// ```
/// use geodupe::cli::parse_non_negative;
///
/// assert_eq!(parse_non_negative("0.01").unwrap(), 0.01);
/// assert!(parse_non_negative("-1").is_err());
/// ```
///
/// # Errors
///
/// Returns an error if the string is not a number, is negative, or is not finite.
pub fn parse_non_negative(s: &str) -> Result<f64, String> {
    let s = s.trim();
    let value: f64 = s.parse().map_err(|_| format!("Invalid number: '{s}'"))?;
    if !value.is_finite() {
        return Err(format!("Value must be finite: '{s}'"));
    }
    if value < 0.0 {
        return Err("Value cannot be negative".to_string());
    }
    Ok(value)
}

/// Parse an angle in degrees within `[0, 180]`.
///
/// # Errors
///
/// Returns an error if the string is not a number or lies outside the range.
pub fn parse_angle(s: &str) -> Result<f64, String> {
    let value = parse_non_negative(s)?;
    if value > 180.0 {
        return Err(format!("Angle must be at most 180 degrees, got {value}"));
    }
    Ok(value)
}
