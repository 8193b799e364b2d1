//! Application configuration management.
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. TOML config file (platform config dir, or `--config`)
//! 3. `GEODUPE_*` environment variables
//! 4. CLI flags, merged by [`Config::merge_scan_args`]
//!
//! Unknown keys in the file are ignored with a warning that suggests the
//! closest known key.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{OutputFormat, ScanArgs};
use crate::duplicates::ResolveOrder;

/// Prefix for environment overrides, e.g. `GEODUPE_DISTANCE_TOLERANCE`.
pub const ENV_PREFIX: &str = "GEODUPE_";

/// Keys accepted in the config file.
pub const KNOWN_KEYS: &[&str] = &[
    "distance_tolerance",
    "angle_tolerance_degrees",
    "resolve_order",
    "interactive",
    "output",
];

/// Minimum Jaro-Winkler similarity for a key suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Distance tolerance; unset means the scene's absolute tolerance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_tolerance: Option<f64>,
    /// Angle tolerance in degrees.
    pub angle_tolerance_degrees: f64,
    /// Candidate resolution order.
    pub resolve_order: ResolveOrder,
    /// Prompt for tolerances on the terminal.
    pub interactive: bool,
    /// Output format.
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            distance_tolerance: None,
            angle_tolerance_degrees: 1.0,
            resolve_order: ResolveOrder::Ascending,
            interactive: false,
            output: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Load from `explicit` if given, otherwise from the platform path.
    ///
    /// Never fails: problems are logged and defaults are used.
    #[must_use]
    pub fn load(explicit: Option<&Path>) -> Self {
        match explicit.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load_from_path(&path),
            None => {
                log::debug!("No config directory available, using defaults");
                Self::figment(None).extract().unwrap_or_default()
            }
        }
    }

    /// Load from a specific file, falling back to defaults on error.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        match Self::try_load_from_path(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config file {}: {e:#}", path.display());
                Self::default()
            }
        }
    }

    /// Load from a specific file.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read, or a value has the
    /// wrong type.
    pub fn try_load_from_path(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            for warning in unknown_key_warnings(&content) {
                log::warn!("{}: {warning}", path.display());
            }
            Self::figment(Some(path))
                .extract()
                .with_context(|| format!("Invalid configuration in {}", path.display()))
        } else {
            log::debug!("Config file {} not found, using defaults", path.display());
            Ok(Self::figment(None).extract()?)
        }
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Apply explicit scan flags on top of the loaded settings.
    pub fn merge_scan_args(&mut self, args: &ScanArgs) {
        if let Some(d) = args.distance_tol {
            self.distance_tolerance = Some(d);
        }
        if let Some(a) = args.angle_tol {
            self.angle_tolerance_degrees = a;
        }
        if let Some(order) = args.order {
            self.resolve_order = order;
        }
        if let Some(output) = args.output {
            self.output = output;
        }
        if args.interactive {
            self.interactive = true;
        }
    }

    /// Write the configuration as TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Fails if serialization or the write fails.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Platform config file path, e.g. `~/.config/geodupe/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "geodupe", "geodupe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Warnings for top-level keys that are not configuration keys.
///
/// Unparsable content yields no warnings; figment reports it instead.
#[must_use]
pub fn unknown_key_warnings(content: &str) -> Vec<String> {
    let Ok(table) = content.parse::<toml::Table>() else {
        return Vec::new();
    };
    table
        .keys()
        .filter(|k| !KNOWN_KEYS.contains(&k.as_str()))
        .map(|k| match suggest_key(k) {
            Some(s) => format!("unknown key '{k}', did you mean '{s}'?"),
            None => format!("unknown key '{k}'"),
        })
        .collect()
}

fn suggest_key(key: &str) -> Option<&'static str> {
    KNOWN_KEYS
        .iter()
        .map(|known| (*known, strsim::jaro_winkler(key, known)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(known, _)| known)
}
