//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use txflow_analysis::AnalysisConfig;
use txflow_domain::MetricKind;

/// Allowed leaderboard sizes
pub const TOP_N_RANGE: (usize, usize) = (5, 1000);

/// Allowed node size factors
pub const NODE_SIZE_RANGE: (f64, f64) = (10.0, 1000.0);

/// Allowed edge width factors
pub const EDGE_WIDTH_RANGE: (f64, f64) = (0.1, 10.0);

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name
    #[serde(default = "default_profile")]
    pub active_profile: String,

    /// Available profiles
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Initial view parameters
    #[serde(default)]
    pub defaults: Defaults,

    /// Metric engine and insight settings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// File this configuration was loaded from
    #[serde(skip)]
    location: Option<PathBuf>,
}

/// Named transaction data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Path of the CSV, JSON or spreadsheet transaction table
    pub source: PathBuf,

    /// Bank whose customers are retention candidates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_bank: Option<String>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Command history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Starting values of the adjustable view parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Leaderboard size
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Ranking metric slug
    #[serde(default = "default_metric")]
    pub metric: String,

    /// Render node size factor
    #[serde(default = "default_node_size_factor")]
    pub node_size_factor: f64,

    /// Render edge width factor
    #[serde(default = "default_edge_width_factor")]
    pub edge_width_factor: f64,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".txflow").join("config.toml"))
    }

    /// Load configuration from the default path or create default.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)?;
            toml::from_str::<Config>(&contents)?
        } else {
            Self::default()
        };
        config.location = Some(path.to_path_buf());
        Ok(config)
    }

    /// Save configuration to the file it was loaded from.
    pub fn save(&self) -> Result<()> {
        let path = match &self.location {
            Some(path) => path.clone(),
            None => Self::path()?,
        };

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// Get the active profile.
    pub fn get_active_profile(&self) -> Result<&Profile> {
        self.profiles
            .get(&self.active_profile)
            .ok_or_else(|| CliError::Config(format!("Profile '{}' not found", self.active_profile)))
    }

    /// Add or update a profile.
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Switch to a different profile.
    pub fn switch_profile(&mut self, name: String) -> Result<()> {
        if !self.profiles.contains_key(&name) {
            return Err(CliError::Config(format!("Profile '{}' does not exist", name)));
        }
        self.active_profile = name;
        Ok(())
    }
}

impl Defaults {
    /// The configured ranking metric.
    pub fn metric_kind(&self) -> Result<MetricKind> {
        MetricKind::parse(&self.metric)
            .ok_or_else(|| CliError::Config(format!("Unknown metric '{}'", self.metric)))
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            "default".to_string(),
            Profile {
                source: PathBuf::from("transactions.csv"),
                home_bank: None,
            },
        );

        Self {
            active_profile: "default".to_string(),
            profiles,
            settings: Settings::default(),
            defaults: Defaults::default(),
            analysis: AnalysisConfig::default(),
            location: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: 1000,
        }
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            metric: default_metric(),
            node_size_factor: default_node_size_factor(),
            edge_width_factor: default_edge_width_factor(),
        }
    }
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_history_size() -> usize {
    1000
}

fn default_top_n() -> usize {
    20
}

fn default_metric() -> String {
    MetricKind::Degree.as_str().to_string()
}

fn default_node_size_factor() -> f64 {
    300.0
}

fn default_edge_width_factor() -> f64 {
    1.0
}
