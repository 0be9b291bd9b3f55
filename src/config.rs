// Configuration loading and parsing (config/draftscout.toml).
//
// The season year parameterizes the input and output directories; nothing in
// the core engines ever reads it. No global state: the assembled Config is
// passed explicitly into the pipeline.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default config file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/draftscout.toml";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// TOML file structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    season: SeasonSection,
    #[serde(default)]
    pipeline: PipelineSection,
}

#[derive(Debug, Clone, Deserialize)]
struct SeasonSection {
    /// The draft year. Stats come from the prior season.
    year: u16,
    /// Override for the input data directory (default `<year-1>_data`).
    data_dir: Option<String>,
    /// Override for the output directory (default `<year>_calculations`).
    output_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct PipelineSection {
    /// Archetypes to run. Empty means all registered archetypes.
    #[serde(default)]
    archetypes: Vec<String>,
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub year: u16,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Archetype names to run; empty means all.
    pub archetypes: Vec<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load configuration from the default location.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new(DEFAULT_CONFIG_PATH))
}

/// Load and validate configuration from an explicit path.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    config_from_str(&text, path)
}

fn config_from_str(text: &str, origin: &Path) -> Result<Config, ConfigError> {
    let file: ConfigFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: origin.to_path_buf(),
        source: e,
    })?;

    let year = file.season.year;
    let data_dir = file
        .season
        .data_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("{}_data", year - 1)));
    let output_dir = file
        .season
        .output_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("{}_calculations", year)));

    let config = Config {
        year,
        data_dir,
        output_dir,
        archetypes: file.pipeline.archetypes,
    };
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if !(2000..=2100).contains(&config.year) {
        return Err(ConfigError::ValidationError {
            field: "season.year".into(),
            message: format!("{} is not a plausible draft year", config.year),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
