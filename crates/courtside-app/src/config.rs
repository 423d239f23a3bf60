// Configuration loading and parsing (config/courtside.toml).

use std::path::{Path, PathBuf};

use courtside_core::ComparatorOptions;
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE: &str = "courtside.toml";

// ---------------------------------------------------------------------------
// Error types
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

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub comparator: ComparatorOptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Directory holding the CSV exports, relative to the base directory
    /// unless absolute.
    pub dir: String,
    #[serde(default)]
    pub files: DataFiles,
}

/// CSV file names inside the data directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataFiles {
    pub players: String,
    pub player_seasons: String,
    pub team_seasons: String,
    pub league_averages: String,
    pub draft_combine: String,
    pub shot_distance: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        DataFiles {
            players: "players.csv".into(),
            player_seasons: "player_seasons.csv".into(),
            team_seasons: "team_seasons.csv".into(),
            league_averages: "league_averages.csv".into(),
            draft_combine: "draft_combine.csv".into(),
            shot_distance: "shot_distance.csv".into(),
        }
    }
}

impl Config {
    /// Resolve the data directory against `base_dir`.
    pub fn data_dir(&self, base_dir: &Path) -> PathBuf {
        let dir = Path::new(&self.data.dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            base_dir.join(dir)
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/courtside.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()` for that.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Copy `defaults/*.toml` into `config/` for any file not already there.
/// Returns the list of files that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() || path.extension().map_or(true, |ext| ext != "toml") {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = config_dir.join(file_name);
        if target.exists() {
            continue;
        }
        std::fs::copy(&path, &target).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to copy {}: {e}", path.display()),
        })?;
        copied.push(target);
    }

    Ok(copied)
}

/// Load config relative to `base_dir`, copying defaults first.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.data.dir.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.dir".into(),
            message: "must not be empty".into(),
        });
    }

    let f = &config.data.files;
    let file_fields: &[(&str, &str)] = &[
        ("data.files.players", f.players.as_str()),
        ("data.files.player_seasons", f.player_seasons.as_str()),
        ("data.files.team_seasons", f.team_seasons.as_str()),
        ("data.files.league_averages", f.league_averages.as_str()),
        ("data.files.draft_combine", f.draft_combine.as_str()),
        ("data.files.shot_distance", f.shot_distance.as_str()),
    ];
    for (name, value) in file_fields {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
