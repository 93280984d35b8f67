// Configuration loading and parsing (rasboard.toml).
//
// Lookup order: `<base>/config/rasboard.toml`, then the per-user config
// directory, then built-in defaults. Every section and key is optional.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::dataset::{PageSize, DEFAULT_PAGE_SIZE};
use crate::loader::DataSource;

pub const CONFIG_FILE_NAME: &str = "rasboard.toml";
/// Positions with fewer players are left out of the position summary.
pub const DEFAULT_MIN_POSITION_PLAYERS: usize = 3;

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
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub data: DataPaths,
    pub table: TableConfig,
    pub analysis: AnalysisConfig,
    /// File the config was read from; `None` for built-in defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Where each static resource lives: a file path or an http(s) URL.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataPaths {
    pub players: String,
    pub correlations: String,
    pub predictions: String,
    /// Raw scrape export; used instead of `players` when set.
    pub players_csv: Option<String>,
}

impl Default for DataPaths {
    fn default() -> Self {
        DataPaths {
            players: "data/processed_data.json".to_string(),
            correlations: "data/measurement_correlation.json".to_string(),
            predictions: "data/ml_predictions.json".to_string(),
            players_csv: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TableConfig {
    pub page_size: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Positions with fewer players are left out of the position summary.
    pub min_position_players: usize,
    /// Positions dropped before aggregation (generic "DB" rows by default).
    pub excluded_positions: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            min_position_players: DEFAULT_MIN_POSITION_PLAYERS,
            excluded_positions: vec!["DB".to_string()],
        }
    }
}

impl Config {
    /// Validated page size. `load_config_from` has already rejected zero.
    pub fn page_size(&self) -> PageSize {
        PageSize::new(self.table.page_size).unwrap_or_default()
    }

    pub fn players_source(&self) -> DataSource {
        match &self.data.players_csv {
            Some(csv) => DataSource::parse(csv),
            None => DataSource::parse(&self.data.players),
        }
    }

    pub fn correlations_source(&self) -> DataSource {
        DataSource::parse(&self.data.correlations)
    }

    pub fn predictions_source(&self) -> DataSource {
        DataSource::parse(&self.data.predictions)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Parse and validate config text. `path` is only used in error messages.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    config.source = Some(path.to_path_buf());
    validate(&config)?;
    Ok(config)
}

/// Load config from `<base_dir>/config/rasboard.toml`, falling back to the
/// user config directory and then to defaults.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let candidates = [Some(base_dir.join("config").join(CONFIG_FILE_NAME)), user_config_path()];

    for path in candidates.into_iter().flatten() {
        if !path.exists() {
            debug!("no config at {}", path.display());
            continue;
        }
        let text = read_file(&path)?;
        let config = parse_config(&text, &path)?;
        info!("Loaded config from {}", path.display());
        return Ok(config);
    }

    info!("No config file found, using defaults");
    Ok(Config::default())
}

/// Convenience wrapper: loads config relative to the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_from(&cwd)
}

/// `<user config dir>/rasboard.toml`, if the platform has one.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "rasboard")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.table.page_size == 0 {
        return Err(ConfigError::ValidationError {
            field: "table.page_size".into(),
            message: "must be greater than 0".into(),
        });
    }

    let data_fields: &[(&str, &str)] = &[
        ("data.players", &config.data.players),
        ("data.correlations", &config.data.correlations),
        ("data.predictions", &config.data.predictions),
    ];
    for (name, val) in data_fields {
        if val.trim().is_empty() {
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rasboard_config_{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("config")).unwrap();
        dir
    }

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.table.page_size, 20);
        assert_eq!(config.data.players, "data/processed_data.json");
        assert_eq!(config.analysis.excluded_positions, vec!["DB"]);
        assert_eq!(config.analysis.min_position_players, 3);
        assert!(config.source.is_none());
    }

    #[test]
    fn parse_full_file() {
        let text = r#"
            [data]
            players = "https://example.com/data/processed_data.json"
            correlations = "data/corr.json"
            predictions = "data/preds.json"
            players_csv = "data/pro_bowlers_ras.csv"

            [table]
            page_size = 25

            [analysis]
            min_position_players = 3
            excluded_positions = []
        "#;
        let config = parse_config(text, Path::new("rasboard.toml")).unwrap();
        assert_eq!(config.table.page_size, 25);
        assert_eq!(config.page_size().get(), 25);
        assert_eq!(config.analysis.min_position_players, 3);
        assert!(config.analysis.excluded_positions.is_empty());
        assert_eq!(
            config.players_source(),
            DataSource::File(PathBuf::from("data/pro_bowlers_ras.csv"))
        );
        assert_eq!(
            config.correlations_source(),
            DataSource::File(PathBuf::from("data/corr.json"))
        );
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = parse_config("[table]\npage_size = 10\n", Path::new("x.toml")).unwrap();
        assert_eq!(config.table.page_size, 10);
        assert_eq!(config.data, DataPaths::default());
        assert_eq!(config.analysis, AnalysisConfig::default());
    }

    #[test]
    fn http_source_is_detected() {
        let config = parse_config(
            "[data]\nplayers = \"http://localhost:8000/processed_data.json\"\n",
            Path::new("x.toml"),
        )
        .unwrap();
        assert_eq!(
            config.players_source(),
            DataSource::Http("http://localhost:8000/processed_data.json".to_string())
        );
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = parse_config("[table]\npage_size = 0\n", Path::new("x.toml")).unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "table.page_size"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn empty_data_path_is_rejected() {
        let err = parse_config("[data]\npredictions = \" \"\n", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "data.predictions"));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = parse_config("[table\npage_size = ", Path::new("broken.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn load_from_base_dir() {
        let dir = scratch_dir("load_from_base_dir");
        fs::write(
            dir.join("config").join(CONFIG_FILE_NAME),
            "[table]\npage_size = 7\n",
        )
        .unwrap();
        let config = load_config_from(&dir).unwrap();
        assert_eq!(config.table.page_size, 7);
        assert_eq!(config.source, Some(dir.join("config").join(CONFIG_FILE_NAME)));
        let _ = fs::remove_dir_all(&dir);
    }
}
