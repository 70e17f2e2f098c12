use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Theme;
use crate::data::filter::EmptySelection;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("configuration error: {0}")]
    Invalid(String),
}

/// Dashboard settings. Every field has a default, so a config file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Dataset opened at startup when no path is given on the command line.
    pub dataset_path: Option<PathBuf>,
    /// Age slider always reaches at least this value.
    pub age_ceiling_floor: f64,
    /// Fare slider always reaches at least this value.
    pub fare_ceiling_floor: f64,
    pub empty_selection: EmptySelection,
    pub theme: Theme,
    /// Length of the "top age groups by survivors" ranking.
    pub top_age_groups: usize,
    /// Length of the "top fares" table.
    pub top_fares: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            age_ceiling_floor: 80.0,
            fare_ceiling_floor: 600.0,
            empty_selection: EmptySelection::PassThrough,
            theme: Theme::Blues,
            top_age_groups: 5,
            top_fares: 10,
        }
    }
}

impl DashboardConfig {
    pub fn from_json(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: DashboardConfig =
            serde_json::from_str(text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("age_ceiling_floor", self.age_ceiling_floor),
            ("fare_ceiling_floor", self.fare_ceiling_floor),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}
