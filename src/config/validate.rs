use thiserror::Error;

use super::schema::Config;
use crate::render::{MAX_PLOT_DIMENSION, MIN_PLOT_DIMENSION};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Validation(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.plot_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "plot_dir must not be empty".to_string(),
            ));
        }
        validate_dimension("plots.width", self.plots.width)?;
        validate_dimension("plots.height", self.plots.height)?;
        if self.plots.padding > self.plots.width.min(self.plots.height) / 2 {
            return Err(ConfigError::Validation(
                "plots.padding must leave room for the drawing area".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_dimension(field: &str, value: u32) -> Result<(), ConfigError> {
    if !(MIN_PLOT_DIMENSION..=MAX_PLOT_DIMENSION).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{} must be between {} and {}",
            field, MIN_PLOT_DIMENSION, MAX_PLOT_DIMENSION
        )));
    }
    Ok(())
}
