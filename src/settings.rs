use crate::error::{DashboardError, Result};
use crate::utils::constants::{
    CHART_TITLE, COMPRESSION_SNAPPY, DEFAULT_CACHE_CAPACITY, DEFAULT_CHART_HEIGHT,
    DEFAULT_CHART_WIDTH, DEFAULT_INDEX_COLUMN, DEFAULT_INPUT_FILE, HISTOGRAM_BINS,
    REPORT_CONTAINER_HEIGHT_PX,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

/// Base name of the optional configuration file in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "dashboard";

/// Environment variable prefix, e.g. `WEATHER_DASHBOARD_CACHE_CAPACITY=0`
pub const ENV_PREFIX: &str = "WEATHER_DASHBOARD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DashboardConfig {
    pub input_path: PathBuf,

    #[validate(length(min = 1))]
    pub index_column: String,

    #[validate(length(equal = 1))]
    pub delimiter: String,

    #[validate(range(max = 4096))]
    pub cache_capacity: usize,

    #[validate(range(min = 200, max = 8000))]
    pub chart_width: u32,

    #[validate(range(min = 200, max = 8000))]
    pub chart_height: u32,

    #[validate(length(min = 1))]
    pub chart_title: String,

    #[validate(range(min = 1, max = 100))]
    pub histogram_bins: usize,

    #[validate(range(min = 100, max = 10000))]
    pub report_height: u32,

    pub compression: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_FILE),
            index_column: DEFAULT_INDEX_COLUMN.to_string(),
            delimiter: ",".to_string(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            chart_width: DEFAULT_CHART_WIDTH,
            chart_height: DEFAULT_CHART_HEIGHT,
            chart_title: CHART_TITLE.to_string(),
            histogram_bins: HISTOGRAM_BINS,
            report_height: REPORT_CONTAINER_HEIGHT_PX,
            compression: COMPRESSION_SNAPPY.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Layer defaults, the config file and `WEATHER_DASHBOARD_*` variables.
    ///
    /// An explicit `path` must exist; otherwise `dashboard.toml` (or any
    /// format `config` recognises under that base name) is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        builder = match path {
            Some(path) => {
                debug!("Reading configuration from {}", path.display());
                builder.add_source(File::from(path).required(true))
            }
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings: Self = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [byte] => Ok(*byte),
            _ => Err(DashboardError::Config(format!(
                "Delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ))),
        }
    }
}
