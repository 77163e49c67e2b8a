use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use common::ResearcherProfile;
use compute::{load_dataset, ComputeError, DataSources, InputKind};
use config::{Config, Environment, File};
use moka::future::Cache;
use serde::Deserialize;

use crate::schemas::AppState;

/// Optional settings file looked up in the working directory (any format
/// supported by the `config` crate, e.g. `meteocast.toml`).
pub const SETTINGS_FILE: &str = "meteocast";

/// Prefix of environment overrides, e.g. `METEOCAST__CACHE__TTL_SECS=60`.
pub const ENV_PREFIX: &str = "METEOCAST";

/// Application settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the six input files
    pub data_dir: PathBuf,
    /// Bind address for the web server
    pub bind_address: String,
    pub files: FileNames,
    pub cache: CacheSettings,
    pub profile: ResearcherProfile,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            bind_address: "0.0.0.0:3000".to_string(),
            files: FileNames::default(),
            cache: CacheSettings::default(),
            profile: ResearcherProfile::default(),
        }
    }
}

/// File names of the inputs, relative to `data_dir` unless absolute.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileNames {
    pub historical: String,
    pub forecast: String,
    pub metrics: String,
    pub metadata: String,
    pub test_actual: String,
    pub test_predicted: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            historical: InputKind::Historical.default_file_name().to_string(),
            forecast: InputKind::Forecast.default_file_name().to_string(),
            metrics: InputKind::Metrics.default_file_name().to_string(),
            metadata: InputKind::Metadata.default_file_name().to_string(),
            test_actual: InputKind::TestActual.default_file_name().to_string(),
            test_predicted: InputKind::TestPredicted.default_file_name().to_string(),
        }
    }
}

impl FileNames {
    fn get(&self, kind: InputKind) -> &str {
        match kind {
            InputKind::Historical => &self.historical,
            InputKind::Forecast => &self.forecast,
            InputKind::Metrics => &self.metrics,
            InputKind::Metadata => &self.metadata,
            InputKind::TestActual => &self.test_actual,
            InputKind::TestPredicted => &self.test_predicted,
        }
    }
}

/// Memoization of rendered pages and combined series.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub max_capacity: u64,
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_capacity: 1000,
            ttl_secs: 300,
        }
    }
}

impl Settings {
    /// Layers defaults, the optional settings file and `METEOCAST__*`
    /// environment variables (after reading `.env`).
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = Config::builder()
            .add_source(File::with_name(SETTINGS_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize::<Settings>()
            .context("Invalid configuration")?;

        tracing::debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    /// Applies command line overrides.
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, bind_address: Option<String>) -> Self {
        if let Some(data_dir) = data_dir {
            self.data_dir = data_dir;
        }
        if let Some(bind_address) = bind_address {
            self.bind_address = bind_address;
        }
        self
    }

    /// Full paths of the six inputs.
    pub fn data_sources(&self) -> DataSources {
        let mut sources = DataSources::in_dir(&self.data_dir);
        for kind in InputKind::ALL {
            let name = self.files.get(kind);
            let path = if Path::new(name).is_absolute() {
                PathBuf::from(name)
            } else {
                self.data_dir.join(name)
            };
            sources.set_path(kind, path);
        }
        sources
    }
}

/// Loads the dataset and builds the state shared by all handlers.
pub fn initialize_app_state(settings: Settings) -> std::result::Result<AppState, ComputeError> {
    let sources = settings.data_sources();
    tracing::info!("Loading data from {}", settings.data_dir.display());
    let dataset = load_dataset(&sources)?;

    let cache = Cache::builder()
        .max_capacity(settings.cache.max_capacity)
        .time_to_live(Duration::from_secs(settings.cache.ttl_secs))
        .build();

    Ok(AppState {
        dataset: Arc::new(dataset),
        settings: Arc::new(settings),
        cache,
    })
}
