use std::path::{Path, PathBuf};

pub const HISTORICAL_FILE: &str = "data processed_data monthly.csv";
pub const FORECAST_FILE: &str = "data forecast_peramalan 20 tahun semua parameter.csv";
pub const METRICS_FILE: &str = "evaluation model_metrics.csv";
pub const METADATA_FILE: &str = "metadata_model metadata.csv";
pub const TEST_ACTUAL_FILE: &str = "data dashboard_data aktual test.csv";
pub const TEST_PREDICTED_FILE: &str = "data dashboard_data prediksi test.csv";

/// The six inputs the dashboard is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Historical,
    Forecast,
    Metrics,
    Metadata,
    TestActual,
    TestPredicted,
}

impl InputKind {
    /// Load order.
    pub const ALL: [InputKind; 6] = [
        InputKind::Historical,
        InputKind::Forecast,
        InputKind::Metrics,
        InputKind::Metadata,
        InputKind::TestActual,
        InputKind::TestPredicted,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InputKind::Historical => "historical",
            InputKind::Forecast => "forecast",
            InputKind::Metrics => "metrics",
            InputKind::Metadata => "metadata",
            InputKind::TestActual => "test actuals",
            InputKind::TestPredicted => "test predictions",
        }
    }

    pub fn default_file_name(&self) -> &'static str {
        match self {
            InputKind::Historical => HISTORICAL_FILE,
            InputKind::Forecast => FORECAST_FILE,
            InputKind::Metrics => METRICS_FILE,
            InputKind::Metadata => METADATA_FILE,
            InputKind::TestActual => TEST_ACTUAL_FILE,
            InputKind::TestPredicted => TEST_PREDICTED_FILE,
        }
    }
}

/// Resolved locations of the six input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub historical: PathBuf,
    pub forecast: PathBuf,
    pub metrics: PathBuf,
    pub metadata: PathBuf,
    pub test_actual: PathBuf,
    pub test_predicted: PathBuf,
}

impl DataSources {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            historical: dir.join(HISTORICAL_FILE),
            forecast: dir.join(FORECAST_FILE),
            metrics: dir.join(METRICS_FILE),
            metadata: dir.join(METADATA_FILE),
            test_actual: dir.join(TEST_ACTUAL_FILE),
            test_predicted: dir.join(TEST_PREDICTED_FILE),
        }
    }

    pub fn path(&self, kind: InputKind) -> &Path {
        match kind {
            InputKind::Historical => &self.historical,
            InputKind::Forecast => &self.forecast,
            InputKind::Metrics => &self.metrics,
            InputKind::Metadata => &self.metadata,
            InputKind::TestActual => &self.test_actual,
            InputKind::TestPredicted => &self.test_predicted,
        }
    }

    pub fn set_path(&mut self, kind: InputKind, path: PathBuf) {
        match kind {
            InputKind::Historical => self.historical = path,
            InputKind::Forecast => self.forecast = path,
            InputKind::Metrics => self.metrics = path,
            InputKind::Metadata => self.metadata = path,
            InputKind::TestActual => self.test_actual = path,
            InputKind::TestPredicted => self.test_predicted = path,
        }
    }
}
