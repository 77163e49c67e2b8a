use std::collections::BTreeMap;

use common::{ClimateVariable, DatasetSummary, EvaluationMetrics, MetadataEntry};

use crate::period::ForecastWindow;
use crate::table::MonthlyTable;

/// Everything the dashboard shows, loaded once and never mutated.
///
/// Only [`crate::loader::load_dataset`] produces a bundle from files, and it
/// does so all-or-nothing, so holding a `ClimateDataset` means all six
/// inputs were read successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateDataset {
    pub historical: MonthlyTable,
    pub forecast: MonthlyTable,
    pub metrics: BTreeMap<ClimateVariable, EvaluationMetrics>,
    pub metadata: Vec<MetadataEntry>,
    pub test_actual: MonthlyTable,
    pub test_predicted: MonthlyTable,
}

impl ClimateDataset {
    pub fn metrics_for(&self, variable: ClimateVariable) -> Option<&EvaluationMetrics> {
        self.metrics.get(&variable)
    }

    /// Bounds of the point lookup control.
    pub fn forecast_window(&self) -> Option<ForecastWindow> {
        ForecastWindow::from_table(&self.forecast)
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            historical_range: self.historical.date_range(),
            historical_rows: self.historical.len(),
            forecast_range: self.forecast.date_range(),
            forecast_rows: self.forecast.len(),
            test_rows: self.test_actual.len(),
            variables_with_metrics: self.metrics.keys().map(|v| v.code().to_string()).collect(),
            metadata_entries: self.metadata.len(),
        }
    }
}
