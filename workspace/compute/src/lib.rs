//! Data loading and the small amount of computation behind the dashboard:
//! resolving a date to a forecast period, assembling the historical plus
//! forecast series, residual diagnostics and the forecast CSV export.

pub mod combine;
pub mod dataset;
pub mod error;
pub mod export;
pub mod loader;
pub mod period;
pub mod residual;
pub mod sources;
pub mod table;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use combine::{combine_series, default_range};
pub use dataset::ClimateDataset;
pub use error::{ComputeError, Result};
pub use export::{export_file_name, export_forecast_csv};
pub use loader::load_dataset;
pub use period::{period_key, resolve_forecast, ForecastWindow};
pub use residual::{analyze_residuals, histogram, DEFAULT_HISTOGRAM_BINS};
pub use sources::{DataSources, InputKind};
pub use table::MonthlyTable;
