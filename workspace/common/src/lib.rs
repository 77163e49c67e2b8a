//! Common transport-layer types shared between the compute layer and the
//! HTTP service. Everything here is plain data that serializes to the API
//! payloads and documents itself through `utoipa`.

mod profile;
mod statistics;
mod timeseries;
mod variable;

pub use profile::{DatasetSummary, MetadataEntry, ProfileDto, ResearcherProfile};
pub use statistics::{EvaluationMetrics, HistogramBin, ResidualPoint, ResidualReport};
pub use timeseries::{CombinedSeries, DateRange, ForecastLookup, SeriesOrigin, SeriesPoint};
pub use variable::{ClimateVariable, ParseVariableError, VariableDto};

use serde::{Deserialize, Serialize};

/// Generic API response wrapper used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

impl<T> ApiResponse<T> {
    /// Wraps `data` into a successful response.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}
