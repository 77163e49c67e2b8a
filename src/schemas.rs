use std::sync::Arc;

use chrono::NaiveDate;
use common::{
    ClimateVariable, CombinedSeries, DatasetSummary, DateRange, EvaluationMetrics, ForecastLookup,
    HistogramBin, MetadataEntry, ProfileDto, ResearcherProfile, ResidualPoint, ResidualReport,
    SeriesOrigin, SeriesPoint, VariableDto,
};
use compute::ClimateDataset;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::config::Settings;

pub use common::ApiResponse;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// The immutable data bundle loaded at startup
    pub dataset: Arc<ClimateDataset>,
    pub settings: Arc<Settings>,
    /// Cache for rendered pages and combined series
    pub cache: Cache<String, CachedData>,
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Series(CombinedSeries),
    Page(String),
}

/// Query parameters for the combined series endpoints
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SeriesQuery {
    /// First date of the filter (YYYY-MM-DD), defaults to the first historical month
    pub start_date: Option<NaiveDate>,
    /// Last date of the filter (YYYY-MM-DD), defaults to the last forecast month
    pub end_date: Option<NaiveDate>,
}

/// Query parameters for the point lookup
#[derive(Debug, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LookupQuery {
    /// Any day of the month to look up (YYYY-MM-DD)
    pub date: NaiveDate,
}

/// Query parameters for residual diagnostics
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResidualQuery {
    /// Number of histogram bins (1-200, default 20)
    pub bins: Option<usize>,
}

/// Controls of the dashboard view, kept as submitted by the form. Empty
/// fields count as absent.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DashboardQuery {
    pub variable: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub lookup_date: Option<String>,
}

/// Controls of the residual view
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ResidualViewQuery {
    pub variable: Option<String>,
    pub bins: Option<String>,
}

/// Controls of the profile view
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ProfileViewQuery {
    pub variable: Option<String>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            success: false,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Whether the six inputs were loaded
    pub data: String,
    /// Shape of the loaded dataset
    pub summary: Option<DatasetSummary>,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::variables::list_variables,
        crate::handlers::variables::get_metrics,
        crate::handlers::forecast::lookup_forecast,
        crate::handlers::forecast::get_series,
        crate::handlers::forecast::export_forecast,
        crate::handlers::residuals::get_residuals,
        crate::handlers::profile::get_profile,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            ClimateVariable,
            VariableDto,
            EvaluationMetrics,
            ForecastLookup,
            DateRange,
            SeriesOrigin,
            SeriesPoint,
            CombinedSeries,
            ResidualPoint,
            HistogramBin,
            ResidualReport,
            MetadataEntry,
            ResearcherProfile,
            ProfileDto,
            DatasetSummary,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "variables", description = "Climate variables and evaluation metrics"),
        (name = "forecast", description = "Forecast lookup, combined series and export"),
        (name = "residuals", description = "Residual diagnostics on the test window"),
        (name = "profile", description = "Researcher profile and model metadata"),
    ),
    info(
        title = "MeteoCast API",
        description = "Palembang climate forecast dashboard - historical observations, 20-year LSTM forecasts and model diagnostics",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
