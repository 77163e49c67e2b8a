use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Json},
};
use chrono::NaiveDate;
use common::{ClimateVariable, CombinedSeries, DateRange, ForecastLookup};
use compute::{combine_series, default_range, export_file_name, export_forecast_csv, resolve_forecast, ComputeError};
use tracing::{debug, info, instrument, trace};

use crate::error::{ApiQuery, AppError};
use crate::handlers::variables::parse_variable;
use crate::schemas::{ApiResponse, AppState, CachedData, LookupQuery, SeriesQuery};

/// Fills the missing bounds of a filter with the dataset's default range.
pub fn effective_range(state: &AppState, start: Option<NaiveDate>, end: Option<NaiveDate>) -> DateRange {
    let fallback = default_range(&state.dataset).unwrap_or(DateRange::new(NaiveDate::MIN, NaiveDate::MAX));
    DateRange::new(start.unwrap_or(fallback.start), end.unwrap_or(fallback.end))
}

/// Combined series for `variable` within `range`, memoized per filter.
pub async fn cached_series(
    state: &AppState,
    variable: ClimateVariable,
    range: DateRange,
) -> Result<CombinedSeries, ComputeError> {
    let cache_key = format!("series_{}_{}_{}", variable.code(), range.start, range.end);
    if let Some(CachedData::Series(series)) = state.cache.get(&cache_key).await {
        trace!("Combined series for {} served from cache", variable);
        return Ok(series);
    }

    let series = combine_series(&state.dataset, variable, range)?;
    state.cache.insert(cache_key, CachedData::Series(series.clone())).await;
    Ok(series)
}

/// Look up the forecast of a variable for the month containing a date
#[utoipa::path(
    get,
    path = "/api/v1/variables/{code}/lookup",
    tag = "forecast",
    params(
        ("code" = String, Path, description = "Variable code, e.g. RR"),
        LookupQuery,
    ),
    responses(
        (status = 200, description = "Forecast found (wrapped in ApiResponse)", body = ForecastLookup),
        (status = 400, description = "Unknown variable code or malformed date", body = ErrorResponse),
        (status = 404, description = "No forecast for that period", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn lookup_forecast(
    Path(code): Path<String>,
    ApiQuery(query): ApiQuery<LookupQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ForecastLookup>>, AppError> {
    trace!("Entering lookup_forecast function");
    let variable = parse_variable(&code)?;
    let lookup = resolve_forecast(&state.dataset, variable, query.date)?;
    debug!("Resolved {} {} to period {}", variable, query.date, lookup.period);

    Ok(Json(ApiResponse::ok(lookup, "Forecast retrieved successfully")))
}

/// Get the historical and forecast series of a variable within a date range
#[utoipa::path(
    get,
    path = "/api/v1/variables/{code}/series",
    tag = "forecast",
    params(
        ("code" = String, Path, description = "Variable code, e.g. RR"),
        SeriesQuery,
    ),
    responses(
        (status = 200, description = "Combined series, chronological (wrapped in ApiResponse)", body = CombinedSeries),
        (status = 400, description = "Unknown variable code or malformed date", body = ErrorResponse),
        (status = 404, description = "Variable missing from the data", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_series(
    Path(code): Path<String>,
    ApiQuery(query): ApiQuery<SeriesQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CombinedSeries>>, AppError> {
    trace!("Entering get_series function");
    let variable = parse_variable(&code)?;
    let range = effective_range(&state, query.start_date, query.end_date);
    let series = cached_series(&state, variable, range).await?;
    debug!("Returning {} points for {}", series.len(), variable);

    Ok(Json(ApiResponse::ok(series, "Series retrieved successfully")))
}

/// Download the forecast rows of a variable as CSV
#[utoipa::path(
    get,
    path = "/api/v1/variables/{code}/export",
    tag = "forecast",
    params(
        ("code" = String, Path, description = "Variable code, e.g. RR"),
        SeriesQuery,
    ),
    responses(
        (status = 200, description = "CSV attachment named forecast_{code}.csv", content_type = "text/csv", body = String),
        (status = 400, description = "Unknown variable code or malformed date", body = ErrorResponse),
        (status = 404, description = "Variable missing from the forecast table", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn export_forecast(
    Path(code): Path<String>,
    ApiQuery(query): ApiQuery<SeriesQuery>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    trace!("Entering export_forecast function");
    let variable = parse_variable(&code)?;

    let range = match (query.start_date, query.end_date) {
        (None, None) => None,
        (start, end) => Some(effective_range(&state, start, end)),
    };
    let csv = export_forecast_csv(&state.dataset, variable, range)?;
    let file_name = export_file_name(variable);
    info!("Exporting {} ({} bytes)", file_name, csv.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file_name)),
        ],
        csv,
    ))
}
