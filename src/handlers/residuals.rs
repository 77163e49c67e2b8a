use axum::{
    extract::{Path, State},
    response::Json,
};
use common::ResidualReport;
use compute::{analyze_residuals, DEFAULT_HISTOGRAM_BINS};
use tracing::{debug, instrument, trace};

use crate::error::{ApiQuery, AppError};
use crate::handlers::variables::parse_variable;
use crate::schemas::{ApiResponse, AppState, ResidualQuery};

/// Get the residual diagnostics of a variable over the test window
#[utoipa::path(
    get,
    path = "/api/v1/variables/{code}/residuals",
    tag = "residuals",
    params(
        ("code" = String, Path, description = "Variable code, e.g. RR"),
        ResidualQuery,
    ),
    responses(
        (status = 200, description = "Residual points and histogram (wrapped in ApiResponse)", body = ResidualReport),
        (status = 400, description = "Unknown variable code or bin count out of range", body = ErrorResponse),
        (status = 404, description = "Variable missing from the test tables", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_residuals(
    Path(code): Path<String>,
    ApiQuery(query): ApiQuery<ResidualQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ResidualReport>>, AppError> {
    trace!("Entering get_residuals function");
    let variable = parse_variable(&code)?;
    let bins = query.bins.unwrap_or(DEFAULT_HISTOGRAM_BINS);

    let report = analyze_residuals(&state.dataset, variable, bins)?;
    debug!(
        "Residual report for {}: {} points, {} dropped",
        variable,
        report.points.len(),
        report.dropped_periods
    );

    Ok(Json(ApiResponse::ok(report, "Residuals computed successfully")))
}
