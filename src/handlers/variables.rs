use axum::{
    extract::{Path, State},
    response::Json,
};
use common::{ClimateVariable, EvaluationMetrics, VariableDto};
use tracing::{debug, instrument, trace};

use crate::error::AppError;
use crate::schemas::{ApiResponse, AppState};

/// Parses the `{code}` path segment.
pub fn parse_variable(code: &str) -> Result<ClimateVariable, AppError> {
    Ok(code.parse::<ClimateVariable>()?)
}

/// List the climate variables offered by the selector
#[utoipa::path(
    get,
    path = "/api/v1/variables",
    tag = "variables",
    responses(
        (status = 200, description = "Variables in selector order (wrapped in ApiResponse)", body = [VariableDto])
    )
)]
#[instrument]
pub async fn list_variables() -> Json<ApiResponse<Vec<VariableDto>>> {
    let variables = ClimateVariable::ALL.into_iter().map(VariableDto::from).collect();
    Json(ApiResponse::ok(variables, "Variables retrieved successfully"))
}

/// Get the evaluation metrics (RMSE, MAE, R²) of a variable
#[utoipa::path(
    get,
    path = "/api/v1/variables/{code}/metrics",
    tag = "variables",
    params(
        ("code" = String, Path, description = "Variable code, e.g. RR"),
    ),
    responses(
        (status = 200, description = "Metrics retrieved successfully (wrapped in ApiResponse)", body = EvaluationMetrics),
        (status = 400, description = "Unknown variable code", body = ErrorResponse),
        (status = 404, description = "No metrics for this variable", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_metrics(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<EvaluationMetrics>>, AppError> {
    trace!("Entering get_metrics function");
    let variable = parse_variable(&code)?;

    let metrics = state
        .dataset
        .metrics_for(variable)
        .copied()
        .ok_or(AppError::MetricsNotFound(variable))?;
    debug!("Metrics for {}: {:?}", variable, metrics);

    Ok(Json(ApiResponse::ok(metrics, "Metrics retrieved successfully")))
}
