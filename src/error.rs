use axum::{
    extract::{rejection::QueryRejection, FromRequestParts, Query},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use common::{ClimateVariable, ParseVariableError};
use compute::ComputeError;
use thiserror::Error;
use tracing::{error, warn};

use crate::schemas::ErrorResponse;

/// Errors surfaced by the JSON API.
#[derive(Debug, Error)]
pub enum AppError {
    /// The variable selector holds an unknown code
    #[error(transparent)]
    InvalidVariable(#[from] ParseVariableError),

    /// The evaluation metrics file has no row for the variable
    #[error("No evaluation metrics for {0}")]
    MetricsNotFound(ClimateVariable),

    /// A query parameter is empty or malformed
    #[error("Invalid query parameters: {}", .0.body_text())]
    InvalidQuery(#[from] QueryRejection),

    #[error(transparent)]
    Compute(#[from] ComputeError),
}

/// `Query` for the JSON API: a rejected query string answers with the same
/// `ErrorResponse` body as every other API error.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

impl AppError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidVariable(_) => (StatusCode::BAD_REQUEST, "INVALID_VARIABLE"),
            AppError::MetricsNotFound(_) => (StatusCode::NOT_FOUND, "METRICS_NOT_FOUND"),
            AppError::InvalidQuery(_) => (StatusCode::BAD_REQUEST, "INVALID_QUERY"),
            AppError::Compute(e) => match e {
                ComputeError::PeriodNotFound { .. } => (StatusCode::NOT_FOUND, "PERIOD_NOT_FOUND"),
                ComputeError::VariableNotFound { .. } => (StatusCode::NOT_FOUND, "VARIABLE_NOT_FOUND"),
                ComputeError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected with {}: {}", code, self);
        }
        (status, Json(ErrorResponse::new(self.to_string(), code))).into_response()
    }
}
