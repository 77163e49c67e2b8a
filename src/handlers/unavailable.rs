//! Responses served when the input files could not be loaded at startup.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Json, Response},
};
use tracing::warn;

use crate::helpers::html::unavailable_page;
use crate::schemas::ErrorResponse;

/// Every path answers 503: JSON for the API and health check, the blocking
/// notice page for everything else.
pub async fn data_unavailable(State(reason): State<Arc<String>>, uri: Uri) -> Response {
    warn!("Rejecting {} because the data is unavailable", uri.path());

    let path = uri.path();
    if path.starts_with("/api") || path == "/health" {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new(reason.as_str(), "DATA_UNAVAILABLE")),
        )
            .into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Html(unavailable_page(&reason))).into_response()
    }
}
