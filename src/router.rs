use crate::handlers::{
    forecast::{export_forecast, get_series, lookup_forecast},
    health::health_check,
    profile::get_profile,
    residuals::get_residuals,
    unavailable::data_unavailable,
    variables::{get_metrics, list_variables},
    views::{dashboard_view, profile_view, residuals_view},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn middleware<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(TimeoutLayer::new(Duration::from_secs(30)))
            .layer(CorsLayer::permissive()),
    )
}

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        // HTML views
        .route("/", get(dashboard_view))
        .route("/residuals", get(residuals_view))
        .route("/profile", get(profile_view))
        // Health check
        .route("/health", get(health_check))
        // Variables and metrics
        .route("/api/v1/variables", get(list_variables))
        .route("/api/v1/variables/:code/metrics", get(get_metrics))
        // Forecast lookup, combined series and export
        .route("/api/v1/variables/:code/lookup", get(lookup_forecast))
        .route("/api/v1/variables/:code/series", get(get_series))
        .route("/api/v1/variables/:code/export", get(export_forecast))
        // Diagnostics and profile
        .route("/api/v1/variables/:code/residuals", get(get_residuals))
        .route("/api/v1/profile", get(get_profile))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    middleware(router).with_state(state)
}

/// Router used when the input files could not be loaded: every request gets
/// the same 503 notice.
pub fn create_unavailable_router(reason: impl Into<String>) -> Router {
    let router = Router::new().fallback(data_unavailable);
    middleware(router).with_state(Arc::new(reason.into()))
}
