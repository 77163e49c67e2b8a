use axum::{extract::State, response::Json};
use common::ProfileDto;
use tracing::instrument;

use crate::schemas::{ApiResponse, AppState};

pub fn build_profile(state: &AppState) -> ProfileDto {
    ProfileDto {
        researcher: state.settings.profile.clone(),
        metadata: state.dataset.metadata.clone(),
    }
}

/// Get the researcher profile and the model metadata
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "profile",
    responses(
        (status = 200, description = "Profile retrieved successfully (wrapped in ApiResponse)", body = ProfileDto)
    )
)]
#[instrument(skip(state))]
pub async fn get_profile(State(state): State<AppState>) -> Json<ApiResponse<ProfileDto>> {
    Json(ApiResponse::ok(build_profile(&state), "Profile retrieved successfully"))
}
