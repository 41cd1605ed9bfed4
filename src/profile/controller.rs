use crate::auth::middleware::AuthUser;
use crate::profile::model::{ProfileError, ProfileErrorResponse, UpdateProfileRequest};
use crate::profile::service::ProfileService;
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::error;

// Helper to convert ProfileError to an HTTP response
fn profile_error_to_response(err: ProfileError) -> (StatusCode, Json<ProfileErrorResponse>) {
    let (status, error_message, code) = match &err {
        ProfileError::DatabaseError(e) => {
            error!("Database error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                "DB_ERROR",
            )
        }
        ProfileError::NotFound => (StatusCode::NOT_FOUND, "Profile not found", "NOT_FOUND"),
    };

    (
        status,
        Json(ProfileErrorResponse {
            error: error_message.to_string(),
            code: code.to_string(),
        }),
    )
}

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile retrieved", body = Profile),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile not found", body = ProfileErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "profile"
)]
pub async fn get_profile(
    Extension(user): Extension<AuthUser>,
    Extension(profile_service): Extension<Arc<ProfileService>>,
) -> impl IntoResponse {
    match profile_service.get_profile(user.user_id).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => profile_error_to_response(e).into_response(),
    }
}

/// Update the current user's profile
#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile not found", body = ProfileErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "profile"
)]
pub async fn update_profile(
    Extension(user): Extension<AuthUser>,
    Extension(profile_service): Extension<Arc<ProfileService>>,
    Json(request): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    match profile_service.update_profile(user.user_id, request).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => profile_error_to_response(e).into_response(),
    }
}

/// Record that the current user is active
#[utoipa::path(
    post,
    path = "/api/profile/activity",
    responses(
        (status = 204, description = "Activity recorded"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "profile"
)]
pub async fn touch_activity(
    Extension(user): Extension<AuthUser>,
    Extension(profile_service): Extension<Arc<ProfileService>>,
) -> impl IntoResponse {
    profile_service.touch_activity(user.user_id).await;
    StatusCode::NO_CONTENT
}
