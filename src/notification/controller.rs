use crate::auth::middleware::AuthUser;
use crate::notification::model::{
    MarkReadResponse, NotificationError, NotificationErrorResponse, UnreadCountsResponse,
};
use crate::notification::service::NotificationService;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{error, info};

// Helper to convert NotificationError to an HTTP response
fn notification_error_to_response(
    err: NotificationError,
) -> (StatusCode, Json<NotificationErrorResponse>) {
    error!("Notification error: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(NotificationErrorResponse {
            error: "Internal server error".to_string(),
            code: "INTERNAL_ERROR".to_string(),
        }),
    )
}

/// Get unread notification counts per connection
#[utoipa::path(
    get,
    path = "/api/notifications/unread-counts",
    responses(
        (status = 200, description = "Unread counts retrieved", body = UnreadCountsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error", body = NotificationErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn unread_counts(
    Extension(user): Extension<AuthUser>,
    Extension(notification_service): Extension<Arc<NotificationService>>,
) -> impl IntoResponse {
    match notification_service.unread_counts(&user.user_id).await {
        Ok(counts) => (StatusCode::OK, Json(UnreadCountsResponse { counts })).into_response(),
        Err(e) => notification_error_to_response(e).into_response(),
    }
}

/// Mark all notifications as read
#[utoipa::path(
    post,
    path = "/api/notifications/read-all",
    responses(
        (status = 200, description = "Notifications marked read", body = MarkReadResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error", body = NotificationErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn mark_all_read(
    Extension(user): Extension<AuthUser>,
    Extension(notification_service): Extension<Arc<NotificationService>>,
) -> impl IntoResponse {
    info!("Marking all notifications read for user {}", user.user_id);

    match notification_service.mark_all_read(&user.user_id).await {
        Ok(unread) => (StatusCode::OK, Json(MarkReadResponse { unread })).into_response(),
        Err(e) => notification_error_to_response(e).into_response(),
    }
}

/// Mark one chat's notifications as read
#[utoipa::path(
    post,
    path = "/api/notifications/{connection_id}/read",
    params(
        ("connection_id" = i64, Path, description = "Connection whose notifications to mark read")
    ),
    responses(
        (status = 200, description = "Notifications marked read", body = MarkReadResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error", body = NotificationErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn mark_chat_read(
    Path(connection_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    Extension(notification_service): Extension<Arc<NotificationService>>,
) -> impl IntoResponse {
    match notification_service
        .mark_chat_read(&user.user_id, connection_id)
        .await
    {
        Ok(unread) => (StatusCode::OK, Json(MarkReadResponse { unread })).into_response(),
        Err(e) => notification_error_to_response(e).into_response(),
    }
}
