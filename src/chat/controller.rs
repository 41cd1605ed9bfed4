use crate::auth::middleware::AuthUser;
use crate::chat::model::{ChatError, ChatErrorResponse, MessagesListResponse, SendMessageRequest};
use crate::chat::service::ChatService;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{error, info};

// Helper to convert ChatError to an HTTP response
fn chat_error_to_response(err: ChatError) -> (StatusCode, Json<ChatErrorResponse>) {
    let (status, error_message, code) = match &err {
        ChatError::DatabaseError(e) => {
            error!("Database error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                "DB_ERROR",
            )
        }
        ChatError::ConnectionNotFound => (
            StatusCode::NOT_FOUND,
            "Connection not found.".to_string(),
            "NOT_FOUND",
        ),
        ChatError::GateDenied(reason) => {
            (StatusCode::FORBIDDEN, reason.clone(), "CHAT_NOT_AVAILABLE")
        }
        ChatError::ValidationError(msg) => {
            (StatusCode::BAD_REQUEST, msg.clone(), "VALIDATION_ERROR")
        }
        ChatError::InternalError(msg) => {
            error!("Internal error: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                "INTERNAL_ERROR",
            )
        }
    };

    (
        status,
        Json(ChatErrorResponse {
            error: error_message,
            code: code.to_string(),
        }),
    )
}

/// Send a message in a connection's thread
///
/// Message eligibility depends on the connection status and the sender's
/// role; before acceptance only the buyer's automatic interest message is
/// allowed through.
#[utoipa::path(
    post,
    path = "/api/connections/{id}/messages",
    params(("id" = i64, Path, description = "The connection to post into")),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = Message),
        (status = 400, description = "Invalid input", body = ChatErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Chat not available yet", body = ChatErrorResponse),
        (status = 404, description = "Connection not found", body = ChatErrorResponse),
        (status = 500, description = "Internal server error", body = ChatErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "chat"
)]
pub async fn send_message(
    Path(connection_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    Extension(chat_service): Extension<Arc<ChatService>>,
    Json(request): Json<SendMessageRequest>,
) -> impl IntoResponse {
    info!(
        "Sending message on connection {} from user {}",
        connection_id, user.user_id
    );

    match chat_service
        .send_message(
            connection_id,
            user.user_id,
            request.receiver_id,
            &request.content,
        )
        .await
    {
        Ok(message) => (StatusCode::CREATED, Json(message)).into_response(),
        Err(e) => chat_error_to_response(e).into_response(),
    }
}

/// Get a connection's message thread
#[utoipa::path(
    get,
    path = "/api/connections/{id}/messages",
    params(("id" = i64, Path, description = "The connection whose thread to read")),
    responses(
        (status = 200, description = "Messages retrieved", body = MessagesListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Connection not found", body = ChatErrorResponse),
        (status = 500, description = "Internal server error", body = ChatErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "chat"
)]
pub async fn list_messages(
    Path(connection_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    Extension(chat_service): Extension<Arc<ChatService>>,
) -> impl IntoResponse {
    match chat_service.list_messages(connection_id, user.user_id).await {
        Ok(messages) => {
            (StatusCode::OK, Json(MessagesListResponse { messages })).into_response()
        }
        Err(e) => chat_error_to_response(e).into_response(),
    }
}
