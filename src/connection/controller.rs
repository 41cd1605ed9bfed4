use crate::auth::middleware::AuthUser;
use crate::connection::model::{
    ConnectionActionResponse, ConnectionError, ConnectionErrorResponse, ConnectionsListResponse,
    CreateConnectionRequest,
};
use crate::connection::service::ConnectionService;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{error, info};

// Helper to convert ConnectionError to an HTTP response
fn connection_error_to_response(
    err: ConnectionError,
) -> (StatusCode, Json<ConnectionErrorResponse>) {
    let (status, error_message, code) = match err {
        ConnectionError::DatabaseError(e) => {
            error!("Database error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                "DB_ERROR",
            )
        }
        ConnectionError::SelfConnection => (
            StatusCode::BAD_REQUEST,
            "You cannot start a chat about your own item.",
            "SELF_CONNECTION",
        ),
        ConnectionError::ProductNotFound => {
            (StatusCode::NOT_FOUND, "Product not found", "PRODUCT_NOT_FOUND")
        }
        ConnectionError::NotFoundOrUnauthorized => (
            StatusCode::NOT_FOUND,
            "Connection not found or you are not authorized to accept it.",
            "NOT_FOUND",
        ),
    };

    (
        status,
        Json(ConnectionErrorResponse {
            error: error_message.to_string(),
            code: code.to_string(),
        }),
    )
}

/// Request to connect with a seller about a product
///
/// Idempotent: a repeated request for the same product returns success
/// with "Request already sent." and creates no new row.
#[utoipa::path(
    post,
    path = "/api/connections",
    request_body = CreateConnectionRequest,
    responses(
        (status = 201, description = "Connection request created", body = ConnectionActionResponse),
        (status = 200, description = "Request already sent", body = ConnectionActionResponse),
        (status = 400, description = "Cannot connect with yourself", body = ConnectionErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found", body = ConnectionErrorResponse),
        (status = 500, description = "Internal server error", body = ConnectionErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "connections"
)]
pub async fn create_connection(
    Extension(user): Extension<AuthUser>,
    Extension(connection_service): Extension<Arc<ConnectionService>>,
    Json(request): Json<CreateConnectionRequest>,
) -> impl IntoResponse {
    info!(
        "Connection request for product {} from user {}",
        request.product_id, user.user_id
    );

    match connection_service
        .create_connection(request.product_id, request.seller_id, user.user_id)
        .await
    {
        Ok(outcome) => {
            let status = if outcome.already_sent {
                StatusCode::OK
            } else {
                StatusCode::CREATED
            };
            (
                status,
                Json(ConnectionActionResponse {
                    success: true,
                    message: outcome.message.to_string(),
                    connection_id: outcome.connection_id,
                }),
            )
                .into_response()
        }
        Err(e) => connection_error_to_response(e).into_response(),
    }
}

/// Accept a connection request
///
/// Only the seller of the connection can accept it; anyone else sees
/// "not found".
#[utoipa::path(
    post,
    path = "/api/connections/{id}/accept",
    params(("id" = i64, Path, description = "The connection to accept")),
    responses(
        (status = 200, description = "Connection accepted", body = ConnectionActionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Connection not found or not yours", body = ConnectionErrorResponse),
        (status = 500, description = "Internal server error", body = ConnectionErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "connections"
)]
pub async fn accept_connection(
    Path(connection_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    Extension(connection_service): Extension<Arc<ConnectionService>>,
) -> impl IntoResponse {
    match connection_service
        .accept_connection(connection_id, user.user_id)
        .await
    {
        Ok(id) => (
            StatusCode::OK,
            Json(ConnectionActionResponse {
                success: true,
                message: "Connection accepted.".to_string(),
                connection_id: Some(id),
            }),
        )
            .into_response(),
        Err(e) => connection_error_to_response(e).into_response(),
    }
}

/// Decline a connection request
///
/// Deletes the request outright. The buyer may request again later.
#[utoipa::path(
    post,
    path = "/api/connections/{id}/decline",
    params(("id" = i64, Path, description = "The connection to decline")),
    responses(
        (status = 200, description = "Connection declined", body = ConnectionActionResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "connections"
)]
pub async fn decline_connection(
    Path(connection_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    Extension(connection_service): Extension<Arc<ConnectionService>>,
) -> impl IntoResponse {
    connection_service
        .decline_connection(connection_id, user.user_id)
        .await;

    (
        StatusCode::OK,
        Json(ConnectionActionResponse {
            success: true,
            message: "Connection declined.".to_string(),
            connection_id: None,
        }),
    )
}

/// List the current user's connections
#[utoipa::path(
    get,
    path = "/api/connections",
    responses(
        (status = 200, description = "Connections retrieved", body = ConnectionsListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error", body = ConnectionErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "connections"
)]
pub async fn list_connections(
    Extension(user): Extension<AuthUser>,
    Extension(connection_service): Extension<Arc<ConnectionService>>,
) -> impl IntoResponse {
    match connection_service.list_connections(user.user_id).await {
        Ok(connections) => (
            StatusCode::OK,
            Json(ConnectionsListResponse { connections }),
        )
            .into_response(),
        Err(e) => connection_error_to_response(e).into_response(),
    }
}
