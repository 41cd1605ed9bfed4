use crate::auth::middleware::auth_middleware;
use crate::notification::controller::{mark_all_read, mark_chat_read, unread_counts};
use crate::notification::service::NotificationService;
use crate::websocket::notifications::{ws_handler, NotificationState};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Create a router for notification routes
pub fn routes(
    notification_service: Arc<NotificationService>,
    notification_state: Arc<NotificationState>,
) -> Router {
    let ws_routes = Router::new()
        .route("/api/notifications/ws", get(ws_handler))
        .with_state(notification_state);

    let rest_routes = Router::new()
        .route("/api/notifications/unread-counts", get(unread_counts))
        .route("/api/notifications/read-all", post(mark_all_read))
        .route(
            "/api/notifications/:connection_id/read",
            post(mark_chat_read),
        )
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(axum::extract::Extension(notification_service));

    ws_routes.merge(rest_routes)
}
