use crate::auth::middleware::auth_middleware;
use crate::chat::controller::{list_messages, send_message};
use crate::chat::service::ChatService;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Create a router for chat message routes
pub fn routes(chat_service: Arc<ChatService>) -> Router {
    Router::new()
        .route("/api/connections/:id/messages", get(list_messages))
        .route("/api/connections/:id/messages", post(send_message))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(axum::extract::Extension(chat_service))
}
