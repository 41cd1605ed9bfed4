use crate::auth::middleware::auth_middleware;
use crate::connection::controller::{
    accept_connection, create_connection, decline_connection, list_connections,
};
use crate::connection::service::ConnectionService;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Create a router for connection lifecycle routes
pub fn routes(connection_service: Arc<ConnectionService>) -> Router {
    Router::new()
        .route("/api/connections", post(create_connection))
        .route("/api/connections", get(list_connections))
        .route("/api/connections/:id/accept", post(accept_connection))
        .route("/api/connections/:id/decline", post(decline_connection))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(axum::extract::Extension(connection_service))
}
