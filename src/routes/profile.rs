use crate::auth::middleware::auth_middleware;
use crate::profile::controller::{get_profile, touch_activity, update_profile};
use crate::profile::service::ProfileService;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

/// Create a router for profile routes
pub fn routes(profile_service: Arc<ProfileService>) -> Router {
    Router::new()
        .route("/api/profile", get(get_profile))
        .route("/api/profile", put(update_profile))
        .route("/api/profile/activity", post(touch_activity))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(axum::extract::Extension(profile_service))
}
