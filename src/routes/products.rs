use crate::auth::middleware::{auth_middleware, optional_auth_middleware};
use crate::product::controller::{
    create_product, delete_product, get_product, list_products, set_product_status, update_product,
};
use crate::product::service::ProductService;
use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;

/// Create a router for product routes
pub fn routes(product_service: Arc<ProductService>) -> Router {
    Router::new()
        // Browsing is public, with optional auth info
        .route(
            "/api/products",
            get(list_products).route_layer(middleware::from_fn(optional_auth_middleware)),
        )
        .route(
            "/api/products/:id",
            get(get_product).route_layer(middleware::from_fn(optional_auth_middleware)),
        )
        // Mutations require authentication
        .route(
            "/api/products",
            post(create_product).route_layer(middleware::from_fn(auth_middleware)),
        )
        .route(
            "/api/products/:id",
            put(update_product).route_layer(middleware::from_fn(auth_middleware)),
        )
        .route(
            "/api/products/:id",
            delete(delete_product).route_layer(middleware::from_fn(auth_middleware)),
        )
        .route(
            "/api/products/:id/status",
            patch(set_product_status).route_layer(middleware::from_fn(auth_middleware)),
        )
        .layer(axum::extract::Extension(product_service))
}
