use crate::auth::middleware::AuthUser;
use crate::product::model::{
    CreateProductRequest, ProductError, ProductErrorResponse, ProductsListResponse,
    UpdateProductRequest, UpdateStatusRequest,
};
use crate::product::service::ProductService;
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{IntoParams, ToSchema};

// Query parameters for listing products
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ProductsQueryParams {
    category: Option<String>,
    #[schema(example = "1")]
    page: Option<i64>,
}

// Helper to convert ProductError to an HTTP response
fn product_error_to_response(err: ProductError) -> (StatusCode, Json<ProductErrorResponse>) {
    let (status, error_message, code) = match &err {
        ProductError::DatabaseError(e) => {
            error!("Database error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                "DB_ERROR",
            )
        }
        ProductError::CacheError(e) => {
            error!("Cache error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                "CACHE_ERROR",
            )
        }
        ProductError::NotFound => (
            StatusCode::NOT_FOUND,
            "Product not found".to_string(),
            "NOT_FOUND",
        ),
        ProductError::ValidationError(msg) => {
            (StatusCode::BAD_REQUEST, msg.clone(), "VALIDATION_ERROR")
        }
        ProductError::DeserializationError => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to process product data".to_string(),
            "DESERIALIZATION_ERROR",
        ),
    };

    (
        status,
        Json(ProductErrorResponse {
            error: error_message,
            code: code.to_string(),
        }),
    )
}

/// List available products
#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductsQueryParams),
    responses(
        (status = 200, description = "Products retrieved", body = ProductsListResponse),
        (status = 500, description = "Internal server error", body = ProductErrorResponse)
    ),
    tag = "products"
)]
pub async fn list_products(
    Extension(product_service): Extension<Arc<ProductService>>,
    Query(params): Query<ProductsQueryParams>,
) -> impl IntoResponse {
    match product_service
        .list_products(params.category, params.page)
        .await
    {
        Ok((products, total_count)) => (
            StatusCode::OK,
            Json(ProductsListResponse {
                products,
                total_count,
            }),
        )
            .into_response(),
        Err(e) => product_error_to_response(e).into_response(),
    }
}

/// Get a single product
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "The product to fetch")),
    responses(
        (status = 200, description = "Product retrieved", body = ProductResponse),
        (status = 404, description = "Product not found", body = ProductErrorResponse),
        (status = 500, description = "Internal server error", body = ProductErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    Path(product_id): Path<i64>,
    Extension(product_service): Extension<Arc<ProductService>>,
) -> impl IntoResponse {
    match product_service.get_product(product_id).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => product_error_to_response(e).into_response(),
    }
}

/// Create a product listing
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid input", body = ProductErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error", body = ProductErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn create_product(
    Extension(user): Extension<AuthUser>,
    Extension(product_service): Extension<Arc<ProductService>>,
    Json(request): Json<CreateProductRequest>,
) -> impl IntoResponse {
    info!("Creating product for seller {}", user.user_id);

    match product_service.create_product(user.user_id, request).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => product_error_to_response(e).into_response(),
    }
}

/// Update a product listing
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "The product to update")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found or not yours", body = ProductErrorResponse),
        (status = 500, description = "Internal server error", body = ProductErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn update_product(
    Path(product_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    Extension(product_service): Extension<Arc<ProductService>>,
    Json(request): Json<UpdateProductRequest>,
) -> impl IntoResponse {
    match product_service
        .update_product(product_id, user.user_id, request)
        .await
    {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => product_error_to_response(e).into_response(),
    }
}

/// Set a product's listing status
#[utoipa::path(
    patch,
    path = "/api/products/{id}/status",
    params(("id" = i64, Path, description = "The product whose status to set")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 204, description = "Status updated"),
        (status = 400, description = "Invalid status", body = ProductErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found or not yours", body = ProductErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn set_product_status(
    Path(product_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    Extension(product_service): Extension<Arc<ProductService>>,
    Json(request): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    match product_service
        .set_product_status(product_id, user.user_id, &request.status)
        .await
    {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => product_error_to_response(e).into_response(),
    }
}

/// Delete a product listing
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "The product to delete")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found or not yours", body = ProductErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn delete_product(
    Path(product_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    Extension(product_service): Extension<Arc<ProductService>>,
) -> impl IntoResponse {
    info!(
        "Deleting product {} requested by user {}",
        product_id, user.user_id
    );

    match product_service.delete_product(product_id, user.user_id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => product_error_to_response(e).into_response(),
    }
}
