use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Listing states a product can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStatus {
    Available,
    Sold,
    PendingReservation,
    Reserved,
}

impl ProductStatus {
    pub fn from_str(status: &str) -> Result<Self, String> {
        match status {
            "available" => Ok(ProductStatus::Available),
            "sold" => Ok(ProductStatus::Sold),
            "pending_reservation" => Ok(ProductStatus::PendingReservation),
            "reserved" => Ok(ProductStatus::Reserved),
            _ => Err(format!("Invalid product status: {}", status)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ProductStatus::Available => "available",
            ProductStatus::Sold => "sold",
            ProductStatus::PendingReservation => "pending_reservation",
            ProductStatus::Reserved => "reserved",
        }
    }
}

/// Database model for a product listing
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, ToSchema)]
pub struct Product {
    pub id: i64,
    #[schema(value_type = UuidWrapper)]
    pub seller_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub mrp: Option<f64>,
    pub category: String,
    pub image_urls: Vec<String>,
    pub status: String,
    #[schema(value_type = DateTimeWrapper)]
    pub available_from: Option<DateTime<Utc>>,
    #[schema(value_type = DateTimeWrapper)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    #[schema(example = "Casio FX-991 calculator")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "450.0")]
    pub price: f64,
    pub mrp: Option<f64>,
    #[schema(example = "electronics")]
    pub category: String,
    pub image_urls: Vec<String>,
    pub available_from: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub mrp: Option<f64>,
    pub category: Option<String>,
    pub image_urls: Option<Vec<String>>,
    pub available_from: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    #[schema(example = "sold")]
    pub status: String,
}

/// Seller information in product responses
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SellerBrief {
    #[schema(value_type = UuidWrapper)]
    pub id: Uuid,
    pub name: String,
    pub university: String,
    pub profile_picture_url: Option<String>,
}

/// Response format for a single product
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub mrp: Option<f64>,
    pub category: String,
    pub image_urls: Vec<String>,
    pub status: String,
    pub seller: SellerBrief,
    #[schema(value_type = DateTimeWrapper)]
    pub available_from: Option<DateTime<Utc>>,
    #[schema(value_type = DateTimeWrapper)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductsListResponse {
    pub products: Vec<Product>,
    pub total_count: i64,
}

/// Possible product errors
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    CacheError(#[from] redis::RedisError),

    #[error("Product not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Deserialization error")]
    DeserializationError,
}

/// Error response for the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductErrorResponse {
    pub error: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_status_round_trip() {
        for status in [
            ProductStatus::Available,
            ProductStatus::Sold,
            ProductStatus::PendingReservation,
            ProductStatus::Reserved,
        ] {
            assert_eq!(ProductStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(ProductStatus::from_str("archived").is_err());
    }
}
