use crate::cache::redis::RedisCache;
use crate::product::model::{
    CreateProductRequest, Product, ProductError, ProductResponse, ProductStatus, SellerBrief,
    UpdateProductRequest,
};
use sqlx::{PgPool, Row};
use tracing::{error, info, warn};
use uuid::Uuid;

const PRODUCTS_PER_PAGE: i64 = 24;

#[derive(Clone)]
pub struct ProductService {
    pool: PgPool,
    redis_cache: Option<RedisCache>,
}

impl ProductService {
    pub fn new(pool: PgPool, redis_cache: Option<RedisCache>) -> Self {
        Self { pool, redis_cache }
    }

    // Escape user-supplied description text before storage
    fn process_description(&self, description: Option<String>) -> Option<String> {
        description.map(|d| html_escape::encode_safe(&d).to_string())
    }

    /// Create a new listing
    pub async fn create_product(
        &self,
        seller_id: Uuid,
        data: CreateProductRequest,
    ) -> Result<Product, ProductError> {
        if data.title.trim().is_empty() {
            return Err(ProductError::ValidationError(
                "Title is required".to_string(),
            ));
        }
        if data.price < 0.0 {
            return Err(ProductError::ValidationError(
                "Price cannot be negative".to_string(),
            ));
        }
        if data.category.trim().is_empty() {
            return Err(ProductError::ValidationError(
                "Category is required".to_string(),
            ));
        }

        let description = self.process_description(data.description);

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO market.products (
                seller_id, title, description, price, mrp, category,
                image_urls, status, available_from
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'available', $8)
            RETURNING *
            "#,
        )
        .bind(seller_id)
        .bind(&data.title)
        .bind(&description)
        .bind(data.price)
        .bind(data.mrp)
        .bind(&data.category)
        .bind(&data.image_urls)
        .bind(data.available_from)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to insert product: {}", e);
            ProductError::DatabaseError(e)
        })?;

        info!("Created product {} for seller {}", product.id, seller_id);
        Ok(product)
    }

    /// Get a single product with its seller, cache-first
    pub async fn get_product(&self, product_id: i64) -> Result<ProductResponse, ProductError> {
        if let Some(cache) = &self.redis_cache {
            if let Ok(Some(cached)) = cache.get_product(product_id).await {
                return serde_json::from_str::<ProductResponse>(&cached).map_err(|e| {
                    error!("Error deserializing cached product: {}", e);
                    ProductError::DeserializationError
                });
            }
        }

        let row = sqlx::query(
            r#"
            SELECT p.id, p.seller_id, p.title, p.description, p.price, p.mrp, p.category,
                   p.image_urls, p.status, p.available_from, p.created_at,
                   pr.name AS seller_name, pr.university AS seller_university,
                   pr.profile_picture_url AS seller_picture
            FROM market.products p
            JOIN market.profiles pr ON pr.id = p.seller_id
            WHERE p.id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ProductError::NotFound)?;

        let response = ProductResponse {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            price: row.get("price"),
            mrp: row.get("mrp"),
            category: row.get("category"),
            image_urls: row.get("image_urls"),
            status: row.get("status"),
            seller: SellerBrief {
                id: row.get("seller_id"),
                name: row.get("seller_name"),
                university: row.get("seller_university"),
                profile_picture_url: row.get("seller_picture"),
            },
            available_from: row.get("available_from"),
            created_at: row.get("created_at"),
        };

        // Cache for the next reader
        if let Some(cache) = &self.redis_cache {
            let json_data = serde_json::to_string(&response).unwrap_or_default();
            if let Err(e) = cache.cache_product(product_id, &json_data).await {
                warn!("Failed to cache product {}: {}", product_id, e);
            }
        }

        Ok(response)
    }

    /// List available products, newest first, optionally filtered by
    /// category
    pub async fn list_products(
        &self,
        category: Option<String>,
        page: Option<i64>,
    ) -> Result<(Vec<Product>, i64), ProductError> {
        let page = page.unwrap_or(1).max(1);
        let offset = (page - 1) * PRODUCTS_PER_PAGE;

        let products = match &category {
            Some(category) => {
                sqlx::query_as::<_, Product>(
                    r#"
                    SELECT * FROM market.products
                    WHERE status = 'available' AND category = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(category)
                .bind(PRODUCTS_PER_PAGE)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>(
                    r#"
                    SELECT * FROM market.products
                    WHERE status = 'available'
                    ORDER BY created_at DESC
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(PRODUCTS_PER_PAGE)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        let total_count = match &category {
            Some(category) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM market.products WHERE status = 'available' AND category = $1",
                )
                .bind(category)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM market.products WHERE status = 'available'",
                )
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok((products, total_count))
    }

    /// Update a listing's details. The seller id lives in the predicate;
    /// anyone else's update touches zero rows and reads as not found.
    pub async fn update_product(
        &self,
        product_id: i64,
        seller_id: Uuid,
        data: UpdateProductRequest,
    ) -> Result<Product, ProductError> {
        let description = self.process_description(data.description);

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE market.products SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                price = COALESCE($3, price),
                mrp = COALESCE($4, mrp),
                category = COALESCE($5, category),
                image_urls = COALESCE($6, image_urls),
                available_from = COALESCE($7, available_from)
            WHERE id = $8 AND seller_id = $9
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&description)
        .bind(data.price)
        .bind(data.mrp)
        .bind(&data.category)
        .bind(&data.image_urls)
        .bind(data.available_from)
        .bind(product_id)
        .bind(seller_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ProductError::NotFound)?;

        self.invalidate_cache(product_id).await;

        info!("Updated product {} by seller {}", product_id, seller_id);
        Ok(product)
    }

    /// Set a listing's status (available, sold, reserved, ...)
    pub async fn set_product_status(
        &self,
        product_id: i64,
        seller_id: Uuid,
        status: &str,
    ) -> Result<(), ProductError> {
        let status =
            ProductStatus::from_str(status).map_err(ProductError::ValidationError)?;

        let result = sqlx::query(
            "UPDATE market.products SET status = $1 WHERE id = $2 AND seller_id = $3",
        )
        .bind(status.as_str())
        .bind(product_id)
        .bind(seller_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ProductError::NotFound);
        }

        self.invalidate_cache(product_id).await;

        info!(
            "Product {} status set to {} by seller {}",
            product_id,
            status.as_str(),
            seller_id
        );
        Ok(())
    }

    /// Permanently delete a listing
    pub async fn delete_product(
        &self,
        product_id: i64,
        seller_id: Uuid,
    ) -> Result<(), ProductError> {
        let result =
            sqlx::query("DELETE FROM market.products WHERE id = $1 AND seller_id = $2")
                .bind(product_id)
                .bind(seller_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(ProductError::NotFound);
        }

        self.invalidate_cache(product_id).await;

        info!("Product {} deleted by seller {}", product_id, seller_id);
        Ok(())
    }

    async fn invalidate_cache(&self, product_id: i64) {
        if let Some(cache) = &self.redis_cache {
            if let Err(e) = cache.invalidate_product(product_id).await {
                warn!("Failed to invalidate product cache {}: {}", product_id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_without_backends() -> ProductService {
        // The pool is never touched by the helpers under test
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        ProductService::new(pool, None)
    }

    #[tokio::test]
    async fn test_description_is_escaped() {
        let service = service_without_backends();
        let escaped = service
            .process_description(Some("<script>alert(1)</script> & more".to_string()))
            .unwrap();
        assert!(!escaped.contains('<'));
        assert!(escaped.contains("&lt;script&gt;"));
        assert!(escaped.contains("&amp; more"));
    }

    #[tokio::test]
    async fn test_description_none_passthrough() {
        let service = service_without_backends();
        assert!(service.process_description(None).is_none());
    }
}
