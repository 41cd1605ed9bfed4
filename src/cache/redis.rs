use redis::{AsyncCommands, Client, RedisError};
use tracing::info;
use uuid::Uuid;

// Redis cache key prefixes
pub const PRODUCT_KEY_PREFIX: &str = "product:id:";
pub const NOTIFICATION_CHANNEL_PREFIX: &str = "notifications:user:";
const PRODUCT_CACHE_TTL_SECONDS: u64 = 3600; // 1 hour

#[derive(Debug, Clone)]
pub struct RedisCache {
    client: Client,
}

impl RedisCache {
    pub fn new(client: Client) -> Self {
        // Connection validation happens on first use
        Self { client }
    }

    // Get the client
    pub fn get_client(&self) -> &Client {
        &self.client
    }

    // Cache a product by ID
    pub async fn cache_product(&self, id: i64, json_data: &str) -> Result<(), RedisError> {
        let key = format!("{}{}", PRODUCT_KEY_PREFIX, id);
        self.get_client()
            .get_multiplexed_async_connection()
            .await?
            .set_ex(key, json_data, PRODUCT_CACHE_TTL_SECONDS)
            .await
            .map(|_: ()| ())
    }

    // Get a product by ID from cache
    pub async fn get_product(&self, id: i64) -> Result<Option<String>, RedisError> {
        let mut connection = self.client.get_multiplexed_async_connection().await?;
        let key = format!("{}{}", PRODUCT_KEY_PREFIX, id);

        let result: Option<String> = connection.get(key).await?;

        if result.is_some() {
            info!("Cache hit for product ID: {}", id);
        } else {
            info!("Cache miss for product ID: {}", id);
        }

        Ok(result)
    }

    // Invalidate product cache
    pub async fn invalidate_product(&self, id: i64) -> Result<(), RedisError> {
        let mut connection = self.get_client().get_multiplexed_async_connection().await?;

        let key = format!("{}{}", PRODUCT_KEY_PREFIX, id);
        connection.del::<_, ()>(&key).await?;
        info!("Invalidated cache for product with ID: {}", id);
        Ok(())
    }

    // Publish a JSON payload on a user's notification channel
    pub async fn publish_to_user(&self, user_id: &Uuid, payload: &str) -> Result<(), RedisError> {
        let mut connection = self.get_client().get_multiplexed_async_connection().await?;

        let channel = user_channel(user_id);
        connection.publish(&channel, payload).await.map(|_: ()| ())
    }
}

/// Channel name carrying push payloads for one user
pub fn user_channel(user_id: &Uuid) -> String {
    format!("{}{}", NOTIFICATION_CHANNEL_PREFIX, user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_channel_format() {
        let user_id = Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap();
        assert_eq!(
            user_channel(&user_id),
            "notifications:user:123e4567-e89b-12d3-a456-426614174000"
        );
    }

    #[test]
    fn test_product_key_prefix() {
        let key = format!("{}{}", PRODUCT_KEY_PREFIX, 42);
        assert_eq!(key, "product:id:42");
    }
}
