use crate::cache::redis::RedisCache;
use crate::notification::model::{NotificationError, PushPayload, UnreadCount};
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NotificationService {
    pool: PgPool,
    redis_cache: Option<RedisCache>,
}

impl NotificationService {
    pub fn new(pool: PgPool, redis_cache: Option<RedisCache>) -> Self {
        Self { pool, redis_cache }
    }

    /// Push a payload to a user's notification channel.
    ///
    /// Delivery is best-effort: callers log failures and never roll back
    /// the write that triggered the push. Connected WebSocket clients
    /// receive the payload; nothing records whether anyone was listening.
    pub async fn dispatch(
        &self,
        user_id: &Uuid,
        title: &str,
        message: &str,
        connection_id: Option<i64>,
    ) -> Result<(), NotificationError> {
        let cache = match &self.redis_cache {
            Some(cache) => cache,
            None => return Err(NotificationError::PushUnavailable),
        };

        let payload = PushPayload {
            title: title.to_string(),
            message: message.to_string(),
            connection_id,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&payload)?;

        info!("Dispatching push to user {}: {}", user_id, title);
        cache.publish_to_user(user_id, &json).await?;

        Ok(())
    }

    /// Insert an in-app notification row for a message
    pub async fn create_notification(
        &self,
        message_id: Option<i64>,
        receiver_id: &Uuid,
        connection_id: i64,
    ) -> Result<i64, NotificationError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO market.notifications (message_id, receiver_id, connection_id, is_read)
            VALUES ($1, $2, $3, false)
            RETURNING id
            "#,
        )
        .bind(message_id)
        .bind(receiver_id)
        .bind(connection_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to insert notification row: {}", e);
            NotificationError::DatabaseError(e)
        })?;

        Ok(id)
    }

    /// Mark every unread notification for a user as read, returning the
    /// remaining unread count
    pub async fn mark_all_read(&self, user_id: &Uuid) -> Result<i64, NotificationError> {
        sqlx::query(
            "UPDATE market.notifications SET is_read = true WHERE receiver_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        let remaining = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM market.notifications WHERE receiver_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        info!("Marked all notifications read for user {}", user_id);
        Ok(remaining)
    }

    /// Mark a single chat's notifications as read, returning that chat's
    /// remaining unread count
    pub async fn mark_chat_read(
        &self,
        user_id: &Uuid,
        connection_id: i64,
    ) -> Result<i64, NotificationError> {
        sqlx::query(
            r#"
            UPDATE market.notifications SET is_read = true
            WHERE receiver_id = $1 AND is_read = false AND connection_id = $2
            "#,
        )
        .bind(user_id)
        .bind(connection_id)
        .execute(&self.pool)
        .await?;

        let remaining = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM market.notifications
            WHERE receiver_id = $1 AND is_read = false AND connection_id = $2
            "#,
        )
        .bind(user_id)
        .bind(connection_id)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Marked chat {} notifications read for user {}",
            connection_id, user_id
        );
        Ok(remaining)
    }

    /// Per-connection unread tallies backing the chat list badges
    pub async fn unread_counts(&self, user_id: &Uuid) -> Result<Vec<UnreadCount>, NotificationError> {
        let rows = sqlx::query_scalar::<_, i64>(
            "SELECT connection_id FROM market.notifications WHERE receiver_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tally_by_connection(rows))
    }
}

/// Aggregate unread notification rows into per-connection counts
fn tally_by_connection(connection_ids: Vec<i64>) -> Vec<UnreadCount> {
    let mut counts: HashMap<i64, i64> = HashMap::new();
    for connection_id in connection_ids {
        *counts.entry(connection_id).or_insert(0) += 1;
    }

    let mut tallies: Vec<UnreadCount> = counts
        .into_iter()
        .map(|(connection_id, count)| UnreadCount {
            connection_id,
            count,
        })
        .collect();
    tallies.sort_by_key(|t| t.connection_id);
    tallies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_by_connection() {
        let tallies = tally_by_connection(vec![7, 3, 7, 7, 3]);
        assert_eq!(
            tallies,
            vec![
                UnreadCount {
                    connection_id: 3,
                    count: 2
                },
                UnreadCount {
                    connection_id: 7,
                    count: 3
                },
            ]
        );
    }

    #[test]
    fn test_tally_empty() {
        assert!(tally_by_connection(Vec::new()).is_empty());
    }

    #[test]
    fn test_push_payload_serialization() {
        let payload = PushPayload {
            title: "New Message".to_string(),
            message: "You have a new message: \"hello\"".to_string(),
            connection_id: Some(12),
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains(r#""title":"New Message""#));
        assert!(json.contains(r#""connection_id":12"#));

        let decoded: PushPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.connection_id, Some(12));
        assert_eq!(decoded.title, "New Message");
    }
}
