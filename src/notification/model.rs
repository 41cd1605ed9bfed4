use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Database model for an in-app notification row. These rows back the
/// unread badge; push delivery is tracked nowhere.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: i64,
    pub message_id: Option<i64>,
    #[schema(value_type = UuidWrapper)]
    pub receiver_id: Uuid,
    pub connection_id: i64,
    pub is_read: bool,
    #[schema(value_type = DateTimeWrapper)]
    pub created_at: DateTime<Utc>,
}

/// Payload published on a user's channel and forwarded to their
/// notification WebSocket. `connection_id` is the deep-link target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushPayload {
    pub title: String,
    pub message: String,
    pub connection_id: Option<i64>,
    pub timestamp: DateTime<Utc>,
}

/// Unread notification tally for one connection
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct UnreadCount {
    pub connection_id: i64,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UnreadCountsResponse {
    pub counts: Vec<UnreadCount>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MarkReadResponse {
    /// Unread notifications remaining in the marked scope
    pub unread: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    CacheError(#[from] redis::RedisError),

    #[error("Push channel is not configured")]
    PushUnavailable,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Error response for the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationErrorResponse {
    pub error: String,
    pub code: String,
}
