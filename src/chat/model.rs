use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Database model for a chat message. Messages are immutable once
/// created; there is no edit or delete path.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Message {
    pub id: i64,
    pub connection_id: i64,
    #[schema(value_type = UuidWrapper)]
    pub sender_id: Uuid,
    pub content: String,
    #[schema(value_type = DateTimeWrapper)]
    pub created_at: DateTime<Utc>,
}

/// Request to send a message in a connection's thread
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SendMessageRequest {
    #[schema(example = "Is this still available?")]
    pub content: String,

    /// The other party, who will be notified
    #[schema(value_type = UuidWrapper)]
    pub receiver_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessagesListResponse {
    pub messages: Vec<Message>,
}

/// Possible chat errors
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Connection not found.")]
    ConnectionNotFound,

    #[error("{0}")]
    GateDenied(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

/// Error response for the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatErrorResponse {
    pub error: String,
    pub code: String,
}
