use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Opening phrase of the automatic first message. The pending-state gate
/// matches on this prefix, so a buyer can re-send the courtesy text but
/// nothing else before the seller accepts.
pub const COURTESY_PREFIX: &str = "Hi! I'm interested in buying your product:";

/// The automatic first message for a product. Inserted at connection
/// creation (and again at acceptance if the create-time insert failed);
/// the acceptance duplicate guard compares against this exact text.
pub fn courtesy_message(product_title: &str) -> String {
    format!("{} \"{}\".", COURTESY_PREFIX, product_title)
}

/// Lifecycle states of a connection. There is no declined state; a
/// declined request is deleted outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStatus {
    Pending,
    Accepted,
}

impl ConnectionStatus {
    pub fn from_str(status: &str) -> Result<Self, String> {
        match status {
            "pending" => Ok(ConnectionStatus::Pending),
            "accepted" => Ok(ConnectionStatus::Accepted),
            _ => Err(format!("Invalid connection status: {}", status)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Accepted => "accepted",
        }
    }
}

/// A message sender's relationship to a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderRole {
    Requester,
    Seller,
    Outsider,
}

/// Database model for a connection
#[derive(Debug, FromRow, Clone)]
pub struct Connection {
    pub id: i64,
    pub product_id: i64,
    pub requester_id: Uuid,
    pub seller_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Connection {
    pub fn sender_role(&self, user_id: &Uuid) -> SenderRole {
        if *user_id == self.requester_id {
            SenderRole::Requester
        } else if *user_id == self.seller_id {
            SenderRole::Seller
        } else {
            SenderRole::Outsider
        }
    }
}

/// Request to create a connection for a product
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateConnectionRequest {
    #[schema(example = "42")]
    pub product_id: i64,

    /// The product's seller
    #[schema(value_type = UuidWrapper)]
    pub seller_id: Uuid,
}

/// Result of a connection lifecycle action
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConnectionActionResponse {
    pub success: bool,

    /// Human-readable status, including softened warnings when a
    /// best-effort side effect failed
    #[schema(example = "Connection sent successfully. Once the seller accepts, you will be notified.")]
    pub message: String,

    #[schema(example = "12")]
    pub connection_id: Option<i64>,
}

/// One entry in a user's chat list
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConnectionSummary {
    pub id: i64,
    pub product_id: i64,
    pub product_title: String,
    pub status: String,
    /// The other party in this conversation
    pub counterpart: Counterpart,
    /// Whether the current user initiated the request
    pub is_requester: bool,
    #[schema(value_type = DateTimeWrapper)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Counterpart {
    #[schema(value_type = UuidWrapper)]
    pub id: Uuid,
    pub name: String,
    pub profile_picture_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConnectionsListResponse {
    pub connections: Vec<ConnectionSummary>,
}

/// Possible connection errors
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("You cannot start a chat about your own item.")]
    SelfConnection,

    #[error("Product not found")]
    ProductNotFound,

    #[error("Connection not found or you are not authorized to accept it.")]
    NotFoundOrUnauthorized,
}

/// Error response for the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConnectionErrorResponse {
    pub error: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_courtesy_message_carries_prefix() {
        let message = courtesy_message("Casio FX-991 calculator");
        assert!(message.starts_with(COURTESY_PREFIX));
        assert_eq!(
            message,
            "Hi! I'm interested in buying your product: \"Casio FX-991 calculator\"."
        );
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(
            ConnectionStatus::from_str("pending").unwrap(),
            ConnectionStatus::Pending
        );
        assert_eq!(
            ConnectionStatus::from_str("accepted").unwrap(),
            ConnectionStatus::Accepted
        );
        assert_eq!(ConnectionStatus::Pending.as_str(), "pending");
        assert_eq!(ConnectionStatus::Accepted.as_str(), "accepted");
        assert!(ConnectionStatus::from_str("declined").is_err());
    }

    #[test]
    fn test_sender_role() {
        let requester = Uuid::new_v4();
        let seller = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let connection = Connection {
            id: 1,
            product_id: 10,
            requester_id: requester,
            seller_id: seller,
            status: "pending".to_string(),
            created_at: Utc::now(),
        };

        assert_eq!(connection.sender_role(&requester), SenderRole::Requester);
        assert_eq!(connection.sender_role(&seller), SenderRole::Seller);
        assert_eq!(connection.sender_role(&stranger), SenderRole::Outsider);
    }
}
