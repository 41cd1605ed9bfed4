use crate::chat::model::{ChatError, Message};
use crate::connection::model::{Connection, ConnectionStatus, SenderRole, COURTESY_PREFIX};
use crate::notification::service::NotificationService;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

pub const DENY_PENDING_REQUESTER: &str =
    "You cannot send more messages until the seller accepts your request.";
pub const DENY_PENDING_SELLER: &str =
    "Chat is not available until the seller accepts the request.";
pub const DENY_OUTSIDER: &str = "You are not a participant in this conversation.";

/// Verdict of the message gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Deny(&'static str),
}

/// Decide whether a sender may write a message on a connection.
///
/// Before acceptance the thread exists only to carry the automatic
/// interest message: the requester may (re-)send text opening with the
/// courtesy phrase and nothing else, and the seller may not reply at all.
/// The courtesy check is a prefix match, so any content that happens to
/// open with the same words passes.
pub fn can_send(status: ConnectionStatus, role: SenderRole, content: &str) -> GateDecision {
    match role {
        SenderRole::Outsider => GateDecision::Deny(DENY_OUTSIDER),
        SenderRole::Requester => match status {
            ConnectionStatus::Accepted => GateDecision::Allow,
            ConnectionStatus::Pending => {
                if content.starts_with(COURTESY_PREFIX) {
                    GateDecision::Allow
                } else {
                    GateDecision::Deny(DENY_PENDING_REQUESTER)
                }
            }
        },
        SenderRole::Seller => match status {
            ConnectionStatus::Accepted => GateDecision::Allow,
            ConnectionStatus::Pending => GateDecision::Deny(DENY_PENDING_SELLER),
        },
    }
}

#[derive(Clone)]
pub struct ChatService {
    pool: PgPool,
    notification_service: Arc<NotificationService>,
}

impl ChatService {
    pub fn new(pool: PgPool, notification_service: Arc<NotificationService>) -> Self {
        Self {
            pool,
            notification_service,
        }
    }

    /// Send a message in a connection's thread.
    ///
    /// The gate runs before any write; a denial leaves nothing behind.
    /// After the message row is in, the receiver push and the
    /// notification row are each best-effort and logged on failure.
    pub async fn send_message(
        &self,
        connection_id: i64,
        sender_id: Uuid,
        receiver_id: Uuid,
        content: &str,
    ) -> Result<Message, ChatError> {
        if content.trim().is_empty() {
            return Err(ChatError::ValidationError(
                "Message content cannot be empty".to_string(),
            ));
        }

        // Fetch the connection's status and parties
        let connection = sqlx::query_as::<_, Connection>(
            r#"
            SELECT id, product_id, requester_id, seller_id, status, created_at
            FROM market.connections
            WHERE id = $1
            "#,
        )
        .bind(connection_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ChatError::ConnectionNotFound)?;

        let status =
            ConnectionStatus::from_str(&connection.status).map_err(ChatError::InternalError)?;
        let role = connection.sender_role(&sender_id);

        if let GateDecision::Deny(reason) = can_send(status, role, content) {
            info!(
                "Message denied on connection {} for sender {}: {}",
                connection_id, sender_id, reason
            );
            return Err(ChatError::GateDenied(reason.to_string()));
        }

        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO market.messages (connection_id, sender_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, connection_id, sender_id, content, created_at
            "#,
        )
        .bind(connection_id)
        .bind(sender_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Error sending message: {}", e);
            ChatError::DatabaseError(e)
        })?;

        info!(
            "Message {} sent on connection {} by {}",
            message.id, connection_id, sender_id
        );

        // Alert the other party; neither failure touches the message
        if let Err(e) = self
            .notification_service
            .dispatch(
                &receiver_id,
                "New Message",
                &format!("You have a new message: \"{}\"", content),
                Some(connection_id),
            )
            .await
        {
            error!("Failed to push message notification: {}", e);
        }

        if let Err(e) = self
            .notification_service
            .create_notification(Some(message.id), &receiver_id, connection_id)
            .await
        {
            error!("Error creating notification: {}", e);
        }

        Ok(message)
    }

    /// Get a connection's messages, oldest first. The predicate scopes the
    /// read to participants; anyone else sees "not found".
    pub async fn list_messages(
        &self,
        connection_id: i64,
        user_id: Uuid,
    ) -> Result<Vec<Message>, ChatError> {
        let participant = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id FROM market.connections
            WHERE id = $1 AND (requester_id = $2 OR seller_id = $2)
            "#,
        )
        .bind(connection_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        if participant.is_none() {
            return Err(ChatError::ConnectionNotFound);
        }

        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, connection_id, sender_id, content, created_at
            FROM market.messages
            WHERE connection_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(connection_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::model::courtesy_message;

    #[test]
    fn test_gate_pending_requester_courtesy_allowed() {
        let decision = can_send(
            ConnectionStatus::Pending,
            SenderRole::Requester,
            &courtesy_message("MacBook Air 2020"),
        );
        assert_eq!(decision, GateDecision::Allow);
    }

    #[test]
    fn test_gate_pending_requester_free_text_denied() {
        let decision = can_send(
            ConnectionStatus::Pending,
            SenderRole::Requester,
            "Can you do 500?",
        );
        assert_eq!(decision, GateDecision::Deny(DENY_PENDING_REQUESTER));
    }

    #[test]
    fn test_gate_pending_requester_prefix_match_is_lenient() {
        // The check is a prefix match, not an exact one; anything opening
        // with the courtesy phrase passes while the request is pending
        let decision = can_send(
            ConnectionStatus::Pending,
            SenderRole::Requester,
            "Hi! I'm interested in buying your product: and also your bike",
        );
        assert_eq!(decision, GateDecision::Allow);
    }

    #[test]
    fn test_gate_pending_seller_denied() {
        for content in ["Sure, it's available", &courtesy_message("anything")] {
            let decision = can_send(ConnectionStatus::Pending, SenderRole::Seller, content);
            assert_eq!(decision, GateDecision::Deny(DENY_PENDING_SELLER));
        }
    }

    #[test]
    fn test_gate_accepted_participants_allowed() {
        for role in [SenderRole::Requester, SenderRole::Seller] {
            let decision = can_send(ConnectionStatus::Accepted, role, "Is this still available?");
            assert_eq!(decision, GateDecision::Allow);
        }
    }

    #[test]
    fn test_gate_outsider_always_denied() {
        for status in [ConnectionStatus::Pending, ConnectionStatus::Accepted] {
            let decision = can_send(status, SenderRole::Outsider, "hello");
            assert_eq!(decision, GateDecision::Deny(DENY_OUTSIDER));
        }
    }

    #[tokio::test]
    async fn test_empty_content_rejected_before_any_write() {
        // The lazy pool never connects; validation fails first
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        let notifications = Arc::new(crate::notification::service::NotificationService::new(
            pool.clone(),
            None,
        ));
        let service = ChatService::new(pool, notifications);

        let result = service
            .send_message(1, Uuid::new_v4(), Uuid::new_v4(), "   ")
            .await;
        assert!(matches!(result, Err(ChatError::ValidationError(_))));
    }
}
