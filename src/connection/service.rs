use crate::connection::model::{
    courtesy_message, ConnectionError, ConnectionSummary, Counterpart,
};
use crate::db::is_unique_violation;
use crate::notification::service::NotificationService;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Outcome of a create-connection call. The connection row is the durable
/// artifact; `message` carries softened warnings when a best-effort side
/// effect (courtesy message, seller push) failed.
#[derive(Debug)]
pub struct CreateConnectionOutcome {
    pub connection_id: Option<i64>,
    pub already_sent: bool,
    pub message: &'static str,
}

pub const MSG_ALREADY_SENT: &str = "Request already sent.";
const MSG_SENT: &str = "Connection sent successfully. Once the seller accepts, you will be notified.";
const MSG_SENT_PUSH_FAILED: &str =
    "Connection sent successfully. Once the seller accepts, you will be notified. (Notification delivery issue.)";
const MSG_SENT_MESSAGE_FAILED: &str =
    "Connection sent, but your initial message could not be delivered. Please try sending a message again.";
const MSG_SENT_BOTH_FAILED: &str =
    "Connection sent, but there was a problem delivering your message and notification. Please check your chat or try again.";

/// Pick the caller-facing status string after a fresh connection insert
fn create_result_message(message_failed: bool, push_failed: bool) -> &'static str {
    match (message_failed, push_failed) {
        (true, true) => MSG_SENT_BOTH_FAILED,
        (true, false) => MSG_SENT_MESSAGE_FAILED,
        (false, true) => MSG_SENT_PUSH_FAILED,
        (false, false) => MSG_SENT,
    }
}

#[derive(Clone)]
pub struct ConnectionService {
    pool: PgPool,
    notification_service: Arc<NotificationService>,
}

impl ConnectionService {
    pub fn new(pool: PgPool, notification_service: Arc<NotificationService>) -> Self {
        Self {
            pool,
            notification_service,
        }
    }

    /// Create a pending connection from a buyer to a product's seller.
    ///
    /// Idempotent by design: a second request for the same (product,
    /// requester) pair hits the uniqueness constraint and is reported as
    /// "Request already sent.", not as an error. The constraint is also
    /// what resolves two simultaneous create calls from the same buyer.
    pub async fn create_connection(
        &self,
        product_id: i64,
        seller_id: Uuid,
        requester_id: Uuid,
    ) -> Result<CreateConnectionOutcome, ConnectionError> {
        if requester_id == seller_id {
            return Err(ConnectionError::SelfConnection);
        }

        // Get the product title for the automatic first message
        let product_title = sqlx::query_scalar::<_, String>(
            "SELECT title FROM market.products WHERE id = $1",
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ConnectionError::ProductNotFound)?;

        let insert_result = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO market.connections (product_id, requester_id, seller_id, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING id
            "#,
        )
        .bind(product_id)
        .bind(requester_id)
        .bind(seller_id)
        .fetch_one(&self.pool)
        .await;

        let connection_id = match insert_result {
            Ok(id) => id,
            Err(e) if is_unique_violation(&e) => {
                warn!(
                    "Connection request already exists for product {} from {}",
                    product_id, requester_id
                );
                return Ok(CreateConnectionOutcome {
                    connection_id: None,
                    already_sent: true,
                    message: MSG_ALREADY_SENT,
                });
            }
            Err(e) => {
                error!("Error creating connection: {}", e);
                return Err(ConnectionError::DatabaseError(e));
            }
        };

        info!(
            "Connection {} created for product {} by {}",
            connection_id, product_id, requester_id
        );

        // The connection is durable from here on. The courtesy message and
        // the seller push soften the result message when they fail, but
        // never roll the connection back.
        let default_message = courtesy_message(&product_title);

        let message_failed = match sqlx::query(
            "INSERT INTO market.messages (connection_id, sender_id, content) VALUES ($1, $2, $3)",
        )
        .bind(connection_id)
        .bind(requester_id)
        .bind(&default_message)
        .execute(&self.pool)
        .await
        {
            Ok(_) => false,
            Err(e) => {
                warn!("Connection created, but courtesy message failed: {}", e);
                true
            }
        };

        let push_failed = match self
            .notification_service
            .dispatch(&seller_id, "New Message", &default_message, Some(connection_id))
            .await
        {
            Ok(_) => false,
            Err(e) => {
                warn!("Connection created, but seller notification failed: {}", e);
                true
            }
        };

        Ok(CreateConnectionOutcome {
            connection_id: Some(connection_id),
            already_sent: false,
            message: create_result_message(message_failed, push_failed),
        })
    }

    /// Accept a pending connection as its seller.
    ///
    /// The fetch predicate carries the authorization check: an
    /// unauthorized caller sees "not found", never "forbidden". Safe to
    /// call twice; the status update rewrites 'accepted' and the courtesy
    /// insert is guarded by an existence check.
    pub async fn accept_connection(
        &self,
        connection_id: i64,
        acting_user_id: Uuid,
    ) -> Result<i64, ConnectionError> {
        let row = sqlx::query(
            r#"
            SELECT c.id, c.product_id, c.requester_id, c.seller_id, c.status, c.created_at,
                   p.title AS product_title
            FROM market.connections c
            JOIN market.products p ON p.id = c.product_id
            WHERE c.id = $1 AND c.seller_id = $2
            "#,
        )
        .bind(connection_id)
        .bind(acting_user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ConnectionError::NotFoundOrUnauthorized)?;

        let requester_id: Uuid = row.get("requester_id");
        let product_title: String = row.get("product_title");

        sqlx::query("UPDATE market.connections SET status = 'accepted' WHERE id = $1")
            .bind(connection_id)
            .execute(&self.pool)
            .await?;

        info!(
            "Connection {} accepted by seller {}",
            connection_id, acting_user_id
        );

        // Acceptance is reachable from more than one application path;
        // only insert the courtesy message if no identical one exists yet.
        let default_message = courtesy_message(&product_title);
        let existing_message = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id FROM market.messages
            WHERE connection_id = $1 AND sender_id = $2 AND content = $3
            "#,
        )
        .bind(connection_id)
        .bind(requester_id)
        .bind(&default_message)
        .fetch_optional(&self.pool)
        .await?;

        if existing_message.is_none() {
            if let Err(e) = sqlx::query(
                "INSERT INTO market.messages (connection_id, sender_id, content) VALUES ($1, $2, $3)",
            )
            .bind(connection_id)
            .bind(requester_id)
            .bind(&default_message)
            .execute(&self.pool)
            .await
            {
                warn!(
                    "Connection accepted, but courtesy message insert failed: {}",
                    e
                );
            }
        }

        // Notify the buyer; fire-and-forget, the acceptance does not wait
        let notification_service = self.notification_service.clone();
        tokio::spawn(async move {
            let body = format!(
                "Seller accepted your request for '{}'. You can now chat and fix a deal!",
                product_title
            );
            if let Err(e) = notification_service
                .dispatch(
                    &requester_id,
                    "Seller Accepted Your Request!",
                    &body,
                    Some(connection_id),
                )
                .await
            {
                error!("Failed to send accept notification: {}", e);
            }
        });

        Ok(connection_id)
    }

    /// Decline (delete) a connection request as its seller.
    ///
    /// Hard delete: a declined request leaves no trace, and the buyer may
    /// request again later. Delete failures are logged, never surfaced as
    /// blocking.
    pub async fn decline_connection(&self, connection_id: i64, acting_user_id: Uuid) {
        match sqlx::query("DELETE FROM market.connections WHERE id = $1 AND seller_id = $2")
            .bind(connection_id)
            .bind(acting_user_id)
            .execute(&self.pool)
            .await
        {
            Ok(result) => {
                info!(
                    "Connection {} declined by {} ({} row(s) deleted)",
                    connection_id,
                    acting_user_id,
                    result.rows_affected()
                );
            }
            Err(e) => {
                error!("Error declining connection {}: {}", connection_id, e);
            }
        }
    }

    /// List a user's connections for the chat screen, newest first
    pub async fn list_connections(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ConnectionSummary>, ConnectionError> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.product_id, c.requester_id, c.seller_id, c.status, c.created_at,
                   p.title AS product_title,
                   pr.id AS counterpart_id, pr.name AS counterpart_name,
                   pr.profile_picture_url AS counterpart_picture
            FROM market.connections c
            JOIN market.products p ON p.id = c.product_id
            JOIN market.profiles pr
              ON pr.id = CASE WHEN c.requester_id = $1 THEN c.seller_id ELSE c.requester_id END
            WHERE c.requester_id = $1 OR c.seller_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in rows {
            let requester_id: Uuid = row.get("requester_id");
            summaries.push(ConnectionSummary {
                id: row.get("id"),
                product_id: row.get("product_id"),
                product_title: row.get("product_title"),
                status: row.get("status"),
                counterpart: Counterpart {
                    id: row.get("counterpart_id"),
                    name: row.get("counterpart_name"),
                    profile_picture_url: row.get("counterpart_picture"),
                },
                is_requester: requester_id == user_id,
                created_at: row.get("created_at"),
            });
        }

        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::model::ConnectionError;

    fn service_without_backends() -> ConnectionService {
        // The lazy pool never connects; the cases under test return
        // before any query runs
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        let notifications = Arc::new(crate::notification::service::NotificationService::new(
            pool.clone(),
            None,
        ));
        ConnectionService::new(pool, notifications)
    }

    #[tokio::test]
    async fn test_self_connection_rejected_before_any_write() {
        let service = service_without_backends();
        let user = Uuid::new_v4();

        let result = service.create_connection(1, user, user).await;
        assert!(matches!(result, Err(ConnectionError::SelfConnection)));
    }

    #[test]
    fn test_create_result_message_branches() {
        assert_eq!(create_result_message(false, false), MSG_SENT);
        assert_eq!(create_result_message(false, true), MSG_SENT_PUSH_FAILED);
        assert_eq!(create_result_message(true, false), MSG_SENT_MESSAGE_FAILED);
        assert_eq!(create_result_message(true, true), MSG_SENT_BOTH_FAILED);
    }

    #[test]
    fn test_softened_messages_still_report_success() {
        // Every softened variant still opens with "Connection sent"
        for message in [
            create_result_message(false, true),
            create_result_message(true, false),
            create_result_message(true, true),
        ] {
            assert!(message.starts_with("Connection sent"));
        }
    }

}
