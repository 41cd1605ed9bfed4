use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::{sync::Arc, time::Duration};
use tokio::{sync::mpsc, time};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::auth::jwt::validate_token;
use crate::cache::redis::{user_channel, RedisCache};

/// Query parameters for WebSocket connections
#[derive(Debug, Deserialize)]
pub struct WebSocketParams {
    token: Option<String>,
}

/// Application state for the notification socket
#[derive(Debug)]
pub struct NotificationState {
    pub redis_cache: Option<Arc<RedisCache>>,
}

/// Handle an invalid socket connection (authentication failure)
async fn handle_invalid_socket(mut socket: WebSocket, error_message: String) {
    // Send error message to client
    if let Err(e) = socket
        .send(Message::Text(format!(
            r#"{{"error": "{}"}}"#,
            error_message
        )))
        .await
    {
        error!("Error sending error message on WS: {}", e);
    }

    // Close the connection
    let _ = socket.close().await;
}

/// Handle a valid WebSocket connection
async fn handle_valid_connection(
    socket: WebSocket,
    user_id: Uuid,
    redis_cache: Option<Arc<RedisCache>>,
) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Message>(100);

    // Task to subscribe to this user's notification channel
    let tx_redis = tx.clone();
    let redis_task = if let Some(cache) = redis_cache {
        Some(tokio::spawn(async move {
            subscribe_to_user_notifications(user_id, cache, tx_redis).await;
        }))
    } else {
        None
    };

    // Forward messages from channel to WebSocket
    let forward_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if let Err(e) = ws_sender.send(message).await {
                error!("Error forwarding message to WebSocket: {}", e);
                break;
            }
        }
    });

    // Heartbeat task
    let tx_heartbeat = tx.clone();
    let heartbeat_task = tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(30));
        loop {
            interval.tick().await;
            if let Err(e) = tx_heartbeat.send(Message::Ping(vec![])).await {
                error!("Error sending heartbeat: {}", e);
                break;
            }
        }
    });

    // Process incoming WebSocket messages
    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Close(_)) => {
                info!("WebSocket closed by client");
                break;
            }
            Ok(Message::Pong(_)) => {
                debug!("Received pong from client");
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    // Clean up
    if let Some(task) = redis_task {
        task.abort();
    }
    forward_task.abort();
    heartbeat_task.abort();

    info!("WebSocket connection closed for user: {}", user_id);
}

/// Handle incoming WebSocket connection
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WebSocketParams>,
    State(state): State<Arc<NotificationState>>,
) -> impl IntoResponse {
    let token = params.token.unwrap_or_default();

    // Validate token and extract the user ID
    let user_id = match validate_token(&token) {
        Ok(claims) => match Uuid::parse_str(&claims.sub) {
            Ok(uuid) => uuid,
            Err(e) => {
                let error_message = format!("Invalid user ID in token: {}", e);
                return ws.on_upgrade(move |socket| async move {
                    handle_invalid_socket(socket, error_message).await;
                });
            }
        },
        Err(e) => {
            let error_message = format!("Invalid token: {}", e);
            return ws.on_upgrade(move |socket| async move {
                handle_invalid_socket(socket, error_message).await;
            });
        }
    };

    // Valid connection, upgrade and handle
    info!("User {} connected to notifications WebSocket", user_id);
    ws.on_upgrade(move |socket| async move {
        handle_valid_connection(socket, user_id, state.redis_cache.clone()).await;
    })
}

/// Subscribe to the Redis PubSub channel carrying a user's pushes and
/// forward every payload to the socket
async fn subscribe_to_user_notifications(
    user_id: Uuid,
    redis_cache: Arc<RedisCache>,
    tx: mpsc::Sender<Message>,
) {
    let channel_name = user_channel(&user_id);
    info!("Subscribing to Redis channel: {}", channel_name);

    if let Ok(mut pubsub) = redis_cache.get_client().get_async_pubsub().await {
        if let Err(e) = pubsub.subscribe(&channel_name).await {
            error!("Failed to subscribe to Redis channel: {}", e);
            return;
        }

        info!("Successfully subscribed to Redis channel: {}", channel_name);

        let mut pubsub_stream = pubsub.on_message();

        while let Some(msg) = pubsub_stream.next().await {
            let payload: String = match msg.get_payload() {
                Ok(payload) => payload,
                Err(e) => {
                    error!("Failed to get message payload: {}", e);
                    continue;
                }
            };

            if let Err(e) = tx.send(Message::Text(payload)).await {
                error!("Failed to forward Redis message to WebSocket: {}", e);
                break;
            }
        }
    } else {
        error!("Failed to get Redis PubSub connection");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_websocket_params() {
        let params = WebSocketParams {
            token: Some("test_token".to_string()),
        };
        assert_eq!(params.token.unwrap(), "test_token");

        let params_empty = WebSocketParams { token: None };
        assert!(params_empty.token.is_none());
    }

    // This tests the error message formatting in handle_invalid_socket
    #[tokio::test]
    async fn test_error_message_format() {
        let error_msg = format!(r#"{{"error": "{}"}}"#, "Invalid token");
        assert_eq!(error_msg, r#"{"error": "Invalid token"}"#);
    }
}
