mod api_doc;
mod auth;
mod cache;
mod chat;
mod connection;
mod db;
mod notification;
mod product;
mod profile;
mod routes;
mod schema_ext;
mod websocket;

use axum::{routing::get, Router};
use dotenv::dotenv;
use redis::Client;
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::cache::redis::RedisCache;
use crate::chat::service::ChatService;
use crate::connection::service::ConnectionService;
use crate::notification::service::NotificationService;
use crate::product::service::ProductService;
use crate::profile::service::ProfileService;
use crate::websocket::notifications::NotificationState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    tracing_subscriber::fmt::init();

    // Load .env file if it exists
    dotenv().ok();

    // Create connection pool
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&std::env::var("DATABASE_URL").unwrap())
        .await?;

    // Check if the database is initialized
    if !db::check_db_initialized(&pool).await {
        db::init_db(&pool).await?;
    }

    // Initialize Redis if configured
    let redis_cache = match std::env::var("REDIS_URL").ok() {
        Some(url) => {
            info!("Initializing Redis with URL: {}", url);
            match Client::open(url) {
                Ok(client) => Some(Arc::new(RedisCache::new(client))),
                Err(e) => {
                    error!("Failed to connect to Redis: {}", e);
                    None
                }
            }
        }
        None => {
            info!("No Redis URL configured, proceeding without push delivery or cache");
            None
        }
    };

    // Create service instances with unwrapped redis_cache
    let redis_cache_for_services = redis_cache.as_ref().map(|arc| (**arc).clone());

    let notification_service = Arc::new(NotificationService::new(
        pool.clone(),
        redis_cache_for_services.clone(),
    ));
    let connection_service = Arc::new(ConnectionService::new(
        pool.clone(),
        notification_service.clone(),
    ));
    let chat_service = Arc::new(ChatService::new(
        pool.clone(),
        notification_service.clone(),
    ));
    let product_service = Arc::new(ProductService::new(
        pool.clone(),
        redis_cache_for_services,
    ));
    let profile_service = Arc::new(ProfileService::new(pool.clone()));

    // State for the notification WebSocket
    let notification_state = Arc::new(NotificationState {
        redis_cache: redis_cache.clone(),
    });

    // Build the router
    let app = Router::new()
        // API documentation
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Health routes
        .merge(routes::health::routes(pool.clone()))
        // Auth routes
        .merge(routes::auth::routes(pool.clone()))
        // Product routes
        .merge(routes::products::routes(product_service.clone()))
        // Connection lifecycle routes
        .merge(routes::connections::routes(connection_service.clone()))
        // Chat routes
        .merge(routes::chat::routes(chat_service.clone()))
        // Notification routes (REST + WebSocket)
        .merge(routes::notifications::routes(
            notification_service.clone(),
            notification_state,
        ))
        // Profile routes
        .merge(routes::profile::routes(profile_service.clone()))
        // Add welcome route
        .route(
            "/",
            get(|| async { "Welcome to Campus Market Backend API" }),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    // Try different ports
    let mut port = 9500;
    let max_tries = 5;
    for attempt in 1..=max_tries {
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        match axum::Server::try_bind(&addr) {
            Ok(server) => {
                println!(
                    "🚀 Server started successfully at http://localhost:{}",
                    port
                );
                println!("📄 API Documentation: http://localhost:{}/docs", port);
                println!("🔌 WebSocket Notifications API: ws://localhost:{}/api/notifications/ws?token=<JWT>", port);
                println!("🛍️ Products API: http://localhost:{}/api/products", port);
                return server
                    .serve(app.into_make_service())
                    .await
                    .map_err(|e| e.into());
            }
            Err(_) => {
                if attempt == max_tries {
                    return Err("Failed to bind to any port".into());
                }
                port += 1;
            }
        }
    }

    Err("Failed to bind to any port".into())
}
