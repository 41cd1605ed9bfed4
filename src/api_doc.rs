use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Security scheme configuration for OpenAPI
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        // Get or create components section
        let components = openapi.components.get_or_insert_with(Default::default);

        // Add bearer token security scheme
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// API documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campus Market Backend API",
        version = "0.1.0",
        description = "REST API for the campus marketplace backend"
    ),
    paths(
        // Health check endpoints
        crate::routes::health::health_check,
        crate::routes::health::protected_health_check,
        // Authentication endpoints
        crate::auth::controller::login,
        crate::auth::controller::register,
        // Product endpoints
        crate::product::controller::list_products,
        crate::product::controller::get_product,
        crate::product::controller::create_product,
        crate::product::controller::update_product,
        crate::product::controller::set_product_status,
        crate::product::controller::delete_product,
        // Connection endpoints
        crate::connection::controller::create_connection,
        crate::connection::controller::accept_connection,
        crate::connection::controller::decline_connection,
        crate::connection::controller::list_connections,
        // Chat endpoints
        crate::chat::controller::send_message,
        crate::chat::controller::list_messages,
        // Notification endpoints
        crate::notification::controller::unread_counts,
        crate::notification::controller::mark_all_read,
        crate::notification::controller::mark_chat_read,
        // Profile endpoints
        crate::profile::controller::get_profile,
        crate::profile::controller::update_profile,
        crate::profile::controller::touch_activity
    ),
    components(
        schemas(
            // Auth schemas
            crate::auth::controller::RegisterRequest,
            crate::auth::controller::LoginRequest,
            crate::auth::controller::AuthResponse,
            crate::auth::controller::ErrorResponse,
            // Health schemas
            crate::routes::health::HealthResponse,
            // Product schemas
            crate::product::model::Product,
            crate::product::model::CreateProductRequest,
            crate::product::model::UpdateProductRequest,
            crate::product::model::UpdateStatusRequest,
            crate::product::model::ProductResponse,
            crate::product::model::ProductsListResponse,
            crate::product::model::SellerBrief,
            crate::product::model::ProductErrorResponse,
            // Connection schemas
            crate::connection::model::CreateConnectionRequest,
            crate::connection::model::ConnectionActionResponse,
            crate::connection::model::ConnectionSummary,
            crate::connection::model::Counterpart,
            crate::connection::model::ConnectionsListResponse,
            crate::connection::model::ConnectionErrorResponse,
            // Chat schemas
            crate::chat::model::Message,
            crate::chat::model::SendMessageRequest,
            crate::chat::model::MessagesListResponse,
            crate::chat::model::ChatErrorResponse,
            // Notification schemas
            crate::notification::model::Notification,
            crate::notification::model::UnreadCount,
            crate::notification::model::UnreadCountsResponse,
            crate::notification::model::MarkReadResponse,
            crate::notification::model::NotificationErrorResponse,
            // Profile schemas
            crate::profile::model::Profile,
            crate::profile::model::UpdateProfileRequest,
            crate::profile::model::ProfileErrorResponse,
            // External type schemas
            crate::schema_ext::DateTimeWrapper,
            crate::schema_ext::UuidWrapper
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "health", description = "Health check endpoints"),
        (name = "products", description = "Product listing endpoints"),
        (name = "connections", description = "Connection lifecycle endpoints"),
        (name = "chat", description = "Chat message endpoints"),
        (name = "notifications", description = "Notification endpoints"),
        (name = "profile", description = "User profile endpoints")
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;
