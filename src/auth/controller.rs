use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{error, info};
use utoipa::ToSchema;

use super::service::{self, AuthError, AuthResult, LoginData, RegisterData};

// Request DTOs
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub university: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Response DTOs
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user_id: String,
    pub name: String,
    pub university: String,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

// Convert AuthResult to AuthResponse
fn to_response(result: AuthResult) -> AuthResponse {
    AuthResponse {
        user_id: result.user_id.to_string(),
        name: result.name,
        university: result.university,
        email: result.email,
        token: result.token,
    }
}

// Convert AuthError to Response
fn handle_error(error: AuthError) -> Response {
    let status = error.status_code();
    let message = error.message();

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Internal server error: {}", message);
    } else {
        info!("Auth error: {} ({})", message, status);
    }

    let details = match &error {
        AuthError::DatabaseError(details) => {
            Some(format!("Database operation failed: {}", details))
        }
        _ => None,
    };

    (
        status,
        Json(ErrorResponse {
            error: message,
            details,
        }),
    )
        .into_response()
}

/// Register a new user profile
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Profile created successfully", body = AuthResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(pool): State<PgPool>,
    Json(request): Json<RegisterRequest>,
) -> Response {
    info!("Registration request for email: {}", request.email);

    let data = RegisterData {
        name: request.name,
        university: request.university,
        email: request.email,
        password: request.password,
    };

    match service::register(&pool, data).await {
        Ok(result) => (StatusCode::CREATED, Json(to_response(result))).into_response(),
        Err(e) => handle_error(e),
    }
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(State(pool): State<PgPool>, Json(request): Json<LoginRequest>) -> Response {
    info!("Login request for email: {}", request.email);

    let data = LoginData {
        email: request.email,
        password: request.password,
    };

    match service::login(&pool, data).await {
        Ok(result) => (StatusCode::OK, Json(to_response(result))).into_response(),
        Err(e) => handle_error(e),
    }
}
