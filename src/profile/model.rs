use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A user's public profile
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, ToSchema)]
pub struct Profile {
    #[schema(value_type = UuidWrapper)]
    pub id: Uuid,
    pub name: String,
    pub university: String,
    pub profile_picture_url: Option<String>,
    #[schema(value_type = DateTimeWrapper)]
    pub last_active_at: Option<DateTime<Utc>>,
    #[schema(value_type = DateTimeWrapper)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub university: Option<String>,
    pub profile_picture_url: Option<String>,
}

/// Possible profile errors
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Profile not found")]
    NotFound,
}

/// Error response for the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileErrorResponse {
    pub error: String,
    pub code: String,
}
