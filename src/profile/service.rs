use crate::profile::model::{Profile, ProfileError, UpdateProfileRequest};
use chrono::Utc;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct ProfileService {
    pool: PgPool,
}

impl ProfileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a profile by user id
    pub async fn get_profile(&self, user_id: Uuid) -> Result<Profile, ProfileError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, name, university, profile_picture_url, last_active_at, created_at
            FROM market.profiles
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ProfileError::NotFound)?;

        Ok(profile)
    }

    /// Update the caller's own profile fields
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        data: UpdateProfileRequest,
    ) -> Result<Profile, ProfileError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE market.profiles SET
                name = COALESCE($1, name),
                university = COALESCE($2, university),
                profile_picture_url = COALESCE($3, profile_picture_url)
            WHERE id = $4
            RETURNING id, name, university, profile_picture_url, last_active_at, created_at
            "#,
        )
        .bind(&data.name)
        .bind(&data.university)
        .bind(&data.profile_picture_url)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ProfileError::NotFound)?;

        info!("Updated profile for user {}", user_id);
        Ok(profile)
    }

    /// Record user activity. Best-effort; the caller never sees a failure.
    pub async fn touch_activity(&self, user_id: Uuid) {
        if let Err(e) =
            sqlx::query("UPDATE market.profiles SET last_active_at = $1 WHERE id = $2")
                .bind(Utc::now())
                .bind(user_id)
                .execute(&self.pool)
                .await
        {
            error!("Failed to update activity for user {}: {}", user_id, e);
        }
    }
}
