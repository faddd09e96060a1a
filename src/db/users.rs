use chrono::Utc;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::user::{Player, RegistrationRequest};

#[derive(Debug, FromRow)]
pub struct UserCredentials {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

pub async fn insert_user(
    pool: &PgPool,
    request: &RegistrationRequest,
    password_hash: &str,
) -> Result<Uuid, ApiError> {
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO users
            (id, username, email, password_hash, first_name, last_name, age,
             profile_picture_url, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(user_id)
    .bind(request.username.trim())
    .bind(request.email.trim().to_lowercase())
    .bind(password_hash)
    .bind(&request.first_name)
    .bind(&request.last_name)
    .bind(request.age)
    .bind(&request.profile_picture_url)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApiError::Validation("Username or email is already taken".to_string())
        }
        _ => ApiError::from(e),
    })?;

    Ok(user_id)
}

pub async fn find_credentials(
    pool: &PgPool,
    username: &str,
) -> Result<Option<UserCredentials>, ApiError> {
    let creds = sqlx::query_as::<_, UserCredentials>(
        "SELECT id, username, password_hash FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(creds)
}

/// Fetch the players behind a set of ids. Callers compare the returned count
/// against the requested count to detect unknown ids.
pub async fn get_players_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Player>, ApiError> {
    let players = sqlx::query_as::<_, Player>(
        r#"
        SELECT id, username, email, first_name, last_name, age,
               profile_picture_url, created_at
        FROM users
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;
    Ok(players)
}
