use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::field::Field;

pub async fn insert_field(pool: &PgPool, name: &str, owner_id: Uuid) -> Result<Field, ApiError> {
    let field = sqlx::query_as::<_, Field>(
        r#"
        INSERT INTO fields (id, name, owner_id, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, owner_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name.trim())
    .bind(owner_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;
    Ok(field)
}

pub async fn get_field(pool: &PgPool, field_id: Uuid) -> Result<Option<Field>, ApiError> {
    let field = sqlx::query_as::<_, Field>(
        "SELECT id, name, owner_id, created_at FROM fields WHERE id = $1",
    )
    .bind(field_id)
    .fetch_optional(pool)
    .await?;
    Ok(field)
}

pub async fn list_fields(pool: &PgPool) -> Result<Vec<Field>, ApiError> {
    let fields = sqlx::query_as::<_, Field>(
        "SELECT id, name, owner_id, created_at FROM fields ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;
    Ok(fields)
}
