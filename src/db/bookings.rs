use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::booking::{Booking, CreateBookingRequest};

/// Insert an active booking. The partial unique index on active rows is the
/// serializing authority: when two callers race for the same slot, exactly
/// one insert lands and the other returns `None`.
pub async fn insert_booking(
    pool: &PgPool,
    request: &CreateBookingRequest,
    user_id: Uuid,
) -> Result<Option<Booking>, ApiError> {
    let booking = sqlx::query_as::<_, Booking>(
        r#"
        INSERT INTO bookings (id, field_id, slot_date, hour, user_id, active, created_at)
        VALUES ($1, $2, $3, $4, $5, TRUE, $6)
        ON CONFLICT (field_id, slot_date, hour) WHERE active DO NOTHING
        RETURNING id, field_id, slot_date, hour, user_id, active, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(request.field_id)
    .bind(request.slot_date)
    .bind(request.hour)
    .bind(user_id)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;
    Ok(booking)
}

pub async fn get_booking(pool: &PgPool, booking_id: Uuid) -> Result<Option<Booking>, ApiError> {
    let booking = sqlx::query_as::<_, Booking>(
        "SELECT id, field_id, slot_date, hour, user_id, active, created_at
         FROM bookings WHERE id = $1",
    )
    .bind(booking_id)
    .fetch_optional(pool)
    .await?;
    Ok(booking)
}

/// Logical cancellation only; the row stays for history and for the match
/// that references it.
pub async fn deactivate_booking(pool: &PgPool, booking_id: Uuid) -> Result<(), ApiError> {
    sqlx::query("UPDATE bookings SET active = FALSE WHERE id = $1")
        .bind(booking_id)
        .execute(pool)
        .await?;
    Ok(())
}
