use chrono::{Duration, NaiveDate};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::availability::resolver::ScheduleFacts;
use crate::error::ApiError;
use crate::models::availability::{BlockedSlot, UpsertRuleRequest, WeeklyAvailabilityRule};

/// Closing/reopening a weekday replaces its rule wholesale.
pub async fn upsert_rule(
    pool: &PgPool,
    field_id: Uuid,
    request: &UpsertRuleRequest,
) -> Result<WeeklyAvailabilityRule, ApiError> {
    let rule = sqlx::query_as::<_, WeeklyAvailabilityRule>(
        r#"
        INSERT INTO availability_rules (id, field_id, day_of_week, open_hour, close_hour)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (field_id, day_of_week)
        DO UPDATE SET open_hour = EXCLUDED.open_hour, close_hour = EXCLUDED.close_hour
        RETURNING id, field_id, day_of_week, open_hour, close_hour
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(field_id)
    .bind(request.day_of_week)
    .bind(request.open_hour)
    .bind(request.close_hour)
    .fetch_one(pool)
    .await?;
    Ok(rule)
}

/// Removing the rule closes the day. Removing an absent rule is a no-op.
pub async fn delete_rule(pool: &PgPool, field_id: Uuid, day_of_week: i16) -> Result<(), ApiError> {
    sqlx::query("DELETE FROM availability_rules WHERE field_id = $1 AND day_of_week = $2")
        .bind(field_id)
        .bind(day_of_week)
        .execute(pool)
        .await?;
    Ok(())
}

/// Idempotent: re-blocking an already blocked hour succeeds silently, as does
/// blocking an hour on a day whose weekly rule is closed.
pub async fn insert_blocked_slot(
    pool: &PgPool,
    field_id: Uuid,
    slot_date: NaiveDate,
    hour: i16,
) -> Result<(), ApiError> {
    sqlx::query(
        r#"
        INSERT INTO blocked_slots (id, field_id, slot_date, hour)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (field_id, slot_date, hour) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(field_id)
    .bind(slot_date)
    .bind(hour)
    .execute(pool)
    .await?;
    Ok(())
}

/// Deleting a non-existent blocked slot is a no-op success.
pub async fn delete_blocked_slot(
    pool: &PgPool,
    field_id: Uuid,
    slot_date: NaiveDate,
    hour: i16,
) -> Result<(), ApiError> {
    sqlx::query("DELETE FROM blocked_slots WHERE field_id = $1 AND slot_date = $2 AND hour = $3")
        .bind(field_id)
        .bind(slot_date)
        .bind(hour)
        .execute(pool)
        .await?;
    Ok(())
}

#[derive(Debug, FromRow)]
struct DateHour {
    slot_date: NaiveDate,
    hour: i16,
}

/// Everything the resolver needs for [start, start + days): the field's
/// weekly rules, its blocked slots and its actively booked hours.
pub async fn fetch_schedule_facts(
    pool: &PgPool,
    field_id: Uuid,
    start: NaiveDate,
    days: u32,
) -> Result<ScheduleFacts, ApiError> {
    let end = start + Duration::days(days as i64);
    let mut facts = ScheduleFacts::default();

    let rules = sqlx::query_as::<_, WeeklyAvailabilityRule>(
        "SELECT id, field_id, day_of_week, open_hour, close_hour
         FROM availability_rules WHERE field_id = $1",
    )
    .bind(field_id)
    .fetch_all(pool)
    .await?;
    for rule in rules {
        facts
            .rules
            .insert(rule.day_of_week, (rule.open_hour, rule.close_hour));
    }

    let blocked = sqlx::query_as::<_, BlockedSlot>(
        "SELECT id, field_id, slot_date, hour
         FROM blocked_slots
         WHERE field_id = $1 AND slot_date >= $2 AND slot_date < $3",
    )
    .bind(field_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    for slot in blocked {
        facts
            .blocked
            .entry(slot.slot_date)
            .or_default()
            .insert(slot.hour);
    }

    let booked = sqlx::query_as::<_, DateHour>(
        "SELECT slot_date, hour
         FROM bookings
         WHERE field_id = $1 AND active AND slot_date >= $2 AND slot_date < $3",
    )
    .bind(field_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    for row in booked {
        facts
            .booked
            .entry(row.slot_date)
            .or_default()
            .insert(row.hour);
    }

    Ok(facts)
}
