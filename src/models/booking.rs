use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Exclusive occupancy of one (field, date, hour). Cancellation flips
/// `active`; rows are never deleted so history stays queryable.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Booking {
    pub id: Uuid,
    pub field_id: Uuid,
    pub slot_date: NaiveDate,
    pub hour: i16,
    pub user_id: Uuid,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub field_id: Uuid,
    pub slot_date: NaiveDate,
    pub hour: i16,
}
