use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One weekly opening rule per (field, weekday). `day_of_week` is
/// Monday-first, 0..6. The bookable window is [open_hour, close_hour).
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct WeeklyAvailabilityRule {
    pub id: Uuid,
    pub field_id: Uuid,
    pub day_of_week: i16,
    pub open_hour: i16,
    pub close_hour: i16,
}

/// A single hour removed from an otherwise-open day.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct BlockedSlot {
    pub id: Uuid,
    pub field_id: Uuid,
    pub slot_date: NaiveDate,
    pub hour: i16,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpsertRuleRequest {
    pub day_of_week: i16,
    pub open_hour: i16,
    pub close_hour: i16,
}

impl UpsertRuleRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !(0..7).contains(&self.day_of_week) {
            return Err("day_of_week must be between 0 (Monday) and 6 (Sunday)".to_string());
        }
        if !(0..24).contains(&self.open_hour) || !(1..=24).contains(&self.close_hour) {
            return Err("Hours must lie within a single day".to_string());
        }
        if self.open_hour >= self.close_hour {
            return Err("open_hour must be strictly before close_hour".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BlockedSlotRequest {
    pub slot_date: NaiveDate,
    pub hour: i16,
}

impl BlockedSlotRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !(0..24).contains(&self.hour) {
            return Err("hour must be between 0 and 23".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_days() -> u32 {
    7
}

/// One date's worth of bookable hours, hours ascending.
#[derive(Debug, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub hours: Vec<i16>,
}
