use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The core treats the field as an opaque key; name and owner exist only so
/// availability edits can be authorized.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Field {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateFieldRequest {
    pub name: String,
}

impl CreateFieldRequest {
    pub fn validate(&self) -> Result<(), String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Field name cannot be empty".to_string());
        }
        if name.len() > 100 {
            return Err("Field name cannot exceed 100 characters".to_string());
        }
        Ok(())
    }
}
