use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::booking::Booking;

/// Open matches gather individual players up to a capacity before teams are
/// known; closed matches are created directly from two pre-formed teams and
/// never go through a roster phase.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Open,
    Closed,
}

/// Derived from booking state, roster size and team presence. Never stored.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Open,
    Full,
    TeamsAssigned,
    Cancelled,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct MatchRecord {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub kind: MatchKind,
    pub min_players: Option<i16>,
    pub max_players: Option<i16>,
    pub created_at: DateTime<Utc>,
}

/// One roster seat, in join order. The organizer always occupies the first.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct RosterEntry {
    pub user_id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub age: i16,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct TeamMember {
    pub user_id: Uuid,
    pub username: String,
    pub side: i16,
}

#[derive(Debug, Serialize)]
pub struct TeamsView {
    pub team_one: Vec<TeamMember>,
    pub team_two: Vec<TeamMember>,
}

#[derive(Debug, Serialize)]
pub struct MatchDetails {
    #[serde(flatten)]
    pub record: MatchRecord,
    pub organizer_id: Uuid,
    pub booking: Booking,
    pub status: MatchStatus,
    pub players: Vec<RosterEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teams: Option<TeamsView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateOpenMatchRequest {
    pub booking_id: Uuid,
    pub min_players: i16,
    pub max_players: i16,
}

impl CreateOpenMatchRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.min_players < 2 {
            return Err("An open match needs at least 2 players".to_string());
        }
        if self.min_players > self.max_players {
            return Err("min_players cannot exceed max_players".to_string());
        }
        if self.max_players > 44 {
            return Err("max_players is unreasonably large".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateClosedMatchRequest {
    pub booking_id: Uuid,
    pub team_one: Vec<Uuid>,
    pub team_two: Vec<Uuid>,
}

impl CreateClosedMatchRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.team_one.is_empty() || self.team_two.is_empty() {
            return Err("Both teams must have at least one player".to_string());
        }
        if self.team_one.len() != self.team_two.len() {
            return Err("Teams must be the same size".to_string());
        }
        let mut seen = HashSet::new();
        for id in self.team_one.iter().chain(self.team_two.iter()) {
            if !seen.insert(*id) {
                return Err(format!("Player {} appears more than once", id));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TeamStrategy {
    Manual,
    Random,
    AgeBalanced,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssignTeamsRequest {
    pub strategy: TeamStrategy,
    /// Required for the manual strategy, ignored otherwise.
    #[serde(default)]
    pub team_one: Option<Vec<Uuid>>,
    #[serde(default)]
    pub team_two: Option<Vec<Uuid>>,
}
