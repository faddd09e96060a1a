use chrono::{DateTime, Utc};
use rand::Rng;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::ApiError;
use crate::matches::formation::{self, RosterPlayer, TeamSplit};
use crate::matches::status::derive_status;
use crate::models::booking::Booking;
use crate::models::matches::{
    AssignTeamsRequest, MatchDetails, MatchRecord, MatchStatus, RosterEntry, TeamMember,
    TeamStrategy, TeamsView,
};

/// Match row joined with the facts of its booking, fetched under a row lock
/// so roster and team mutations serialize per match.
#[derive(Debug, FromRow)]
struct LockedMatch {
    id: Uuid,
    min_players: Option<i16>,
    max_players: Option<i16>,
    booking_active: bool,
    organizer_id: Uuid,
}

async fn lock_match(
    tx: &mut Transaction<'_, Postgres>,
    match_id: Uuid,
) -> Result<Option<LockedMatch>, ApiError> {
    let locked = sqlx::query_as::<_, LockedMatch>(
        r#"
        SELECT m.id, m.min_players, m.max_players,
               b.active AS booking_active, b.user_id AS organizer_id
        FROM matches m
        JOIN bookings b ON b.id = m.booking_id
        WHERE m.id = $1
        FOR UPDATE OF m
        "#,
    )
    .bind(match_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(locked)
}

async fn teams_assigned(
    tx: &mut Transaction<'_, Postgres>,
    match_id: Uuid,
) -> Result<bool, ApiError> {
    let assigned = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM match_team_members WHERE match_id = $1)",
    )
    .bind(match_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(assigned)
}

async fn roster_count(
    tx: &mut Transaction<'_, Postgres>,
    match_id: Uuid,
) -> Result<usize, ApiError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM match_participants WHERE match_id = $1",
    )
    .bind(match_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(count as usize)
}

fn map_booking_taken(e: sqlx::Error) -> ApiError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApiError::Validation("Booking is already attached to a match".to_string())
        }
        _ => ApiError::from(e),
    }
}

/// Create an open match around an active booking. The organizer takes the
/// first roster seat so capacity counts them from the start.
pub async fn insert_open_match(
    pool: &PgPool,
    booking: &Booking,
    min_players: i16,
    max_players: i16,
) -> Result<MatchRecord, ApiError> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();

    let record = sqlx::query_as::<_, MatchRecord>(
        r#"
        INSERT INTO matches (id, booking_id, kind, min_players, max_players, created_at)
        VALUES ($1, $2, 'open', $3, $4, $5)
        RETURNING id, booking_id, kind, min_players, max_players, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(booking.id)
    .bind(min_players)
    .bind(max_players)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(map_booking_taken)?;

    sqlx::query(
        "INSERT INTO match_participants (id, match_id, user_id, joined_at)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(Uuid::new_v4())
    .bind(record.id)
    .bind(booking.user_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(record)
}

/// Create a closed match: both team sheets are fixed at creation and there is
/// no roster phase.
pub async fn insert_closed_match(
    pool: &PgPool,
    booking: &Booking,
    team_one: &[Uuid],
    team_two: &[Uuid],
) -> Result<MatchRecord, ApiError> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();

    let record = sqlx::query_as::<_, MatchRecord>(
        r#"
        INSERT INTO matches (id, booking_id, kind, min_players, max_players, created_at)
        VALUES ($1, $2, 'closed', NULL, NULL, $3)
        RETURNING id, booking_id, kind, min_players, max_players, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(booking.id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(map_booking_taken)?;

    insert_team_rows(&mut tx, record.id, team_one, team_two, now).await?;

    tx.commit().await?;
    Ok(record)
}

pub async fn get_match(pool: &PgPool, match_id: Uuid) -> Result<Option<MatchRecord>, ApiError> {
    let record = sqlx::query_as::<_, MatchRecord>(
        "SELECT id, booking_id, kind, min_players, max_players, created_at
         FROM matches WHERE id = $1",
    )
    .bind(match_id)
    .fetch_optional(pool)
    .await?;
    Ok(record)
}

/// Full read model: record, booking, derived status, roster in join order and
/// the team sheets once assigned.
pub async fn get_match_details(
    pool: &PgPool,
    match_id: Uuid,
) -> Result<Option<MatchDetails>, ApiError> {
    let record = match get_match(pool, match_id).await? {
        Some(record) => record,
        None => return Ok(None),
    };

    let booking = sqlx::query_as::<_, Booking>(
        "SELECT id, field_id, slot_date, hour, user_id, active, created_at
         FROM bookings WHERE id = $1",
    )
    .bind(record.booking_id)
    .fetch_one(pool)
    .await?;

    let players = sqlx::query_as::<_, RosterEntry>(
        r#"
        SELECT mp.user_id, u.username, u.first_name, u.last_name, u.age, mp.joined_at
        FROM match_participants mp
        JOIN users u ON u.id = mp.user_id
        WHERE mp.match_id = $1
        ORDER BY mp.joined_at, mp.id
        "#,
    )
    .bind(match_id)
    .fetch_all(pool)
    .await?;

    let members = sqlx::query_as::<_, TeamMember>(
        r#"
        SELECT mtm.user_id, u.username, mtm.side
        FROM match_team_members mtm
        JOIN users u ON u.id = mtm.user_id
        WHERE mtm.match_id = $1
        ORDER BY mtm.side, mtm.assigned_at, mtm.id
        "#,
    )
    .bind(match_id)
    .fetch_all(pool)
    .await?;

    let teams = if members.is_empty() {
        None
    } else {
        let (team_one, team_two): (Vec<TeamMember>, Vec<TeamMember>) =
            members.into_iter().partition(|m| m.side == 1);
        Some(TeamsView { team_one, team_two })
    };

    let status = derive_status(
        booking.active,
        teams.is_some(),
        players.len(),
        record.max_players,
    );

    Ok(Some(MatchDetails {
        organizer_id: booking.user_id,
        record,
        booking,
        status,
        players,
        teams,
    }))
}

/// Append a player to the roster. Runs under the match row lock so the
/// capacity check serializes: the (k+1)-th concurrent join observes k seats
/// taken and fails with `MatchFull`.
pub async fn join_match(pool: &PgPool, match_id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
    let mut tx = pool.begin().await?;

    let locked = lock_match(&mut tx, match_id)
        .await?
        .ok_or(ApiError::NotFound("match"))?;
    let assigned = teams_assigned(&mut tx, match_id).await?;
    let count = roster_count(&mut tx, match_id).await?;

    let status = derive_status(locked.booking_active, assigned, count, locked.max_players);
    if status == MatchStatus::TeamsAssigned || status == MatchStatus::Cancelled {
        return Err(ApiError::MatchClosed);
    }
    if user_id == locked.organizer_id {
        return Err(ApiError::IsOrganizer);
    }

    let already_member = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM match_participants WHERE match_id = $1 AND user_id = $2)",
    )
    .bind(match_id)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;
    if already_member {
        return Err(ApiError::AlreadyMember);
    }

    if let Some(max) = locked.max_players {
        if count >= max as usize {
            return Err(ApiError::MatchFull);
        }
    }

    sqlx::query(
        "INSERT INTO match_participants (id, match_id, user_id, joined_at)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(Uuid::new_v4())
    .bind(match_id)
    .bind(user_id)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Remove a player from the roster. The only permitted backward transition:
/// a FULL match becomes OPEN again once the seat frees up.
pub async fn leave_match(pool: &PgPool, match_id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
    let mut tx = pool.begin().await?;

    let locked = lock_match(&mut tx, match_id)
        .await?
        .ok_or(ApiError::NotFound("match"))?;
    let assigned = teams_assigned(&mut tx, match_id).await?;
    let count = roster_count(&mut tx, match_id).await?;

    let status = derive_status(locked.booking_active, assigned, count, locked.max_players);
    if status == MatchStatus::TeamsAssigned || status == MatchStatus::Cancelled {
        return Err(ApiError::MatchClosed);
    }
    if user_id == locked.organizer_id {
        return Err(ApiError::IsOrganizer);
    }

    let removed = sqlx::query("DELETE FROM match_participants WHERE match_id = $1 AND user_id = $2")
        .bind(match_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    if removed.rows_affected() == 0 {
        return Err(ApiError::NotMember);
    }

    tx.commit().await?;
    Ok(())
}

#[derive(Debug, FromRow)]
struct RosterSeat {
    user_id: Uuid,
    age: i16,
}

/// Compute and commit a team split in one transaction. Guards re-evaluate
/// under the row lock, so a second commit or a commit on a cancelled match
/// fails before any row is written; a mid-flight failure rolls the whole
/// assignment back.
pub async fn assign_teams<R: Rng + ?Sized>(
    pool: &PgPool,
    match_id: Uuid,
    requester_id: Uuid,
    request: &AssignTeamsRequest,
    rng: &mut R,
) -> Result<TeamSplit, ApiError> {
    let mut tx = pool.begin().await?;

    let locked = lock_match(&mut tx, match_id)
        .await?
        .ok_or(ApiError::NotFound("match"))?;
    if requester_id != locked.organizer_id {
        return Err(ApiError::Forbidden(
            "Only the organizer can assign teams".to_string(),
        ));
    }
    if !locked.booking_active {
        return Err(ApiError::InvalidTransition(
            "match is cancelled".to_string(),
        ));
    }
    if teams_assigned(&mut tx, match_id).await? {
        return Err(ApiError::InvalidTransition(
            "teams are already assigned".to_string(),
        ));
    }

    let seats = sqlx::query_as::<_, RosterSeat>(
        r#"
        SELECT mp.user_id, u.age
        FROM match_participants mp
        JOIN users u ON u.id = mp.user_id
        WHERE mp.match_id = $1
        ORDER BY mp.joined_at, mp.id
        "#,
    )
    .bind(match_id)
    .fetch_all(&mut *tx)
    .await?;

    if let Some(min) = locked.min_players {
        if seats.len() < min as usize {
            return Err(ApiError::InvalidTransition(format!(
                "roster has {} players but the match needs at least {}",
                seats.len(),
                min
            )));
        }
    }

    let roster: Vec<RosterPlayer> = seats
        .iter()
        .enumerate()
        .map(|(i, seat)| RosterPlayer {
            user_id: seat.user_id,
            age: seat.age,
            join_order: i,
        })
        .collect();

    let split = match request.strategy {
        TeamStrategy::Manual => {
            let team_one = request.team_one.as_deref().ok_or_else(|| {
                ApiError::Validation("Manual strategy requires team_one".to_string())
            })?;
            let team_two = request.team_two.as_deref().ok_or_else(|| {
                ApiError::Validation("Manual strategy requires team_two".to_string())
            })?;
            formation::validate_manual(&roster, team_one, team_two)?
        }
        TeamStrategy::Random => formation::split_random(&roster, rng),
        TeamStrategy::AgeBalanced => formation::split_age_balanced(&roster),
    };

    insert_team_rows(&mut tx, locked.id, &split.team_one, &split.team_two, Utc::now()).await?;

    tx.commit().await?;
    Ok(split)
}

async fn insert_team_rows(
    tx: &mut Transaction<'_, Postgres>,
    match_id: Uuid,
    team_one: &[Uuid],
    team_two: &[Uuid],
    assigned_at: DateTime<Utc>,
) -> Result<(), ApiError> {
    for (side, members) in [(1i16, team_one), (2i16, team_two)] {
        for user_id in members {
            sqlx::query(
                "INSERT INTO match_team_members (id, match_id, user_id, side, assigned_at)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(Uuid::new_v4())
            .bind(match_id)
            .bind(user_id)
            .bind(side)
            .bind(assigned_at)
            .execute(&mut **tx)
            .await?;
        }
    }
    Ok(())
}
