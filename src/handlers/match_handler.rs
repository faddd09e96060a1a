use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::error::ApiError;
use crate::handlers::field_handler::requester_id;
use crate::middleware::auth::Claims;
use crate::models::booking::Booking;
use crate::models::common::ApiResponse;
use crate::models::matches::{CreateClosedMatchRequest, CreateOpenMatchRequest};

/// A match always wraps exactly one active booking owned by the caller.
async fn get_wrappable_booking(
    pool: &PgPool,
    booking_id: Uuid,
    requester: Uuid,
) -> Result<Booking, ApiError> {
    let booking = db::bookings::get_booking(pool, booking_id)
        .await?
        .ok_or(ApiError::NotFound("booking"))?;
    if booking.user_id != requester {
        return Err(ApiError::Forbidden(
            "Only the booking owner can organize a match on it".to_string(),
        ));
    }
    if !booking.active {
        return Err(ApiError::InvalidTransition(
            "booking is cancelled".to_string(),
        ));
    }
    Ok(booking)
}

#[tracing::instrument(
    name = "Create open match",
    skip(request, pool, claims),
    fields(user = %claims.username, booking_id = %request.booking_id)
)]
pub async fn create_open_match(
    request: web::Json<CreateOpenMatchRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ApiError> {
    request.validate().map_err(ApiError::Validation)?;
    let requester = requester_id(&claims)?;
    let booking = get_wrappable_booking(&pool, request.booking_id, requester).await?;

    let record =
        db::matches::insert_open_match(&pool, &booking, request.min_players, request.max_players)
            .await?;
    tracing::info!("Open match {} created by {}", record.id, claims.username);

    Ok(HttpResponse::Created().json(ApiResponse::success("Match created", record)))
}

#[tracing::instrument(
    name = "Create closed match",
    skip(request, pool, claims),
    fields(user = %claims.username, booking_id = %request.booking_id)
)]
pub async fn create_closed_match(
    request: web::Json<CreateClosedMatchRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ApiError> {
    request.validate().map_err(ApiError::Validation)?;
    let requester = requester_id(&claims)?;
    let booking = get_wrappable_booking(&pool, request.booking_id, requester).await?;

    let all_ids: Vec<Uuid> = request
        .team_one
        .iter()
        .chain(request.team_two.iter())
        .copied()
        .collect();
    let known = db::users::get_players_by_ids(&pool, &all_ids).await?;
    if known.len() != all_ids.len() {
        return Err(ApiError::Validation(
            "One or more team members are unknown players".to_string(),
        ));
    }

    let record =
        db::matches::insert_closed_match(&pool, &booking, &request.team_one, &request.team_two)
            .await?;
    tracing::info!("Closed match {} created by {}", record.id, claims.username);

    Ok(HttpResponse::Created().json(ApiResponse::success("Match created", record)))
}

pub async fn get_match(
    match_id: web::Path<Uuid>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let details = db::matches::get_match_details(&pool, match_id.into_inner())
        .await?
        .ok_or(ApiError::NotFound("match"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Match", details)))
}

/// Organizer cancellation: deactivates the underlying booking, which derives
/// the match into CANCELLED from any state.
#[tracing::instrument(
    name = "Cancel match",
    skip(pool, claims),
    fields(user = %claims.username, match_id = %match_id)
)]
pub async fn cancel_match(
    match_id: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ApiError> {
    let match_id = match_id.into_inner();
    let requester = requester_id(&claims)?;

    let record = db::matches::get_match(&pool, match_id)
        .await?
        .ok_or(ApiError::NotFound("match"))?;
    let booking = db::bookings::get_booking(&pool, record.booking_id)
        .await?
        .ok_or(ApiError::NotFound("booking"))?;

    if booking.user_id != requester {
        return Err(ApiError::Forbidden(
            "Only the organizer can cancel the match".to_string(),
        ));
    }
    if !booking.active {
        return Err(ApiError::InvalidTransition(
            "match is already cancelled".to_string(),
        ));
    }

    db::bookings::deactivate_booking(&pool, booking.id).await?;
    tracing::info!("Match {} cancelled by {}", match_id, claims.username);

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Match cancelled")))
}
