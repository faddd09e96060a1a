use actix_web::{web, HttpResponse};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::availability::resolver;
use crate::db;
use crate::error::ApiError;
use crate::handlers::field_handler::requester_id;
use crate::middleware::auth::Claims;
use crate::models::booking::CreateBookingRequest;
use crate::models::common::ApiResponse;

/// Reserve a slot. Availability is re-resolved here at commit time — the
/// caller's earlier read may be stale — and the final arbiter is the partial
/// unique index on active bookings, so of two racing callers exactly one
/// succeeds.
#[tracing::instrument(
    name = "Create booking",
    skip(request, pool, claims),
    fields(
        user = %claims.username,
        field_id = %request.field_id,
        slot_date = %request.slot_date,
        hour = %request.hour
    )
)]
pub async fn create_booking(
    request: web::Json<CreateBookingRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ApiError> {
    let user_id = requester_id(&claims)?;

    if !(0..24).contains(&request.hour) {
        return Err(ApiError::InvalidSlot("hour must be 0..23".to_string()));
    }
    let now = Utc::now();
    let slot_start = request
        .slot_date
        .and_hms_opt(request.hour as u32, 0, 0)
        .ok_or_else(|| ApiError::InvalidSlot("malformed date".to_string()))?;
    if slot_start < now.naive_utc() {
        return Err(ApiError::InvalidSlot(
            "slot lies in the past".to_string(),
        ));
    }

    db::fields::get_field(&pool, request.field_id)
        .await?
        .ok_or(ApiError::NotFound("field"))?;

    let facts =
        db::availability::fetch_schedule_facts(&pool, request.field_id, request.slot_date, 1)
            .await?;
    let open_hours = resolver::resolve_day(&facts, request.slot_date, now);
    if !open_hours.contains(&request.hour) {
        return Err(ApiError::SlotUnavailable);
    }

    let booking = db::bookings::insert_booking(&pool, &request, user_id)
        .await?
        .ok_or(ApiError::SlotUnavailable)?;

    tracing::info!("Booking {} created", booking.id);
    Ok(HttpResponse::Created().json(ApiResponse::success("Slot booked", booking)))
}

/// Logical cancellation by the booking owner. Match-organizer cancellation
/// goes through the match cancellation flow instead.
#[tracing::instrument(
    name = "Cancel booking",
    skip(pool, claims),
    fields(user = %claims.username, booking_id = %booking_id)
)]
pub async fn cancel_booking(
    booking_id: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ApiError> {
    let booking_id = booking_id.into_inner();
    let requester = requester_id(&claims)?;

    let booking = db::bookings::get_booking(&pool, booking_id)
        .await?
        .ok_or(ApiError::NotFound("booking"))?;
    if booking.user_id != requester {
        return Err(ApiError::Forbidden(
            "Only the booking owner can cancel it".to_string(),
        ));
    }
    if !booking.active {
        return Err(ApiError::InvalidTransition(
            "booking is already cancelled".to_string(),
        ));
    }

    db::bookings::deactivate_booking(&pool, booking_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Booking cancelled")))
}
