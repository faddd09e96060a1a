// src/routes/bookings.rs
use actix_web::{delete, post, web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::booking_handler;
use crate::middleware::auth::Claims;
use crate::models::booking::CreateBookingRequest;

/// Reserve a resolved free slot
#[post("")]
async fn create_booking(
    request: web::Json<CreateBookingRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    Ok(booking_handler::create_booking(request, pool, claims).await?)
}

/// Cancel a booking (logical, owner only)
#[delete("/{booking_id}")]
async fn cancel_booking(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    Ok(booking_handler::cancel_booking(path, pool, claims).await?)
}
