// src/routes/fields.rs
use actix_web::{delete, get, post, put, web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::{availability_handler, field_handler};
use crate::middleware::auth::Claims;
use crate::models::availability::{AvailabilityQuery, BlockedSlotRequest, UpsertRuleRequest};
use crate::models::field::CreateFieldRequest;

/// Register a field (thin glue: the core only needs the opaque id + owner)
#[post("")]
async fn create_field(
    request: web::Json<CreateFieldRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    Ok(field_handler::create_field(request, pool, claims).await?)
}

/// List registered fields
#[get("")]
async fn get_fields(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    Ok(field_handler::get_fields(pool).await?)
}

/// Resolve bookable hours for the coming days
#[get("/{field_id}/availability")]
async fn get_available_hours(
    path: web::Path<Uuid>,
    query: web::Query<AvailabilityQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    Ok(availability_handler::get_available_hours(path, query, pool).await?)
}

/// Publish or replace a weekly opening rule
#[put("/{field_id}/availability/rules")]
async fn upsert_rule(
    path: web::Path<Uuid>,
    request: web::Json<UpsertRuleRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    Ok(availability_handler::upsert_rule(path, request, pool, claims).await?)
}

/// Close a weekday
#[delete("/{field_id}/availability/rules/{day_of_week}")]
async fn delete_rule(
    path: web::Path<(Uuid, i16)>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    Ok(availability_handler::delete_rule(path, pool, claims).await?)
}

/// Remove a single hour from an open day
#[post("/{field_id}/availability/blocks")]
async fn add_blocked_slot(
    path: web::Path<Uuid>,
    request: web::Json<BlockedSlotRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    Ok(availability_handler::add_blocked_slot(path, request, pool, claims).await?)
}

/// Reinstate a previously blocked hour (no-op if absent)
#[delete("/{field_id}/availability/blocks")]
async fn remove_blocked_slot(
    path: web::Path<Uuid>,
    request: web::Json<BlockedSlotRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    Ok(availability_handler::remove_blocked_slot(path, request, pool, claims).await?)
}
