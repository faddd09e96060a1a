use actix_web::{web, HttpResponse};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::availability::resolver;
use crate::db;
use crate::error::ApiError;
use crate::handlers::field_handler::{get_owned_field, requester_id};
use crate::middleware::auth::Claims;
use crate::models::availability::{AvailabilityQuery, BlockedSlotRequest, UpsertRuleRequest};
use crate::models::common::ApiResponse;

const MAX_RANGE_DAYS: u32 = 60;

/// Publish (or replace) the weekly opening window for one weekday.
#[tracing::instrument(
    name = "Upsert availability rule",
    skip(request, pool, claims),
    fields(user = %claims.username, field_id = %field_id)
)]
pub async fn upsert_rule(
    field_id: web::Path<Uuid>,
    request: web::Json<UpsertRuleRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ApiError> {
    let field_id = field_id.into_inner();
    request.validate().map_err(ApiError::Validation)?;
    let requester = requester_id(&claims)?;
    get_owned_field(&pool, field_id, requester).await?;

    let rule = db::availability::upsert_rule(&pool, field_id, &request).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Rule saved", rule)))
}

/// Close a weekday wholesale by removing its rule.
#[tracing::instrument(
    name = "Delete availability rule",
    skip(pool, claims),
    fields(user = %claims.username)
)]
pub async fn delete_rule(
    path: web::Path<(Uuid, i16)>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ApiError> {
    let (field_id, day_of_week) = path.into_inner();
    if !(0..7).contains(&day_of_week) {
        return Err(ApiError::Validation(
            "day_of_week must be between 0 (Monday) and 6 (Sunday)".to_string(),
        ));
    }
    let requester = requester_id(&claims)?;
    get_owned_field(&pool, field_id, requester).await?;

    db::availability::delete_rule(&pool, field_id, day_of_week).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Day closed")))
}

#[tracing::instrument(
    name = "Add blocked slot",
    skip(request, pool, claims),
    fields(user = %claims.username, field_id = %field_id)
)]
pub async fn add_blocked_slot(
    field_id: web::Path<Uuid>,
    request: web::Json<BlockedSlotRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ApiError> {
    let field_id = field_id.into_inner();
    request.validate().map_err(ApiError::Validation)?;
    let requester = requester_id(&claims)?;
    get_owned_field(&pool, field_id, requester).await?;

    db::availability::insert_blocked_slot(&pool, field_id, request.slot_date, request.hour).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Slot blocked")))
}

/// Removing an absent block is a no-op success by contract.
#[tracing::instrument(
    name = "Remove blocked slot",
    skip(request, pool, claims),
    fields(user = %claims.username, field_id = %field_id)
)]
pub async fn remove_blocked_slot(
    field_id: web::Path<Uuid>,
    request: web::Json<BlockedSlotRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ApiError> {
    let field_id = field_id.into_inner();
    request.validate().map_err(ApiError::Validation)?;
    let requester = requester_id(&claims)?;
    get_owned_field(&pool, field_id, requester).await?;

    db::availability::delete_blocked_slot(&pool, field_id, request.slot_date, request.hour).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Slot unblocked")))
}

/// Resolve the bookable hours for the next `days` dates, starting today.
#[tracing::instrument(
    name = "Get available hours",
    skip(pool),
    fields(field_id = %field_id)
)]
pub async fn get_available_hours(
    field_id: web::Path<Uuid>,
    query: web::Query<AvailabilityQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let field_id = field_id.into_inner();
    if query.days == 0 || query.days > MAX_RANGE_DAYS {
        return Err(ApiError::Validation(format!(
            "days must be between 1 and {}",
            MAX_RANGE_DAYS
        )));
    }
    db::fields::get_field(&pool, field_id)
        .await?
        .ok_or(ApiError::NotFound("field"))?;

    let now = Utc::now();
    let start = now.date_naive();
    let facts = db::availability::fetch_schedule_facts(&pool, field_id, start, query.days).await?;
    let days = resolver::resolve_range(&facts, start, query.days, now);

    Ok(HttpResponse::Ok().json(ApiResponse::success("Availability", days)))
}
