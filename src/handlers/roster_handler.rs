use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::error::ApiError;
use crate::handlers::field_handler::requester_id;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;

#[tracing::instrument(
    name = "Join match",
    skip(pool, claims),
    fields(user = %claims.username, match_id = %match_id)
)]
pub async fn join_match(
    match_id: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ApiError> {
    let match_id = match_id.into_inner();
    let user_id = requester_id(&claims)?;

    db::matches::join_match(&pool, match_id, user_id).await?;
    tracing::info!("{} joined match {}", claims.username, match_id);

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Joined match")))
}

#[tracing::instrument(
    name = "Leave match",
    skip(pool, claims),
    fields(user = %claims.username, match_id = %match_id)
)]
pub async fn leave_match(
    match_id: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ApiError> {
    let match_id = match_id.into_inner();
    let user_id = requester_id(&claims)?;

    db::matches::leave_match(&pool, match_id, user_id).await?;
    tracing::info!("{} left match {}", claims.username, match_id);

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Left match")))
}
