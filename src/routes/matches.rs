// src/routes/matches.rs
use actix_web::{delete, get, post, web, HttpResponse, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::{match_handler, roster_handler, team_handler};
use crate::middleware::auth::Claims;
use crate::models::matches::{
    AssignTeamsRequest, CreateClosedMatchRequest, CreateOpenMatchRequest,
};

/// Turn a booking into an open match that gathers players
#[post("/open")]
async fn create_open_match(
    request: web::Json<CreateOpenMatchRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    Ok(match_handler::create_open_match(request, pool, claims).await?)
}

/// Turn a booking into a closed match between two pre-formed teams
#[post("/closed")]
async fn create_closed_match(
    request: web::Json<CreateClosedMatchRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    Ok(match_handler::create_closed_match(request, pool, claims).await?)
}

/// Match details: booking, derived status, roster, teams
#[get("/{match_id}")]
async fn get_match(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    Ok(match_handler::get_match(path, pool).await?)
}

/// Organizer cancellation (cancels the underlying booking)
#[delete("/{match_id}")]
async fn cancel_match(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    Ok(match_handler::cancel_match(path, pool, claims).await?)
}

/// Take a roster seat in an open match
#[post("/{match_id}/join")]
async fn join_match(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    Ok(roster_handler::join_match(path, pool, claims).await?)
}

/// Give a roster seat back
#[post("/{match_id}/leave")]
async fn leave_match(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    Ok(roster_handler::leave_match(path, pool, claims).await?)
}

/// Partition the roster into two teams and freeze it
#[post("/{match_id}/teams")]
async fn assign_teams(
    path: web::Path<Uuid>,
    request: web::Json<AssignTeamsRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    Ok(team_handler::assign_teams(path, request, pool, claims).await?)
}
