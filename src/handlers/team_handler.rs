use actix_web::{web, HttpResponse};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::error::ApiError;
use crate::handlers::field_handler::requester_id;
use crate::middleware::auth::Claims;
use crate::models::matches::AssignTeamsRequest;

/// One-shot terminal transition: partition the roster, persist both sides
/// and freeze further roster mutation. Organizer only.
#[tracing::instrument(
    name = "Assign teams",
    skip(request, pool, claims),
    fields(user = %claims.username, match_id = %match_id, strategy = ?request.strategy)
)]
pub async fn assign_teams(
    match_id: web::Path<Uuid>,
    request: web::Json<AssignTeamsRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ApiError> {
    let match_id = match_id.into_inner();
    let requester = requester_id(&claims)?;

    let mut rng = StdRng::from_entropy();
    let split = db::matches::assign_teams(&pool, match_id, requester, &request, &mut rng).await?;
    tracing::info!(
        "Teams assigned for match {} ({} vs {})",
        match_id,
        split.team_one.len(),
        split.team_two.len()
    );

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Teams assigned",
        "data": {
            "team_one": split.team_one,
            "team_two": split.team_two,
        }
    })))
}
