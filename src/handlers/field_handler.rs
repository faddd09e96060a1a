use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::error::ApiError;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::field::{CreateFieldRequest, Field};

pub(crate) fn requester_id(claims: &Claims) -> Result<Uuid, ApiError> {
    claims
        .user_id()
        .ok_or_else(|| ApiError::Validation("Invalid user ID in token".to_string()))
}

/// Look a field up and verify the requester owns it. Availability is only
/// ever edited by the field owner.
pub(crate) async fn get_owned_field(
    pool: &PgPool,
    field_id: Uuid,
    requester: Uuid,
) -> Result<Field, ApiError> {
    let field = db::fields::get_field(pool, field_id)
        .await?
        .ok_or(ApiError::NotFound("field"))?;
    if field.owner_id != requester {
        return Err(ApiError::Forbidden(
            "Only the field owner can edit its availability".to_string(),
        ));
    }
    Ok(field)
}

#[tracing::instrument(
    name = "Register field",
    skip(request, pool, claims),
    fields(user = %claims.username)
)]
pub async fn create_field(
    request: web::Json<CreateFieldRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ApiError> {
    request.validate().map_err(ApiError::Validation)?;
    let owner_id = requester_id(&claims)?;

    let field = db::fields::insert_field(&pool, &request.name, owner_id).await?;
    tracing::info!("Field {} registered by {}", field.id, claims.username);

    Ok(HttpResponse::Created().json(ApiResponse::success("Field registered", field)))
}

pub async fn get_fields(pool: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let fields = db::fields::list_fields(&pool).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Fields", fields)))
}
