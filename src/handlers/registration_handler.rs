use actix_web::{web, HttpResponse};
use secrecy::ExposeSecret;
use serde_json::json;
use sqlx::PgPool;

use crate::db;
use crate::error::ApiError;
use crate::models::user::RegistrationRequest;
use crate::utils::password::hash_password;

#[tracing::instrument(
    name = "Adding a new user",
    // Don't show arguments
    skip(user_form, pool),
    fields(
        username = %user_form.username,
        email = %user_form
    )
)]
pub async fn register_user(
    user_form: web::Json<RegistrationRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    user_form.validate().map_err(ApiError::Validation)?;

    let password_hash = hash_password(user_form.password.expose_secret());
    let user_id = db::users::insert_user(&pool, &user_form, &password_hash).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "User registered",
        "data": { "user_id": user_id }
    })))
}
