/// Member signup

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::SessionService;
use crate::error::AppError;

#[derive(Deserialize)]
pub struct SignUpRequest {
    pub username: String,
    pub name: String,
    pub password: String,
}

/// Plain `{status, message}` body used where no tokens are returned
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: u16,
    pub message: String,
}

/// POST /api/members
///
/// Register a new member with username, display name, and password.
///
/// # Errors
/// - 400: Validation errors (invalid username/name/password)
/// - 409: Username already registered
/// - 503: Directory temporarily unavailable
pub async fn sign_up(
    form: web::Json<SignUpRequest>,
    service: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    service
        .sign_up(&form.username, &form.name, &form.password)
        .await?;

    Ok(HttpResponse::Created().json(StatusResponse {
        status: 201,
        message: "member created".to_string(),
    }))
}
