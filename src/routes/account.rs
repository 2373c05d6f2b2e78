/// Authenticated member information

use actix_web::HttpResponse;
use serde::Serialize;

use crate::auth::SecurityContext;
use crate::directory::Role;
use crate::error::AppError;

#[derive(Serialize)]
pub struct MeResponse {
    pub username: String,
    pub roles: Vec<Role>,
}

/// GET /api/me
///
/// Returns the caller's identity as reconstructed from the access token.
/// Requires the USER role.
///
/// # Errors
/// - 401: Missing or failed bearer token (recorded by the gate)
/// - 403: Authenticated but lacking the USER role
pub async fn me(ctx: SecurityContext) -> Result<HttpResponse, AppError> {
    ctx.require_role(Role::User)?;

    Ok(HttpResponse::Ok().json(MeResponse {
        username: ctx.username,
        roles: ctx.roles,
    }))
}
