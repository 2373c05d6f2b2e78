/// Login and refresh-token exchange

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{SessionService, TokenGrant};
use crate::error::AppError;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub grant_type: String,
    pub refresh_token: String,
}

/// Success shape shared by login and the refresh exchange; the timestamps
/// describe the access token.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub status: u16,
    pub message: String,
    pub access_token: String,
    pub refresh_token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TokenResponse {
    fn from_grant(message: &str, grant: TokenGrant) -> Self {
        Self {
            status: 200,
            message: message.to_string(),
            access_token: grant.access.token,
            refresh_token: grant.refresh.token,
            issued_at: grant.access.issued_at,
            expires_at: grant.access.expires_at,
        }
    }
}

/// POST /api/login
///
/// Authenticate with username and password; returns a fresh access/refresh
/// pair and stores the refresh token as the member's only live one.
///
/// # Errors
/// - 400: Bad credentials (unknown username and wrong password look alike)
/// - 503: Directory temporarily unavailable
pub async fn login(
    form: web::Json<LoginRequest>,
    service: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    let grant = service
        .login(&form.username, &form.password, Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(TokenResponse::from_grant("login succeeded", grant)))
}

/// POST /api/refreshToken
///
/// Exchange a valid refresh token for a new pair. The stored token rotates:
/// after a successful exchange the presented token is dead, and replaying it
/// is rejected.
///
/// # Errors
/// - 400: Unsupported grant type
/// - 401: Invalid, expired, wrong-kind, or superseded refresh token
/// - 503: Directory temporarily unavailable
pub async fn refresh_token(
    form: web::Json<RefreshRequest>,
    service: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    let grant = service
        .exchange(&form.grant_type, &form.refresh_token, Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(TokenResponse::from_grant("token refreshed", grant)))
}
