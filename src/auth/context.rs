/// Per-request security context
///
/// Built by the authentication gate from a verified access token, carried in
/// request extensions for the lifetime of the request, discarded afterwards.
/// Never persisted.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};

use crate::directory::Role;
use crate::error::{AppError, AuthError, TokenError};
use crate::token::VerifiedIdentity;

#[derive(Debug, Clone)]
pub struct SecurityContext {
    pub username: String,
    pub roles: Vec<Role>,
}

impl SecurityContext {
    pub fn from_verified(verified: VerifiedIdentity) -> Self {
        Self {
            username: verified.username,
            roles: verified.roles,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(AuthError::InsufficientRole.into())
        }
    }
}

/// Failure reason the gate records when a presented token does not verify;
/// rendered as a 401 if a protected handler is reached.
#[derive(Debug, Clone, Copy)]
pub struct GateRejection(pub TokenError);

impl FromRequest for SecurityContext {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let extensions = req.extensions();

        let result = if let Some(ctx) = extensions.get::<SecurityContext>() {
            Ok(ctx.clone())
        } else if let Some(GateRejection(kind)) = extensions.get::<GateRejection>().copied() {
            Err(AppError::Token(kind))
        } else {
            Err(AppError::Auth(AuthError::MissingToken))
        };

        ready(result)
    }
}
