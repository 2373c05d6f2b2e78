/// Session token claims
///
/// Payload of a signed session token: subject, role set, token kind, and the
/// standard timestamp claims (RFC 7519).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::directory::Role;

/// Discriminates the two token kinds; each has its own validity window and
/// acceptable use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Role set granted at issuance; authorization never needs a directory
    /// round-trip for an access token
    pub roles: Vec<Role>,
    /// Access or refresh
    pub token_type: TokenKind,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
    /// Nonce; keeps two tokens issued in the same instant distinguishable
    pub jti: String,
}

impl Claims {
    pub fn new(
        username: String,
        roles: Vec<Role>,
        token_type: TokenKind,
        now: i64,
        expiry_seconds: i64,
        issuer: String,
    ) -> Self {
        Self {
            sub: username,
            roles,
            token_type,
            exp: now + expiry_seconds,
            iat: now,
            iss: issuer,
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Expiry judgment against a caller-supplied clock
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.exp
    }
}
