/// Token issuance
///
/// Builds signed access/refresh tokens for an authenticated identity. Owns
/// the expiry-duration policy; the clock is always supplied by the caller.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::EncodingKey;

use crate::configuration::TokenSettings;
use crate::directory::Identity;
use crate::error::AppError;
use crate::token::claims::{Claims, TokenKind};
use crate::token::codec;

/// A freshly signed token plus the metadata the response boundary renders
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
    issuer: String,
}

impl TokenIssuer {
    pub fn new(settings: &TokenSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            access_token_expiry: settings.access_token_expiry,
            refresh_token_expiry: settings.refresh_token_expiry,
            issuer: settings.issuer.clone(),
        }
    }

    /// Short-lived credential authorizing individual requests
    pub fn issue_access_token(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        self.issue(identity, TokenKind::Access, self.access_token_expiry, now)
    }

    /// Long-lived credential exchanged for a new token pair
    pub fn issue_refresh_token(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        self.issue(identity, TokenKind::Refresh, self.refresh_token_expiry, now)
    }

    fn issue(
        &self,
        identity: &Identity,
        kind: TokenKind,
        expiry_seconds: i64,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        let claims = Claims::new(
            identity.username.clone(),
            identity.roles.clone(),
            kind,
            now.timestamp(),
            expiry_seconds,
            self.issuer.clone(),
        );

        let token = codec::encode(&claims, &self.encoding_key)?;

        Ok(IssuedToken {
            token,
            issued_at: now,
            expires_at: now + Duration::seconds(expiry_seconds),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::Role;
    use crate::token::codec;

    fn test_settings() -> TokenSettings {
        TokenSettings {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
            issuer: "authd-test".to_string(),
            refresh_grant_type: "refreshToken".to_string(),
            public_paths: vec![],
        }
    }

    fn alice() -> Identity {
        Identity {
            username: "alice".to_string(),
            name: "Alice".to_string(),
            password_hash: "$2b$12$not-a-real-hash".to_string(),
            roles: vec![Role::User, Role::Admin],
            refresh_token: None,
        }
    }

    #[test]
    fn access_token_uses_the_short_window() {
        let issuer = TokenIssuer::new(&test_settings());
        let now = Utc::now();

        let issued = issuer.issue_access_token(&alice(), now).unwrap();

        assert_eq!(issued.issued_at, now);
        assert_eq!(issued.expires_at, now + Duration::seconds(900));

        let claims = codec::decode(&issued.token).unwrap();
        assert_eq!(claims.token_type, TokenKind::Access);
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.roles, vec![Role::User, Role::Admin]);
    }

    #[test]
    fn refresh_token_uses_the_long_window() {
        let issuer = TokenIssuer::new(&test_settings());
        let now = Utc::now();

        let issued = issuer.issue_refresh_token(&alice(), now).unwrap();

        assert_eq!(issued.expires_at, now + Duration::seconds(604800));
        let claims = codec::decode(&issued.token).unwrap();
        assert_eq!(claims.token_type, TokenKind::Refresh);
    }

    #[test]
    fn same_instant_tokens_are_distinct_strings() {
        let issuer = TokenIssuer::new(&test_settings());
        let now = Utc::now();

        let first = issuer.issue_access_token(&alice(), now).unwrap();
        let second = issuer.issue_access_token(&alice(), now).unwrap();

        assert_ne!(first.token, second.token);
    }
}
