/// Session service
///
/// Orchestrates signup, login, and the refresh-token exchange over the
/// directory and credential capabilities. Rotation keeps exactly one live
/// refresh token per member: the stored token is replaced with a
/// conditional update, and an exchange that loses that race is rejected the
/// same way as a stale token.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::auth::password::{hash_password, CredentialVerifier};
use crate::configuration::TokenSettings;
use crate::directory::{Identity, IdentityDirectory, Role};
use crate::error::{AppError, AuthError};
use crate::token::{IssuedToken, TokenIssuer, TokenKind, TokenVerifier};
use crate::validators::{is_valid_name, is_valid_username};

/// Access/refresh pair returned by login and the refresh exchange
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

pub struct SessionService {
    directory: Arc<dyn IdentityDirectory>,
    credentials: Arc<dyn CredentialVerifier>,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    refresh_grant_type: String,
}

impl SessionService {
    pub fn new(
        directory: Arc<dyn IdentityDirectory>,
        credentials: Arc<dyn CredentialVerifier>,
        settings: &TokenSettings,
    ) -> Self {
        Self {
            directory,
            credentials,
            issuer: TokenIssuer::new(settings),
            verifier: TokenVerifier::new(settings),
            refresh_grant_type: settings.refresh_grant_type.clone(),
        }
    }

    /// Register a new member. Every member starts with the full role set.
    pub async fn sign_up(&self, username: &str, name: &str, password: &str) -> Result<(), AppError> {
        let username = is_valid_username(username)?;
        let name = is_valid_name(name)?;
        let password_hash = hash_password(password)?;

        let identity = Identity {
            username,
            name,
            password_hash,
            roles: vec![Role::User, Role::Admin],
            refresh_token: None,
        };

        let username = identity.username.clone();
        self.directory.create(identity).await?;

        tracing::info!(username = %username, "Member registered");
        Ok(())
    }

    /// Authenticate with username/password and issue a fresh token pair.
    ///
    /// Unknown username and wrong password are indistinguishable to the
    /// caller. The directory is only mutated after the credential check
    /// passes.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenGrant, AppError> {
        let identity = self
            .directory
            .find_by_username(username)
            .await?
            .ok_or(AuthError::BadCredentials)?;

        if !self.credentials.verify(password, &identity.password_hash)? {
            return Err(AuthError::BadCredentials.into());
        }

        let access = self.issuer.issue_access_token(&identity, now)?;
        let refresh = self.issuer.issue_refresh_token(&identity, now)?;

        self.directory
            .save_refresh_token(&identity.username, &refresh.token)
            .await?;

        tracing::info!(username = %identity.username, "Member logged in");
        Ok(TokenGrant { access, refresh })
    }

    /// Exchange a valid refresh token for a new pair, rotating the stored
    /// token.
    pub async fn exchange(
        &self,
        grant_type: &str,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenGrant, AppError> {
        // Cheap input check before any directory access
        if grant_type != self.refresh_grant_type {
            return Err(AuthError::BadGrantType.into());
        }

        let verified = self
            .verifier
            .verify(refresh_token, TokenKind::Refresh, now)
            .map_err(|kind| {
                tracing::warn!(error = %kind, "Refresh token failed verification");
                AuthError::InvalidRefreshToken
            })?;

        // Cryptographically valid is not enough: the presented token must
        // also be the currently active one for this member
        let identity = self
            .directory
            .find_by_username_and_refresh_token(&verified.username, refresh_token)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        let access = self.issuer.issue_access_token(&identity, now)?;
        let refresh = self.issuer.issue_refresh_token(&identity, now)?;

        // Rotation. The swap is keyed on the presented token; if the stored
        // value moved since the lookup, this exchange lost the race and its
        // pair is never handed out. On a directory fault the old token
        // simply stays active.
        let swapped = self
            .directory
            .swap_refresh_token(&identity.username, refresh_token, &refresh.token)
            .await?;

        if !swapped {
            return Err(AuthError::InvalidRefreshToken.into());
        }

        tracing::info!(username = %identity.username, "Refresh token rotated");
        Ok(TokenGrant { access, refresh })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::BcryptCredentials;
    use crate::directory::InMemoryDirectory;

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

    fn service() -> (SessionService, Arc<InMemoryDirectory>) {
        let directory = Arc::new(InMemoryDirectory::new());
        let service = SessionService::new(
            directory.clone(),
            Arc::new(BcryptCredentials),
            &test_settings(),
        );
        (service, directory)
    }

    #[tokio::test]
    async fn login_issues_a_pair_and_persists_the_refresh_token() {
        let (service, directory) = service();
        service.sign_up("alice", "Alice", "SecurePass123").await.unwrap();

        let grant = service.login("alice", "SecurePass123", Utc::now()).await.unwrap();

        let stored = directory.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(stored.refresh_token.as_deref(), Some(grant.refresh.token.as_str()));
        assert_ne!(grant.access.token, grant.refresh.token);
    }

    #[tokio::test]
    async fn wrong_password_fails_without_touching_the_stored_token() {
        let (service, directory) = service();
        service.sign_up("alice", "Alice", "SecurePass123").await.unwrap();

        let result = service.login("alice", "WrongPass123", Utc::now()).await;
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::BadCredentials))
        ));

        let stored = directory.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(stored.refresh_token, None);
    }

    #[tokio::test]
    async fn unknown_username_reads_as_bad_credentials() {
        let (service, _) = service();

        let result = service.login("nobody", "SecurePass123", Utc::now()).await;
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::BadCredentials))
        ));
    }

    #[tokio::test]
    async fn exchange_rotates_and_rejects_the_superseded_token() {
        let (service, directory) = service();
        service.sign_up("alice", "Alice", "SecurePass123").await.unwrap();

        let now = Utc::now();
        let grant = service.login("alice", "SecurePass123", now).await.unwrap();

        let rotated = service
            .exchange("refreshToken", &grant.refresh.token, now)
            .await
            .unwrap();
        assert_ne!(rotated.refresh.token, grant.refresh.token);

        let stored = directory.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(
            stored.refresh_token.as_deref(),
            Some(rotated.refresh.token.as_str())
        );

        // Replaying the superseded token fails even though its signature is
        // still valid
        let replay = service
            .exchange("refreshToken", &grant.refresh.token, now)
            .await;
        assert!(matches!(
            replay,
            Err(AppError::Auth(AuthError::InvalidRefreshToken))
        ));
    }

    #[tokio::test]
    async fn exchange_rejects_a_wrong_grant_type_before_verification() {
        let (service, _) = service();

        let result = service
            .exchange("password", "whatever-token", Utc::now())
            .await;
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::BadGrantType))
        ));
    }

    #[tokio::test]
    async fn exchange_rejects_an_access_token() {
        let (service, _) = service();
        service.sign_up("alice", "Alice", "SecurePass123").await.unwrap();

        let now = Utc::now();
        let grant = service.login("alice", "SecurePass123", now).await.unwrap();

        let result = service
            .exchange("refreshToken", &grant.access.token, now)
            .await;
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::InvalidRefreshToken))
        ));
    }

    #[tokio::test]
    async fn concurrent_exchanges_yield_exactly_one_winner() {
        let (service, directory) = service();
        service.sign_up("alice", "Alice", "SecurePass123").await.unwrap();

        let now = Utc::now();
        let grant = service.login("alice", "SecurePass123", now).await.unwrap();

        let service = Arc::new(service);
        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = service.clone();
            let token = grant.refresh.token.clone();
            handles.push(tokio::spawn(async move {
                service.exchange("refreshToken", &token, Utc::now()).await
            }));
        }

        let mut winners = Vec::new();
        let mut losses = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(grant) => winners.push(grant),
                Err(AppError::Auth(AuthError::InvalidRefreshToken)) => losses += 1,
                Err(other) => panic!("unexpected failure: {}", other),
            }
        }

        assert_eq!(winners.len(), 1);
        assert_eq!(losses, 7);

        // The stored token is the winner's, not some silently dropped write
        let stored = directory.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(
            stored.refresh_token.as_deref(),
            Some(winners[0].refresh.token.as_str())
        );
    }
}
