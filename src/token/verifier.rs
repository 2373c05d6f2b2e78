/// Token verification
///
/// Stateless validation of an incoming token string: structure, expiry
/// against a caller-supplied clock, signature, then kind. Each failure is a
/// distinct `TokenError`; success yields the subject and role set from
/// claims alone, with no directory round-trip.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::configuration::TokenSettings;
use crate::directory::Role;
use crate::error::TokenError;
use crate::token::claims::{Claims, TokenKind};
use crate::token::codec;

/// Identity reconstructed from a verified token
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub username: String,
    pub roles: Vec<Role>,
}

#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(settings: &TokenSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&settings.issuer]);
        // Expiry is judged against the injected clock, not the library's
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
        }
    }

    /// Single-shot verification; `now` is injected so expiry decisions are
    /// deterministic under test.
    pub fn verify(
        &self,
        token: &str,
        expected: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<VerifiedIdentity, TokenError> {
        let claims = codec::decode(token)?;

        // Judged before the signature so the outcome does not depend on
        // signature validity
        if claims.is_expired(now.timestamp()) {
            return Err(TokenError::Expired);
        }

        let signed = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                // A wrong issuer claim is a token this service never signed
                ErrorKind::InvalidSignature | ErrorKind::InvalidIssuer => TokenError::BadSignature,
                _ => TokenError::Malformed,
            })?
            .claims;

        if signed.token_type != expected {
            return Err(TokenError::WrongType);
        }

        Ok(VerifiedIdentity {
            username: signed.sub,
            roles: signed.roles,
        })
    }
}
