/// Claims codec
///
/// Pure encode/decode pair over the compact JWS representation. `decode`
/// judges structure only — wrong segment count, undecodable payload — and
/// leaves signature, expiry, and type checks to the verifier.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::error::{AppError, TokenError};
use crate::token::claims::Claims;

pub fn encode(claims: &Claims, key: &EncodingKey) -> Result<String, AppError> {
    jsonwebtoken::encode(&Header::default(), claims, key)
        .map_err(|e| AppError::Internal(format!("token encoding failed: {}", e)))
}

pub fn decode(token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    // The key is unused with signature validation disabled
    jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|_| TokenError::Malformed)
}
