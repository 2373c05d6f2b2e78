/// Token lifecycle engine
///
/// Claims codec, issuance with expiry policy, and stateless verification.

mod claims;
mod codec;
mod issuer;
mod verifier;

pub use claims::{Claims, TokenKind};
pub use codec::{decode, encode};
pub use issuer::{IssuedToken, TokenIssuer};
pub use verifier::{TokenVerifier, VerifiedIdentity};
