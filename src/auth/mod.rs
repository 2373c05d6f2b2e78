/// Authentication module
///
/// Session orchestration (signup, login, refresh exchange), password
/// handling, and the per-request security context.

mod context;
mod password;
mod service;

pub use context::{GateRejection, SecurityContext};
pub use password::{hash_password, verify_password, BcryptCredentials, CredentialVerifier};
pub use service::{SessionService, TokenGrant};
