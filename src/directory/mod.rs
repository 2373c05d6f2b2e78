/// Identity Directory
///
/// The system of record for members: identity, credential hash, role set,
/// and the single live refresh token. The service core only talks to the
/// `IdentityDirectory` capability; adapters live in submodules.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;

mod memory;
mod postgres;

pub use memory::InMemoryDirectory;
pub use postgres::PgDirectory;

/// Member roles, carried both in the directory record and in token claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "USER" => Some(Role::User),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// A member record
///
/// Immutable during a request; the only mutation after signup is replacing
/// `refresh_token`.
#[derive(Debug, Clone)]
pub struct Identity {
    pub username: String,
    pub name: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
    /// The one live refresh token, or `None` before the first login
    pub refresh_token: Option<String>,
}

/// Directory capability consumed by the session service
///
/// Lookups return `Ok(None)` for "no such record"; `DirectoryError` is
/// reserved for actual faults so callers can keep transient failures apart
/// from auth decisions.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn create(&self, identity: Identity) -> Result<(), DirectoryError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, DirectoryError>;

    /// Combined-key lookup: the presented refresh token must equal the one
    /// currently stored for that member.
    async fn find_by_username_and_refresh_token(
        &self,
        username: &str,
        refresh_token: &str,
    ) -> Result<Option<Identity>, DirectoryError>;

    /// Login-time overwrite; whatever token was stored before is discarded.
    async fn save_refresh_token(
        &self,
        username: &str,
        refresh_token: &str,
    ) -> Result<(), DirectoryError>;

    /// Rotation step: replace the stored token only if it still equals
    /// `current`. Returns `false` when it no longer does — the caller lost
    /// a concurrent rotation race and must not treat its pair as live.
    async fn swap_refresh_token(
        &self,
        username: &str,
        current: &str,
        new_token: &str,
    ) -> Result<bool, DirectoryError>;
}
