/// In-memory directory adapter
///
/// Backs the integration tests and local development; the map is the single
/// logical store, and the write lock is held across the compare-and-swap so
/// concurrent rotations on one member serialize.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::directory::{Identity, IdentityDirectory};
use crate::error::DirectoryError;

#[derive(Default)]
pub struct InMemoryDirectory {
    members: RwLock<HashMap<String, Identity>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryDirectory {
    async fn create(&self, identity: Identity) -> Result<(), DirectoryError> {
        let mut members = self.members.write().unwrap();
        if members.contains_key(&identity.username) {
            return Err(DirectoryError::Duplicate(
                "username already registered".to_string(),
            ));
        }
        members.insert(identity.username.clone(), identity);
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, DirectoryError> {
        let members = self.members.read().unwrap();
        Ok(members.get(username).cloned())
    }

    async fn find_by_username_and_refresh_token(
        &self,
        username: &str,
        refresh_token: &str,
    ) -> Result<Option<Identity>, DirectoryError> {
        let members = self.members.read().unwrap();
        Ok(members
            .get(username)
            .filter(|m| m.refresh_token.as_deref() == Some(refresh_token))
            .cloned())
    }

    async fn save_refresh_token(
        &self,
        username: &str,
        refresh_token: &str,
    ) -> Result<(), DirectoryError> {
        let mut members = self.members.write().unwrap();
        match members.get_mut(username) {
            Some(member) => {
                member.refresh_token = Some(refresh_token.to_string());
                Ok(())
            }
            None => Err(DirectoryError::Backend(format!(
                "no such member: {}",
                username
            ))),
        }
    }

    async fn swap_refresh_token(
        &self,
        username: &str,
        current: &str,
        new_token: &str,
    ) -> Result<bool, DirectoryError> {
        let mut members = self.members.write().unwrap();
        match members.get_mut(username) {
            Some(member) if member.refresh_token.as_deref() == Some(current) => {
                member.refresh_token = Some(new_token.to_string());
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Ok(false),
        }
    }
}
