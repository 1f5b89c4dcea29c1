//! In-memory credential store (memory backend and tests)

use async_trait::async_trait;
use chrono::Utc;
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::Arc;
use uuid::Uuid;

use super::{CredentialStore, StoreError, StoreResult};
use crate::models::user::User;

/// Users keyed by username. The entry API makes check-then-insert atomic per key.
#[derive(Default, Clone)]
pub struct InMemoryCredentialStore {
    users: Arc<DashMap<String, User>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.users.get(username).map(|r| r.value().clone()))
    }

    async fn create(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        match self.users.entry(username.to_string()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(username.to_string())),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let user = User {
                    id: Uuid::new_v4(),
                    username: username.to_string(),
                    password_hash: password_hash.to_string(),
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    async fn touch_updated(&self, id: Uuid) -> StoreResult<()> {
        let mut entry = self
            .users
            .iter_mut()
            .find(|r| r.value().id == id)
            .ok_or(StoreError::NotFound)?;
        entry.value_mut().updated_at = Utc::now();
        Ok(())
    }
}
