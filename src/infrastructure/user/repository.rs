//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserChanges, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug)]
struct Entry {
    /// Insertion sequence, used to keep list order stable
    seq: u64,
    user: User,
}

/// Both maps live behind one lock so uniqueness checks and writes are atomic
#[derive(Debug, Default)]
struct UserTable {
    next_seq: u64,
    users: HashMap<String, Entry>,
    /// Index for email -> user ID lookup
    email_index: HashMap<String, String>,
}

/// In-memory implementation of UserRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let table = self.table.read().await;

        let mut entries: Vec<&Entry> = table.users.values().collect();
        entries.sort_by_key(|e| e.seq);

        Ok(entries.into_iter().map(|e| e.user.clone()).collect())
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.users.get(id.as_str()).map(|e| e.user.clone()))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .email_index
            .get(email)
            .and_then(|id| table.users.get(id))
            .map(|e| e.user.clone()))
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut table = self.table.write().await;

        let id = user.id().as_str().to_string();
        let email = user.email().to_string();

        if table.users.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                id
            )));
        }

        if table.email_index.contains_key(&email) {
            return Err(DomainError::conflict(format!(
                "User with email '{}' already exists",
                email
            )));
        }

        let seq = table.next_seq;
        table.next_seq += 1;
        table.email_index.insert(email, id.clone());
        table.users.insert(
            id,
            Entry {
                seq,
                user: user.clone(),
            },
        );

        Ok(user)
    }

    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User, DomainError> {
        let mut table = self.table.write().await;
        let table = &mut *table;

        let id = id.as_str();
        let UserChanges { name, email } = changes;

        // Email owned by anyone other than this user is a conflict
        if let Some(owner) = table.email_index.get(&email) {
            if owner != id {
                return Err(DomainError::conflict(format!(
                    "User with email '{}' already exists",
                    email
                )));
            }
        }

        let entry = table
            .users
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        if entry.user.email() != email {
            table.email_index.remove(entry.user.email());
            table.email_index.insert(email.clone(), id.to_string());
        }

        if let Some(name) = name {
            entry.user.set_name(name);
        }
        entry.user.set_email(email);

        Ok(entry.user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let mut table = self.table.write().await;

        let removed = table.users.remove(id.as_str()).map(|e| e.user);

        if let Some(user) = &removed {
            table.email_index.remove(user.email());
        }

        Ok(removed)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let table = self.table.read().await;
        Ok(table.users.len())
    }
}
