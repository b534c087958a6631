//! User repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{User, UserId};
use crate::domain::DomainError;

/// Field changes applied to a stored user in one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserChanges {
    /// New name, or `None` to keep the stored one
    pub name: Option<String>,
    /// New (already normalized) email
    pub email: String,
}

/// Repository trait for user storage
///
/// Implementations enforce id and email uniqueness atomically: the
/// uniqueness check and the write of `create` and `update` must not be
/// observable as separate steps by concurrent callers.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List all users in insertion order
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Get a user by their ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get the user owning an email address (exact match)
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Insert a new user, failing with `Conflict` on a duplicate id or email
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Apply `changes` to the stored user and return the new record
    ///
    /// Fails with `Conflict` when the email belongs to a different user and
    /// with `NotFound` when no user has this id. Both checks and the write
    /// happen against the same snapshot of the store.
    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User, DomainError>;

    /// Remove a user, returning the removed record
    async fn delete(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Count users
    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if an email address is taken
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}
