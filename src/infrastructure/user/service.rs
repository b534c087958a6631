//! User service for user management

use std::sync::Arc;

use tracing::info;

use crate::domain::user::{
    normalize_email, validate_email, validate_name, User, UserChanges, UserId, UserRepository,
};
use crate::domain::DomainError;

/// Request for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

/// Request for replacing a user's name and email
#[derive(Debug, Clone)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
}

/// Request for changing only a user's email
#[derive(Debug, Clone)]
pub struct UpdateEmailRequest {
    pub email: String,
}

/// User service: validates input, enforces email uniqueness, mutates the store
#[derive(Debug)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new user service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create a new user with a generated ID
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        let email = normalize_email(&request.email);

        validate_name(&request.name).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_email(&email).map_err(|e| DomainError::validation(e.to_string()))?;

        if self.repository.email_exists(&email).await? {
            return Err(email_conflict(&email));
        }

        let user = self
            .repository
            .create(User::new(UserId::generate(), request.name, email))
            .await?;
        info!(id = %user.id(), "Created user");

        Ok(user)
    }

    /// Get a user by ID
    pub async fn get(&self, id: &str) -> Result<User, DomainError> {
        let user_id = parse_user_id(id)?;

        self.repository
            .get(&user_id)
            .await?
            .ok_or_else(|| user_not_found(id))
    }

    /// List all users
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repository.list().await
    }

    /// Count users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    /// Replace a user's name and email
    pub async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<User, DomainError> {
        let email = normalize_email(&request.email);

        validate_name(&request.name).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_email(&email).map_err(|e| DomainError::validation(e.to_string()))?;

        let user_id = parse_user_id(id)?;
        info!(id = %user_id, "Updating user");

        let changes = UserChanges {
            name: Some(request.name),
            email,
        };
        self.repository.update(&user_id, changes).await
    }

    /// Change only a user's email
    pub async fn update_email(
        &self,
        id: &str,
        request: UpdateEmailRequest,
    ) -> Result<User, DomainError> {
        let email = normalize_email(&request.email);

        validate_email(&email).map_err(|e| DomainError::validation(e.to_string()))?;

        let user_id = parse_user_id(id)?;
        info!(id = %user_id, "Updating user email");

        let changes = UserChanges { name: None, email };
        self.repository.update(&user_id, changes).await
    }

    /// Delete a user, returning the removed record
    pub async fn delete(&self, id: &str) -> Result<User, DomainError> {
        let user_id = parse_user_id(id)?;
        info!(id = %user_id, "Deleting user");

        self.repository
            .delete(&user_id)
            .await?
            .ok_or_else(|| user_not_found(id))
    }
}

fn parse_user_id(id: &str) -> Result<UserId, DomainError> {
    UserId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))
}

fn user_not_found(id: &str) -> DomainError {
    DomainError::not_found(format!("User '{}' not found", id))
}

fn email_conflict(email: &str) -> DomainError {
    DomainError::conflict(format!("User with email '{}' already exists", email))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::MockUserRepository;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn create_service() -> UserService<InMemoryUserRepository> {
        UserService::new(Arc::new(InMemoryUserRepository::new()))
    }

    fn create_request(name: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_email() {
        let service = create_service();

        let user = service
            .create(create_request("Alice Smith", "  ALICE@Example.com "))
            .await
            .unwrap();

        assert_eq!(user.email(), "alice@example.com");

        let fetched = service.get(user.id().as_str()).await.unwrap();
        assert_eq!(fetched.email(), "alice@example.com");
        assert_eq!(fetched.id(), user.id());
    }

    #[tokio::test]
    async fn test_create_duplicate_normalized_email() {
        let service = create_service();

        service
            .create(create_request("John Doe", "john@x.com"))
            .await
            .unwrap();
        let result = service.create(create_request("John Other", "JOHN@x.com")).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_short_name() {
        let service = create_service();

        let result = service.create(create_request("Alice", "alice@x.com")).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        let result = service.create(create_request("Alices", "alice@x.com")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_email() {
        let service = create_service();

        let result = service.create(create_request("John Doe", "nope")).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_blank_id_is_invalid() {
        let service = create_service();

        assert!(matches!(
            service.get(" ").await,
            Err(DomainError::InvalidId { .. })
        ));
        assert!(matches!(
            service.delete("").await,
            Err(DomainError::InvalidId { .. })
        ));
        assert!(matches!(
            service
                .update_email(
                    "",
                    UpdateEmailRequest {
                        email: "a@x.com".to_string()
                    }
                )
                .await,
            Err(DomainError::InvalidId { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_replaces_name_and_email() {
        let service = create_service();
        let user = service
            .create(create_request("John Doe", "john@x.com"))
            .await
            .unwrap();

        let updated = service
            .update(
                user.id().as_str(),
                UpdateUserRequest {
                    name: "Jonathan Doe".to_string(),
                    email: "Jonathan@X.com".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id(), user.id());
        assert_eq!(updated.name(), "Jonathan Doe");
        assert_eq!(updated.email(), "jonathan@x.com");
    }

    #[tokio::test]
    async fn test_update_with_own_email_succeeds() {
        let service = create_service();
        let user = service
            .create(create_request("John Doe", "john@x.com"))
            .await
            .unwrap();

        let updated = service
            .update(
                user.id().as_str(),
                UpdateUserRequest {
                    name: "Johnny Doe".to_string(),
                    email: "john@x.com".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name(), "Johnny Doe");

        let patched = service
            .update_email(
                user.id().as_str(),
                UpdateEmailRequest {
                    email: "john@x.com".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(patched.email(), "john@x.com");
    }

    #[tokio::test]
    async fn test_update_email_taken_by_other_user() {
        let service = create_service();
        service
            .create(create_request("Alice Smith", "alice@x.com"))
            .await
            .unwrap();
        let bob = service
            .create(create_request("Bob Brown", "bob@x.com"))
            .await
            .unwrap();

        let result = service
            .update_email(
                bob.id().as_str(),
                UpdateEmailRequest {
                    email: "alice@x.com".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_missing_user_creates_nothing() {
        let service = create_service();

        let result = service
            .update(
                "missing",
                UpdateUserRequest {
                    name: "Nobody Here".to_string(),
                    email: "nobody@x.com".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));

        let result = service
            .update_email(
                "missing",
                UpdateEmailRequest {
                    email: "nobody@x.com".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));

        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_returns_removed_user() {
        let service = create_service();
        let user = service
            .create(create_request("John Doe", "john@x.com"))
            .await
            .unwrap();

        let removed = service.delete(user.id().as_str()).await.unwrap();
        assert_eq!(removed.id(), user.id());

        assert!(matches!(
            service.get(user.id().as_str()).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            service.delete(user.id().as_str()).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_surfaces_repository_conflict() {
        // Another writer inserted the email between the check and the insert
        let mut repo = MockUserRepository::new();
        repo.expect_email_exists().returning(|_| Ok(false));
        repo.expect_create()
            .returning(|user| Err(email_conflict(user.email())));

        let service = UserService::new(Arc::new(repo));
        let result = service.create(create_request("John Doe", "john@x.com")).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_create_skips_insert_when_email_taken() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_exists()
            .withf(|email: &str| email == "john@x.com")
            .returning(|_| Ok(true));
        repo.expect_create().never();

        let service = UserService::new(Arc::new(repo));
        let result = service.create(create_request("John Doe", "John@X.com")).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_repository_failure_propagates() {
        let mut repo = MockUserRepository::new();
        repo.expect_list()
            .returning(|| Err(DomainError::internal("store unavailable")));

        let service = UserService::new(Arc::new(repo));

        assert!(matches!(
            service.list().await,
            Err(DomainError::Internal { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_email_sends_email_only_changes() {
        let mut repo = MockUserRepository::new();
        repo.expect_get().never();
        repo.expect_update()
            .withf(|id: &UserId, changes: &UserChanges| {
                id.as_str() == "user-1"
                    && changes.name.is_none()
                    && changes.email == "john2@x.com"
            })
            .times(1)
            .returning(|id, changes| Ok(User::new(id.clone(), "John Doe", changes.email)));

        let service = UserService::new(Arc::new(repo));
        let updated = service
            .update_email(
                "user-1",
                UpdateEmailRequest {
                    email: " John2@X.com".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.email(), "john2@x.com");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_put_and_patch_keep_both_changes() {
        let service = Arc::new(create_service());
        let user = service
            .create(create_request("John Doe", "john@x.com"))
            .await
            .unwrap();
        let id = user.id().as_str().to_string();

        for round in 0..25 {
            let patched_email = format!("john{round}@x.com");
            let current_email = service.get(&id).await.unwrap().email().to_string();

            let put = {
                let service = Arc::clone(&service);
                let id = id.clone();
                let request = UpdateUserRequest {
                    name: format!("Renamed Person {round}"),
                    email: current_email.clone(),
                };
                tokio::spawn(async move { service.update(&id, request).await })
            };
            let patch = {
                let service = Arc::clone(&service);
                let id = id.clone();
                let request = UpdateEmailRequest {
                    email: patched_email.clone(),
                };
                tokio::spawn(async move { service.update_email(&id, request).await })
            };

            let put = put.await.unwrap().unwrap();
            let patch = patch.await.unwrap().unwrap();

            // Neither write may undo the other's field
            let stored = service.get(&id).await.unwrap();
            assert_eq!(stored.name(), format!("Renamed Person {round}"));
            assert_eq!(put.name(), format!("Renamed Person {round}"));
            assert!(stored.email() == patched_email || stored.email() == current_email);

            // PATCH returns the record after its own write
            assert_eq!(patch.email(), patched_email);
            if stored.email() == patched_email {
                assert_eq!(patch.name(), format!("Renamed Person {round}"));
            }
        }
    }
}
