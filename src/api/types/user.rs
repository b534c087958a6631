//! Request and response bodies for the `/users` endpoints

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::user::{normalize_email, validate_email, validate_name, UserValidationError};
use crate::domain::User;
use crate::infrastructure::user::{CreateUserRequest, UpdateEmailRequest, UpdateUserRequest};

/// Body of `POST /users` and `PUT /users/{id}`
///
/// Fields are optional so a missing field is reported as a validation
/// issue rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserApiRequest {
    #[validate(
        required(message = "Name is required"),
        custom(function = "name_rule")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Email is required"),
        custom(function = "email_rule")
    )]
    pub email: Option<String>,
}

impl UserApiRequest {
    /// Trim and lower-case the email before validation
    pub fn normalized(mut self) -> Self {
        self.email = self.email.as_deref().map(normalize_email);
        self
    }

    fn into_parts(self) -> (String, String) {
        (
            self.name.unwrap_or_default(),
            self.email.unwrap_or_default(),
        )
    }
}

impl From<UserApiRequest> for CreateUserRequest {
    fn from(request: UserApiRequest) -> Self {
        let (name, email) = request.into_parts();
        Self { name, email }
    }
}

impl From<UserApiRequest> for UpdateUserRequest {
    fn from(request: UserApiRequest) -> Self {
        let (name, email) = request.into_parts();
        Self { name, email }
    }
}

/// Body of `PATCH /users/{id}`; only the email can change
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PatchUserApiRequest {
    #[validate(
        required(message = "Email is required"),
        custom(function = "email_rule")
    )]
    pub email: Option<String>,
}

impl PatchUserApiRequest {
    /// Trim and lower-case the email before validation
    pub fn normalized(mut self) -> Self {
        self.email = self.email.as_deref().map(normalize_email);
        self
    }
}

impl From<PatchUserApiRequest> for UpdateEmailRequest {
    fn from(request: PatchUserApiRequest) -> Self {
        Self {
            email: request.email.unwrap_or_default(),
        }
    }
}

/// Domain name rule, reported with the `length` code
fn name_rule(name: &str) -> Result<(), ValidationError> {
    validate_name(name).map_err(|e| rule_violation("length", e))
}

/// Domain email rule, reported with the `email` code
fn email_rule(email: &str) -> Result<(), ValidationError> {
    validate_email(email).map_err(|e| rule_violation("email", e))
}

fn rule_violation(code: &'static str, error: UserValidationError) -> ValidationError {
    ValidationError::new(code).with_message(error.to_string().into())
}

/// User as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().as_str().to_string(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            created_at: user.created_at().to_rfc3339(),
            updated_at: user.updated_at().to_rfc3339(),
        }
    }
}
