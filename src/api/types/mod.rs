//! API request, response and error types

pub mod error;
pub mod json;
pub mod user;

pub use error::{ApiError, ApiErrorResponse, ValidationIssue};
pub use json::Json;
pub use user::{PatchUserApiRequest, UserApiRequest, UserResponse};
