//! User domain
//!
//! Domain types and traits for the user directory: the user entity,
//! field validation, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId};
pub use repository::{UserChanges, UserRepository};
pub use validation::{
    normalize_email, validate_email, validate_name, validate_user_id, UserValidationError,
    MIN_NAME_LENGTH,
};

#[cfg(test)]
pub use repository::MockUserRepository;
