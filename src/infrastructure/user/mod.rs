//! User infrastructure module
//!
//! In-memory user repository and the user service that drives it.

mod repository;
mod service;

pub use repository::InMemoryUserRepository;
pub use service::{CreateUserRequest, UpdateEmailRequest, UpdateUserRequest, UserService};
