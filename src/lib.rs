//! User Directory
//!
//! A small in-memory user management HTTP service:
//! - List, fetch, create, replace, patch and delete users
//! - Request validation with structured per-field issues
//! - Email uniqueness enforced atomically by the store

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use std::sync::Arc;

use tracing::info;

pub use api::AppState;
pub use config::AppConfig;

use infrastructure::user::{InMemoryUserRepository, UserService};

/// Create the application state backed by an empty in-memory store
pub fn create_app_state() -> AppState {
    let repository = Arc::new(InMemoryUserRepository::new());
    let user_service = Arc::new(UserService::new(repository));

    info!("User store initialized (in-memory)");

    AppState::new(user_service)
}
