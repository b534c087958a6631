//! Infrastructure layer - Storage implementations and runtime plumbing

pub mod logging;
pub mod user;
