//! Core Service Layer
//!
//! Shared infrastructure for the Pojok server: configuration, the error
//! responder, the response envelope, request validation and routing.

pub mod config;
pub mod error;
pub mod response;
pub mod router;
pub mod validate;

// Re-exports for convenience
pub use config::{AppState, ServerConfig};
pub use error::{Error, Result};
pub use response::ApiResponse;
pub use router::router;
