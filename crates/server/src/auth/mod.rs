//! Credential handling
//!
//! Passwords are hashed with bcrypt before they reach the database. Nothing
//! in this module logs a plaintext password.

pub mod password;

pub use password::{hash_password, verify_password, MAX_COST, MIN_COST};
