//! Route handlers
//!
//! Each handler performs one database call (or one transaction) and wraps
//! the result in [`crate::core::ApiResponse`].

pub mod posts;
pub mod profiles;
pub mod users;

pub use posts::{create_category, get_post, insert_post};
pub use profiles::{create_profile, get_default_profile, get_profile};
pub use users::{
    create_user, delete_default_user, delete_user, list_users, update_default_user, update_user,
};
