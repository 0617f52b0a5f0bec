//! Core Router

use crate::core::AppState;
use crate::handlers;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        // Users
        .route("/user", post(handlers::create_user))
        .route(
            "/user/{id}",
            put(handlers::update_user).delete(handlers::delete_user),
        )
        .route("/update", put(handlers::update_default_user))
        .route("/delete", delete(handlers::delete_default_user))
        .route("/get-user", get(handlers::list_users))
        // Profiles
        .route("/profile", post(handlers::create_profile))
        .route("/profile/{id}", get(handlers::get_profile))
        .route("/get-profile", get(handlers::get_default_profile))
        // Categories and posts
        .route("/category", post(handlers::create_category))
        .route("/insert-post", post(handlers::insert_post))
        .route("/post/{id}", get(handlers::get_post))
        // Health check
        .route("/health", get(health_check))
}

async fn health_check() -> &'static str {
    "OK"
}
