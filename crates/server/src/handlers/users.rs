//! User handlers

use axum::extract::{Path, State};
use tracing::info;

use crate::auth::hash_password;
use crate::core::validate::{parse_id, Payload, Rules};
use crate::core::{ApiResponse, AppState, Result};
use crate::models::{NewUser, User};

/// Target of `PUT /update`.
pub const DEFAULT_UPDATE_ID: i64 = 1;
/// Target of `DELETE /delete`.
pub const DEFAULT_DELETE_ID: i64 = 2;
pub const DEFAULT_USERNAME: &str = "pcodetest";
pub const DEFAULT_PASSWORD: &str = "123";

fn signup_rules() -> Rules {
    Rules::new()
        .require_string("username", "Username is required")
        .require_string("password", "Password is required")
}

/// POST /user
pub async fn create_user(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<ApiResponse<User>> {
    info!("POST /user");
    signup_rules().validate(payload.value())?;

    let username = payload.string_or("username", "")?;
    let password = payload.string_or("password", "")?;
    let password_hash = hash_password(&password, state.config.bcrypt_cost).await?;

    let user = state
        .db
        .create_user(NewUser {
            username,
            password_hash,
        })
        .await?;
    info!("User {} created", user.id);
    Ok(ApiResponse::ok(user))
}

/// GET /get-user
pub async fn list_users(State(state): State<AppState>) -> Result<ApiResponse<Vec<User>>> {
    info!("GET /get-user");
    let users = state.db.list_users().await?;
    Ok(ApiResponse::ok(users))
}

/// PUT /update
pub async fn update_default_user(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<ApiResponse<User>> {
    info!("PUT /update");
    update(&state, DEFAULT_UPDATE_ID, &payload).await
}

/// PUT /user/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Payload,
) -> Result<ApiResponse<User>> {
    info!("PUT /user/{}", id);
    let id = parse_id("id", &id)?;
    update(&state, id, &payload).await
}

async fn update(state: &AppState, id: i64, payload: &Payload) -> Result<ApiResponse<User>> {
    let username = payload.string_or("username", DEFAULT_USERNAME)?;
    let password = payload.string_or("password", DEFAULT_PASSWORD)?;
    // Same hashing as signup; no write path stores plaintext.
    let password_hash = hash_password(&password, state.config.bcrypt_cost).await?;

    let user = state.db.update_user(id, &username, &password_hash).await?;
    info!("User {} updated", user.id);
    Ok(ApiResponse::ok(user))
}

/// DELETE /delete
pub async fn delete_default_user(State(state): State<AppState>) -> Result<ApiResponse<User>> {
    info!("DELETE /delete");
    let user = state.db.delete_user(DEFAULT_DELETE_ID).await?;
    Ok(ApiResponse::ok(user))
}

/// DELETE /user/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<User>> {
    info!("DELETE /user/{}", id);
    let id = parse_id("id", &id)?;
    let user = state.db.delete_user(id).await?;
    Ok(ApiResponse::ok(user))
}
