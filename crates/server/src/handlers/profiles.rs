//! Profile handlers

use axum::extract::{Path, State};
use tracing::info;

use crate::core::validate::{parse_id, Payload};
use crate::core::{ApiResponse, AppState, Result};
use crate::models::{NewProfile, Profile};

pub const DEFAULT_EMAIL: &str = "pojok@gmail.com";
pub const DEFAULT_NAME: &str = "Pojok Code";
pub const DEFAULT_ADDRESS: &str = "jl. flamboyan no 44 Kembangan jakarta Barat";
pub const DEFAULT_PHONE: &str = "081234567890";
pub const DEFAULT_USER_ID: i64 = 1;
/// Profile read by `GET /get-profile`.
pub const DEFAULT_PROFILE_ID: i64 = 1;

/// POST /profile
///
/// Fields missing from the body fall back to the demo values.
pub async fn create_profile(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<ApiResponse<Profile>> {
    info!("POST /profile");
    let profile = NewProfile {
        email: payload.string_or("email", DEFAULT_EMAIL)?,
        name: payload.string_or("name", DEFAULT_NAME)?,
        address: payload.string_or("address", DEFAULT_ADDRESS)?,
        phone: payload.string_or("phone", DEFAULT_PHONE)?,
        user_id: payload.i64_or("userId", DEFAULT_USER_ID)?,
    };

    let profile = state.db.create_profile(profile).await?;
    Ok(ApiResponse::ok(profile))
}

/// GET /get-profile
pub async fn get_default_profile(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Profile>>> {
    info!("GET /get-profile");
    let rows = state.db.profile_rows(DEFAULT_PROFILE_ID).await?;
    Ok(ApiResponse::ok(rows))
}

/// GET /profile/{id}
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Vec<Profile>>> {
    info!("GET /profile/{}", id);
    let id = parse_id("id", &id)?;
    let rows = state.db.profile_rows(id).await?;
    Ok(ApiResponse::ok(rows))
}
