//! Category and post handlers

use axum::extract::{Path, State};
use tracing::info;

use crate::core::validate::{parse_id, Payload};
use crate::core::{ApiResponse, AppState, Result};
use crate::models::{Category, CategoryAssignment, NewPost, Post};

pub const DEFAULT_CATEGORY: &str = "Programming";
pub const DEFAULT_TITLE: &str = "Post Title";
pub const DEFAULT_CONTENT: &str = "Post Body";
pub const DEFAULT_PUBLISHED: bool = true;
pub const DEFAULT_AUTHOR_ID: i64 = 1;
pub const DEFAULT_CATEGORY_ID: i64 = 1;
pub const DEFAULT_ASSIGNED_BY: &str = "admin";

/// POST /category
pub async fn create_category(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<ApiResponse<Category>> {
    info!("POST /category");
    let name = payload.string_or("name", DEFAULT_CATEGORY)?;
    let category = state.db.create_category(&name).await?;
    Ok(ApiResponse::ok(category))
}

/// POST /insert-post
///
/// Creates the post and its category link atomically.
pub async fn insert_post(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<ApiResponse<Post>> {
    info!("POST /insert-post");
    let post = NewPost {
        title: payload.string_or("title", DEFAULT_TITLE)?,
        content: payload.string_or("content", DEFAULT_CONTENT)?,
        published: payload.bool_or("published", DEFAULT_PUBLISHED)?,
        author_id: payload.i64_or("authorId", DEFAULT_AUTHOR_ID)?,
    };
    let assignment = CategoryAssignment {
        category_id: payload.i64_or("categoryId", DEFAULT_CATEGORY_ID)?,
        assigned_by: payload.string_or("assignedBy", DEFAULT_ASSIGNED_BY)?,
    };

    let post = state.db.create_post_with_category(post, assignment).await?;
    info!("Post {} created", post.id);
    Ok(ApiResponse::ok(post))
}

/// GET /post/{id}
///
/// A missing post is `data: null`, not an error.
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Option<Post>>> {
    info!("GET /post/{}", id);
    let id = parse_id("id", &id)?;
    let post = state.db.find_post(id).await?;
    Ok(ApiResponse::ok(post))
}
