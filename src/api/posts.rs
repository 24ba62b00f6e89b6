use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::{AppError, Result},
    models::{Post, PostSummary},
    AppState,
};

/// List all posts, newest first, without their bodies
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<PostSummary>>> {
    let posts = state.db.list_posts().await.map_err(AppError::FetchPosts)?;
    Ok(Json(posts))
}

/// Get a single post by slug
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Post>> {
    state
        .db
        .get_post_by_slug(&slug)
        .await
        .map_err(AppError::FetchPost)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
}
