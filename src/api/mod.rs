mod init;
mod posts;

use axum::{routing::get, Router};

use crate::AppState;

/// Build the API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts.json", get(posts::list_posts))
        .route("/posts/{slug}", get(posts::get_post))
        .route("/init-db", get(init::init_db))
}
