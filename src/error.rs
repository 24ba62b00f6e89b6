use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors surfaced at the HTTP boundary.
///
/// Each variant maps to a fixed response body. Database errors are logged
/// in full here and never reach the client.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Failed to fetch posts: {0}")]
    FetchPosts(#[source] sqlx::Error),

    #[error("Failed to fetch post: {0}")]
    FetchPost(#[source] sqlx::Error),

    #[error("Failed to initialize database: {0}")]
    InitDatabase(#[source] sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::Unauthorized(reason) => {
                tracing::warn!("Rejected init request: {}", reason);
                (
                    StatusCode::UNAUTHORIZED,
                    json!({ "success": false, "error": "Unauthorized" }),
                )
            }
            AppError::FetchPosts(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Failed to fetch posts" }),
                )
            }
            AppError::FetchPost(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Failed to fetch post" }),
                )
            }
            AppError::InitDatabase(e) => {
                tracing::error!("Database initialization error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "error": "Failed to initialize database" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_database_errors_do_not_leak() {
        let response = AppError::FetchPosts(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "error": "Failed to fetch posts" }));

        let response = AppError::InitDatabase(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "success": false, "error": "Failed to initialize database" })
        );
    }

    #[tokio::test]
    async fn test_unauthorized_hides_reason() {
        let response = AppError::Unauthorized("token mismatch".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({ "success": false, "error": "Unauthorized" })
        );
    }
}
