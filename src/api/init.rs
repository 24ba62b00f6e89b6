use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{
    auth::InitAccess,
    error::{AppError, Result},
    AppState,
};

/// Create the posts table and seed it if empty
pub async fn init_db(State(state): State<AppState>, _access: InitAccess) -> Result<Json<Value>> {
    let report = state.db.init_schema().await.map_err(AppError::InitDatabase)?;
    tracing::info!(
        "Init requested: {} existing posts, seeded: {}",
        report.existing_posts,
        report.seeded
    );

    Ok(Json(json!({
        "success": true,
        "message": "Database initialized successfully"
    })))
}
