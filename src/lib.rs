pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::db::Database;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
}

/// Run the server
pub async fn run(config: Config) -> Result<()> {
    let db = Database::connect(&config.database)
        .with_context(|| format!("invalid connection string in {}", config.database.url_source))?;

    tracing::info!(
        "Database pool: max={}, min={} connections (url from {}, environment {:?})",
        config.database.max_connections,
        config.database.min_connections,
        config.database.url_source,
        config.environment
    );

    // Initialize before accepting traffic so the first request never races
    // table creation
    if config.init_on_startup.should_run(config.environment) {
        tracing::info!("Initializing database on startup...");
        match db.init_schema().await {
            Ok(_) => tracing::info!("Database ready!"),
            Err(e) => tracing::error!("Failed to initialize database: {:?}", e),
        }
    } else {
        tracing::info!(
            "Skipping startup initialization ({:?} in {:?})",
            config.init_on_startup,
            config.environment
        );
    }

    if config.security.init_token.is_none() {
        tracing::warn!("INIT_DB_TOKEN not set - /api/init-db is open to anyone");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid HOST/PORT")?;

    let state = AppState {
        db,
        config: Arc::new(config),
    };
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("pgblog listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Build the application router with all middleware
pub fn app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.security.cors_origins);

    Router::new()
        // Health check (no DB access)
        .route("/health", get(health_check))
        // Ready check (includes DB connectivity)
        .route("/ready", get(ready_check))
        .nest("/api", api::router())
        .fallback(not_found)
        // Middleware layers (order matters - applied bottom to top)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// Readiness check - verifies database connectivity
async fn ready_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<&'static str, (StatusCode, &'static str)> {
    match state.db.ping().await {
        Ok(()) => Ok("ready"),
        Err(e) => {
            tracing::warn!("Readiness check failed: {}", e);
            Err((StatusCode::SERVICE_UNAVAILABLE, "database unavailable"))
        }
    }
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

/// Build CORS layer from configuration
fn build_cors_layer(origins: &str) -> CorsLayer {
    if origins == "*" {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;

        let origins: Vec<_> = origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
