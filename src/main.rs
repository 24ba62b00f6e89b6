use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pgblog::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pgblog=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // A missing connection string stops the process here, before any listener exists
    let config = Config::from_env()?;

    pgblog::run(config).await
}
