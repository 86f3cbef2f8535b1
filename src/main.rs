use anyhow::Result;
use teamspace_core::{config::Config, server};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teamspace_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Teamspace Core Service");

    // Apply pending migrations when requested
    if std::env::var("RUN_MIGRATIONS")
        .map(|s| s.to_lowercase() == "true")
        .unwrap_or(false)
    {
        teamspace_core::migration::run_migrations(&config).await?;
    }

    info!("HTTP server listening on {}", config.http_addr());

    // Run the server
    server::run(config).await
}
