//! Motor Fault Dashboard server binary

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use motor_fault_server::config::{Config, LogFormat};
use motor_fault_server::{create_router, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "motor_fault_server=debug,tower_http=debug".into());
    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }

    tracing::info!("Motor Fault Server starting...");

    if config.is_production() && config.uses_default_secret() {
        anyhow::bail!("JWT_SECRET must be set in production");
    }

    tracing::info!("Database: {}", config.database_url);
    tracing::info!(
        "Classifier: {} {} (timeout {:?})",
        config.classifier.program,
        config.classifier.args.join(" "),
        config.classifier.timeout
    );

    // Initialize database pool
    let pool = db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to create database pool")?;

    // Run migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&pool, &config.model_names)
        .await
        .context("Failed to run migrations")?;

    let port = config.port;
    let state = AppState::new(pool, config);
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
