//! Motor Fault Dashboard Backend
//!
//! Ingests motor sensor samples, classifies them through an external
//! process, records the verdicts and relays them to dashboards live.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   MOTOR FAULT SERVER                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  POST /api/sensor-data                                       │
//! │        │                                                     │
//! │        ▼                                                     │
//! │  ┌───────────┐   ┌────────────┐   ┌──────────────────────┐   │
//! │  │ Classifier│──▶│ FaultStore │──▶│ Broadcaster (/ws)    │   │
//! │  │ (process) │   │ (SQLite)   │   │ motor-update events  │   │
//! │  └───────────┘   └────────────┘   └──────────┬───────────┘   │
//! │                                              ▼               │
//! │                                   client::SyncClient         │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod db;
pub mod models;
pub mod parts;
pub mod rules;
pub mod gateway;
pub mod store;
pub mod pipeline;
pub mod broadcast;
pub mod handlers;
pub mod middleware;
pub mod client;
pub mod error;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use sqlx::SqlitePool;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use error::{AppError, AppResult};

use broadcast::Broadcaster;
use config::Config;
use gateway::{Chatbot, Classifier, ProcessChatbot, ProcessClassifier};
use pipeline::IngestPipeline;
use store::{FaultStore, SqliteFaultStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub store: Arc<dyn FaultStore>,
    pub pipeline: Arc<IngestPipeline>,
    pub broadcaster: Broadcaster,
    pub chatbot: Arc<dyn Chatbot>,
}

impl AppState {
    /// State wired to the external processes named in the configuration
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let classifier = Arc::new(ProcessClassifier::new(config.classifier.clone()));
        let chatbot = Arc::new(ProcessChatbot::new(config.chatbot.clone()));
        Self::with_gateways(pool, config, classifier, chatbot)
    }

    /// State with caller-supplied classifier and chatbot
    pub fn with_gateways(
        pool: SqlitePool,
        config: Config,
        classifier: Arc<dyn Classifier>,
        chatbot: Arc<dyn Chatbot>,
    ) -> Self {
        let store: Arc<dyn FaultStore> = Arc::new(SqliteFaultStore::new(pool.clone()));
        let broadcaster = Broadcaster::new(config.broadcast_capacity);
        let pipeline = Arc::new(IngestPipeline::new(
            classifier,
            store.clone(),
            broadcaster.clone(),
        ));

        Self {
            pool,
            config,
            store,
            pipeline,
            broadcaster,
            chatbot,
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/ws", get(handlers::realtime::subscribe))

        // Ingest & analysis
        .route("/api/sensor-data", post(handlers::sensor::submit))
        .route("/api/analysis-data", get(handlers::analysis::latest_summary))
        .route("/api/faults", get(handlers::analysis::history))
        .route("/api/faults/latest", get(handlers::analysis::latest_record))
        .route("/api/chatbot-question", post(handlers::chatbot::ask))

        // Accounts & models
        .route("/api/auth/signup", post(handlers::auth::signup))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/models", get(handlers::motor_models::list));

    // User routes (JWT auth)
    let user_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/api/models/select", post(handlers::motor_models::select))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_user_auth
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
