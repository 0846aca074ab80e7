//! Configuration module

use std::env;
use std::time::Duration;

use crate::gateway::ProcessCommand;

/// JWT secret used when `JWT_SECRET` is not set. Refused in production.
pub const DEFAULT_JWT_SECRET: &str = "motor-dashboard-secret-change-in-production";

/// Upper bound on token lifetime (one year)
pub const MAX_JWT_EXPIRATION_HOURS: u64 = 24 * 365;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum pooled database connections
    pub database_max_connections: u32,

    /// Server port
    pub port: u16,

    /// JWT secret key
    pub jwt_secret: String,

    /// JWT expiration in hours
    pub jwt_expiration_hours: u64,

    /// External fault classification process
    pub classifier: ProcessCommand,

    /// External question answering process
    pub chatbot: ProcessCommand,

    /// Capacity of the realtime broadcast channel
    pub broadcast_capacity: usize,

    /// Classifier models seeded into the catalogue
    pub model_names: Vec<String>,

    /// Log output format
    pub log_format: LogFormat,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://motor_fault.db".to_string()),

            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS")
                .map(|n| n.clamp(1, 64) as u32)
                .unwrap_or(5),

            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(5000),

            jwt_secret: lookup("JWT_SECRET")
                .unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string()),

            jwt_expiration_hours: parsed("JWT_EXPIRATION_HOURS")
                .map(|h| h.clamp(1, MAX_JWT_EXPIRATION_HOURS))
                .unwrap_or(24),

            classifier: ProcessCommand::new(
                lookup("CLASSIFIER_PROGRAM").unwrap_or_else(|| "python".to_string()),
                vec![lookup("CLASSIFIER_SCRIPT")
                    .unwrap_or_else(|| "python/model_runner.py".to_string())],
            )
            .with_timeout(Duration::from_secs(
                parsed("CLASSIFIER_TIMEOUT_SECS").map(|s| s.max(1)).unwrap_or(30),
            )),

            chatbot: ProcessCommand::new(
                lookup("CHATBOT_PROGRAM").unwrap_or_else(|| "python".to_string()),
                vec![lookup("CHATBOT_SCRIPT")
                    .unwrap_or_else(|| "python/motor_nlp_backend.py".to_string())],
            )
            .with_timeout(Duration::from_secs(
                parsed("CHATBOT_TIMEOUT_SECS").map(|s| s.max(1)).unwrap_or(60),
            )),

            broadcast_capacity: parsed("BROADCAST_CAPACITY")
                .map(|n| n.max(1) as usize)
                .unwrap_or(256),

            model_names: lookup("MODEL_NAMES")
                .map(|names| {
                    names
                        .split(',')
                        .map(str::trim)
                        .filter(|n| !n.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_else(|| vec!["motor_fault_model_no_vib_balanced1".to_string()]),

            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },

            environment: lookup("ENVIRONMENT")
                .unwrap_or_else(|| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Check whether the built-in JWT secret is still in use
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}
