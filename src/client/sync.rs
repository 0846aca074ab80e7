//! HTTP sync client
//!
//! Polls the analysis endpoint and folds pushed updates into a
//! [`DashboardState`].

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use super::DashboardState;
use crate::broadcast::FaultNotification;

pub const NO_ANALYSIS_TEXT: &str = "No analysis data";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {0}")]
    Status(StatusCode),
}

pub struct SyncClient {
    http_client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    state: DashboardState,
}

impl SyncClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http_client, base_url))
    }

    pub fn with_client(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            state: DashboardState::default(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DashboardState {
        &mut self.state
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Fetch the latest analysis and recompute highlights from its text.
    ///
    /// Returns the text that was applied.
    pub async fn refresh(&mut self) -> Result<String, ClientError> {
        match self.fetch_analysis().await {
            Ok(text) => {
                self.state.apply_fault_text(&text);
                Ok(text)
            }
            Err(e) => {
                tracing::error!("Error fetching motor analysis: {}", e);
                self.state.record_fetch_error();
                Err(e)
            }
        }
    }

    async fn fetch_analysis(&self) -> Result<String, ClientError> {
        let url = format!("{}/api/analysis-data", self.base_url);

        let mut request = self.http_client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(NO_ANALYSIS_TEXT.to_string()),
            status if status.is_success() => {
                let body: Value = response.json().await?;
                Ok(analysis_text(body))
            }
            status => Err(ClientError::Status(status)),
        }
    }

    pub fn on_notification(&mut self, notification: &FaultNotification) {
        tracing::debug!("Applying pushed update #{}", notification.id);
        self.state.apply_notification(notification);
    }

    /// Forget credentials and return the dashboard to its initial state
    pub fn logout(&mut self) {
        self.token = None;
        self.state.reset();
    }
}

/// Text carried by an analysis response body
fn analysis_text(body: Value) -> String {
    if let Value::String(text) = body {
        return text;
    }
    // Anything else without a recognised text field counts as no data
    ["fault", "response"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| NO_ANALYSIS_TEXT.to_string())
}
