//! Shared test fixtures

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use crate::config::Config;
use crate::gateway::{Chatbot, ClassificationResult, Classifier, ClassifierError, GatewayError};
use crate::models::SensorSample;
use crate::AppState;

/// Classifier returning a canned verdict
pub(crate) struct StubClassifier {
    pub reply: Result<ClassificationResult, String>,
    pub calls: AtomicUsize,
}

impl StubClassifier {
    pub(crate) fn new(reply: Result<ClassificationResult, String>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn fault(fault: &str, confidence: f64) -> Self {
        Self::new(Ok(ClassificationResult {
            fault: Some(fault.to_string()),
            confidence: Some(confidence),
            parts: None,
        }))
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self::new(Err(message.to_string()))
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for StubClassifier {
    async fn classify(&self, _sample: &SensorSample) -> Result<ClassificationResult, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .map_err(|stderr| GatewayError::ExitStatus { code: Some(1), stderr })
    }
}

/// Chatbot returning a canned reply
pub(crate) struct StubChatbot {
    reply: Option<Value>,
}

impl StubChatbot {
    pub(crate) fn replying(reply: Value) -> Self {
        Self { reply: Some(reply) }
    }

    pub(crate) fn silent() -> Self {
        Self::replying(serde_json::json!({"response": "No data"}))
    }

    pub(crate) fn failing() -> Self {
        Self { reply: None }
    }
}

#[async_trait]
impl Chatbot for StubChatbot {
    async fn ask(&self, _question: &str) -> Result<Value, GatewayError> {
        self.reply
            .clone()
            .ok_or_else(|| GatewayError::Reported("model unavailable".to_string()))
    }
}

pub(crate) fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some("test-secret".to_string()),
        "BROADCAST_CAPACITY" => Some("16".to_string()),
        _ => None,
    })
}

pub(crate) async fn test_state(classifier: StubClassifier, chatbot: StubChatbot) -> AppState {
    AppState::with_gateways(
        crate::db::test_pool().await,
        test_config(),
        Arc::new(classifier),
        Arc::new(chatbot),
    )
}

pub(crate) fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub(crate) fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub(crate) fn with_bearer(mut req: Request<Body>, token: &str) -> Request<Body> {
    req.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", token).parse().unwrap(),
    );
    req
}

/// Drive one request through the router and decode the JSON body
pub(crate) async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
