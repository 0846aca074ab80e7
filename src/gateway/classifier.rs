//! Fault classifier gateway

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{GatewayError, ProcessCommand};
use crate::models::SensorSample;
use crate::parts::Part;

pub type ClassifierError = GatewayError;

/// Classifier verdict. Only `fault` is persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ClassificationResult {
    pub fault: Option<String>,
    pub confidence: Option<f64>,
    /// Affected parts, when the classifier reports them directly
    pub parts: Option<Vec<Part>>,
}

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, sample: &SensorSample) -> Result<ClassificationResult, ClassifierError>;
}

#[derive(Debug, Deserialize)]
struct ClassifierReply {
    #[serde(default)]
    fault: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    parts: Option<Vec<String>>,
    #[serde(default)]
    error: Option<String>,
}

impl ClassificationResult {
    /// Interpret a raw classifier reply
    pub fn from_reply(reply: Value) -> Result<Self, ClassifierError> {
        let reply: ClassifierReply =
            serde_json::from_value(reply).map_err(GatewayError::InvalidResponse)?;

        if let Some(error) = reply.error {
            return Err(GatewayError::Reported(error));
        }

        let parts = reply.parts.map(|keys| {
            keys.iter()
                .filter_map(|key| {
                    let part = Part::from_key(key);
                    if part.is_none() {
                        tracing::warn!("Classifier reported unknown part '{}'", key);
                    }
                    part
                })
                .collect()
        });

        Ok(Self {
            fault: reply.fault,
            confidence: reply.confidence,
            parts,
        })
    }
}

/// Classifier backed by a one-shot external process
#[derive(Debug, Clone)]
pub struct ProcessClassifier {
    command: ProcessCommand,
}

impl ProcessClassifier {
    pub fn new(command: ProcessCommand) -> Self {
        Self { command }
    }
}

#[async_trait]
impl Classifier for ProcessClassifier {
    async fn classify(&self, sample: &SensorSample) -> Result<ClassificationResult, ClassifierError> {
        let reply = self.command.exchange(sample).await?;
        let result = ClassificationResult::from_reply(reply)?;
        tracing::debug!(
            "Classifier verdict: {:?} (confidence {:?})",
            result.fault,
            result.confidence
        );
        Ok(result)
    }
}
