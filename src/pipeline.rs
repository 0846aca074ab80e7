//! Sensor ingest pipeline
//!
//! classify → persist → broadcast, per submission. A classifier failure
//! stops before the store; a store failure stops before the broadcast.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::broadcast::{Broadcaster, FaultNotification};
use crate::gateway::{Classifier, ClassifierError};
use crate::models::{SensorSample, UNKNOWN_FAULT};
use crate::parts::{parts_for_fault, Part};
use crate::rules::{assess, Assessment};
use crate::store::{FaultStore, StoreError};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("classification failed: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("{0}")]
    Store(#[from] StoreError),
}

/// Result of one successful ingest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestOutcome {
    pub id: i64,
    pub fault: String,
    pub confidence: Option<f64>,
    pub timestamp: DateTime<Utc>,
    pub parts: Vec<Part>,
    pub assessment: Assessment,
}

pub struct IngestPipeline {
    classifier: Arc<dyn Classifier>,
    store: Arc<dyn FaultStore>,
    broadcaster: Broadcaster,
}

impl IngestPipeline {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        store: Arc<dyn FaultStore>,
        broadcaster: Broadcaster,
    ) -> Self {
        Self {
            classifier,
            store,
            broadcaster,
        }
    }

    pub async fn ingest(&self, sample: SensorSample) -> Result<IngestOutcome, IngestError> {
        let result = self.classifier.classify(&sample).await.map_err(|e| {
            tracing::error!("ML pipeline error: {}", e);
            e
        })?;

        let fault = result.fault.unwrap_or_else(|| UNKNOWN_FAULT.to_string());

        let record = self.store.append(&sample, &fault).await.map_err(|e| {
            tracing::error!("Failed to store fault '{}': {}", fault, e);
            e
        })?;

        // Structured parts from the classifier win over keyword matching
        let parts = result
            .parts
            .unwrap_or_else(|| parts_for_fault(&record.fault).into_iter().collect());
        let assessment = assess(&sample);

        let notification = FaultNotification {
            id: record.id,
            fault: record.fault.clone(),
            confidence: result.confidence,
            timestamp: record.timestamp,
            input: record.input,
            parts: parts.clone(),
            assessment: assessment.clone(),
        };
        let delivered = self.broadcaster.broadcast(notification);

        tracing::info!(
            "Recorded fault #{} '{}' (confidence {:?}), notified {} client(s)",
            record.id,
            record.fault,
            result.confidence,
            delivered
        );

        Ok(IngestOutcome {
            id: record.id,
            fault: record.fault,
            confidence: result.confidence,
            timestamp: record.timestamp,
            parts,
            assessment,
        })
    }
}
