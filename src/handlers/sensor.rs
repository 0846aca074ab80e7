//! Sensor ingest handler

use axum::{extract::{rejection::JsonRejection, State}, Json};
use serde::Serialize;

use crate::models::{SensorDataRequest, SensorSample};
use crate::rules::Assessment;
use crate::{AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct SensorDataResponse {
    pub message: &'static str,
    pub id: i64,
    pub fault: String,
    pub confidence: Option<f64>,
    pub assessment: Assessment,
}

/// Classify, store and broadcast one sensor sample
pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<SensorDataRequest>, JsonRejection>,
) -> AppResult<Json<SensorDataResponse>> {
    let Json(req) = payload?;
    let sample = SensorSample::try_from(req)?;

    tracing::debug!("Sensor sample received: {:?}", sample);

    let outcome = state.pipeline.ingest(sample).await?;

    Ok(Json(SensorDataResponse {
        message: "Data received, processed, and stored",
        id: outcome.id,
        fault: outcome.fault,
        confidence: outcome.confidence,
        assessment: outcome.assessment,
    }))
}
