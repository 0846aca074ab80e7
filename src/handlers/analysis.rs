//! Fault analysis handlers

use axum::{extract::{Query, State}, Json};
use serde::Deserialize;

use crate::models::FaultRecord;
use crate::{AppError, AppResult, AppState};

const DEFAULT_HISTORY_LIMIT: u32 = 50;
const MAX_HISTORY_LIMIT: u32 = 500;

#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

fn no_data() -> AppError {
    AppError::NotFound("No analysis data yet".to_string())
}

/// Human readable summary of the newest fault
pub async fn latest_summary(State(state): State<AppState>) -> AppResult<Json<String>> {
    let record = state.store.latest().await?.ok_or_else(no_data)?;
    tracing::debug!("Serving analysis for record #{}", record.id);
    Ok(Json(record.summary()))
}

/// Newest fault record
pub async fn latest_record(State(state): State<AppState>) -> AppResult<Json<FaultRecord>> {
    let record = state.store.latest().await?.ok_or_else(no_data)?;
    Ok(Json(record))
}

/// Recent fault records, newest first
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<FaultRecord>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    let records = state.store.recent(limit).await?;
    Ok(Json(records))
}
