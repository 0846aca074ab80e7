//! Append-only fault record store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;

use crate::models::{FaultRecord, SensorSample};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store write failed: {0}")]
    Write(#[source] sqlx::Error),

    #[error("store read failed: {0}")]
    Read(#[source] sqlx::Error),

    #[error("failed to encode sample: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("record {id} is corrupt: {reason}")]
    Corrupt { id: i64, reason: String },
}

/// Append-only storage of classified samples.
///
/// Record ids are unique and strictly increasing; timestamps never go
/// backwards in insertion order.
#[async_trait]
pub trait FaultStore: Send + Sync {
    /// Insert one record atomically and return it
    async fn append(&self, sample: &SensorSample, fault: &str) -> Result<FaultRecord, StoreError>;

    /// Newest record by timestamp, ties broken by id. `None` when empty.
    async fn latest(&self) -> Result<Option<FaultRecord>, StoreError>;

    /// Up to `limit` records, newest first
    async fn recent(&self, limit: u32) -> Result<Vec<FaultRecord>, StoreError>;
}

#[derive(Debug, FromRow)]
struct FaultRow {
    id: i64,
    input: String,
    fault: String,
    timestamp_ms: i64,
}

impl TryFrom<FaultRow> for FaultRecord {
    type Error = StoreError;

    fn try_from(row: FaultRow) -> Result<Self, Self::Error> {
        let input = serde_json::from_str(&row.input).map_err(|e| StoreError::Corrupt {
            id: row.id,
            reason: format!("input: {}", e),
        })?;
        let timestamp = DateTime::<Utc>::from_timestamp_millis(row.timestamp_ms).ok_or_else(|| {
            StoreError::Corrupt {
                id: row.id,
                reason: format!("timestamp {} out of range", row.timestamp_ms),
            }
        })?;

        Ok(FaultRecord {
            id: row.id,
            input,
            fault: row.fault,
            timestamp,
        })
    }
}

/// SQLite-backed store
#[derive(Debug, Clone)]
pub struct SqliteFaultStore {
    pool: SqlitePool,
}

impl SqliteFaultStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FaultStore for SqliteFaultStore {
    async fn append(&self, sample: &SensorSample, fault: &str) -> Result<FaultRecord, StoreError> {
        let input = serde_json::to_string(sample).map_err(StoreError::Encode)?;

        // The clock reading is clamped to the newest stored timestamp so a
        // wall-clock step backwards cannot reorder records.
        let row = sqlx::query_as::<_, FaultRow>(
            r#"
            INSERT INTO fault_records (input, fault, timestamp_ms)
            VALUES (?1, ?2, MAX(?3, COALESCE((SELECT MAX(timestamp_ms) FROM fault_records), ?3)))
            RETURNING id, input, fault, timestamp_ms
            "#
        )
        .bind(input)
        .bind(fault)
        .bind(Utc::now().timestamp_millis())
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::Write)?;

        row.try_into()
    }

    async fn latest(&self) -> Result<Option<FaultRecord>, StoreError> {
        let row = sqlx::query_as::<_, FaultRow>(
            r#"
            SELECT id, input, fault, timestamp_ms
            FROM fault_records
            ORDER BY timestamp_ms DESC, id DESC
            LIMIT 1
            "#
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::Read)?;

        row.map(FaultRecord::try_from).transpose()
    }

    async fn recent(&self, limit: u32) -> Result<Vec<FaultRecord>, StoreError> {
        let rows = sqlx::query_as::<_, FaultRow>(
            r#"
            SELECT id, input, fault, timestamp_ms
            FROM fault_records
            ORDER BY timestamp_ms DESC, id DESC
            LIMIT ?1
            "#
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::Read)?;

        rows.into_iter().map(FaultRecord::try_from).collect()
    }
}
