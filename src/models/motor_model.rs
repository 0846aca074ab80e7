//! Classifier model catalogue

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MotorModel {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectModelRequest {
    #[serde(rename = "modelId")]
    pub model_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SelectModelResponse {
    pub message: &'static str,
    #[serde(rename = "modelId")]
    pub model_id: i64,
}

impl MotorModel {
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, MotorModel>("SELECT id, name FROM models ORDER BY id ASC")
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, MotorModel>("SELECT id, name FROM models WHERE id = ?1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
