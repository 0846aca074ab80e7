//! Classifier model catalogue handlers

use axum::{extract::{rejection::JsonRejection, State}, Json};

use crate::middleware::auth::UserContext;
use crate::models::{MotorModel, SelectModelRequest, SelectModelResponse, User};
use crate::{AppError, AppResult, AppState};

/// List available models
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<MotorModel>>> {
    let models = MotorModel::list(&state.pool).await?;
    Ok(Json(models))
}

/// Remember the caller's model choice
pub async fn select(
    State(state): State<AppState>,
    user: UserContext,
    payload: Result<Json<SelectModelRequest>, JsonRejection>,
) -> AppResult<Json<SelectModelResponse>> {
    let Json(req) = payload?;
    let model_id = req
        .model_id
        .ok_or_else(|| AppError::ValidationError("modelId required".to_string()))?;

    let model = MotorModel::find_by_id(&state.pool, model_id)
        .await?
        .ok_or_else(|| AppError::ValidationError(format!("Unknown modelId {}", model_id)))?;

    User::select_model(&state.pool, user.user_id, model.id).await?;

    tracing::info!("User {} selected model '{}'", user.username, model.name);

    Ok(Json(SelectModelResponse {
        message: "Model selected",
        model_id: model.id,
    }))
}
