//! Chatbot question handler

use axum::{extract::{rejection::JsonRejection, State}, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    #[serde(default)]
    pub question: Option<String>,
}

pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(req) = payload?;
    let question = req
        .question
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::ValidationError("No question provided".to_string()))?;

    tracing::info!("Chatbot question: {}", question);

    let reply = state.chatbot.ask(&question).await?;
    Ok(Json(reply))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{json_request, send, test_state, StubChatbot, StubClassifier};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_reply_is_forwarded() {
        let chatbot = StubChatbot::replying(json!({"fault": "Severe", "response": "Looks like a Severe fault."}));
        let state = test_state(StubClassifier::fault("Healthy", 0.9), chatbot).await;
        let app = crate::create_router(state);

        let (status, body) = send(
            &app,
            json_request("POST", "/api/chatbot-question", json!({"question": "what happened?"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "Looks like a Severe fault.");
    }

    #[tokio::test]
    async fn test_blank_question_is_rejected() {
        let state = test_state(StubClassifier::fault("Healthy", 0.9), StubChatbot::silent()).await;
        let app = crate::create_router(state);

        let (status, body) = send(
            &app,
            json_request("POST", "/api/chatbot-question", json!({"question": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No question provided");
    }

    #[tokio::test]
    async fn test_chatbot_failure_is_server_error() {
        let state = test_state(StubClassifier::fault("Healthy", 0.9), StubChatbot::failing()).await;
        let app = crate::create_router(state);

        let (status, body) = send(
            &app,
            json_request("POST", "/api/chatbot-question", json!({"question": "why?"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to get chatbot response");
    }
}
