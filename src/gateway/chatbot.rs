//! Question answering gateway

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{GatewayError, ProcessCommand};

#[async_trait]
pub trait Chatbot: Send + Sync {
    /// Answer a free-text question about recorded faults
    async fn ask(&self, question: &str) -> Result<Value, GatewayError>;
}

/// Chatbot backed by a one-shot external process
#[derive(Debug, Clone)]
pub struct ProcessChatbot {
    command: ProcessCommand,
}

impl ProcessChatbot {
    pub fn new(command: ProcessCommand) -> Self {
        Self { command }
    }
}

#[async_trait]
impl Chatbot for ProcessChatbot {
    async fn ask(&self, question: &str) -> Result<Value, GatewayError> {
        let reply = self.command.exchange(&json!({ "question": question })).await?;

        if let Some(error) = reply.get("error").filter(|e| !e.is_null()) {
            let message = error
                .as_str()
                .map(String::from)
                .unwrap_or_else(|| error.to_string());
            return Err(GatewayError::Reported(message));
        }

        Ok(reply)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn chatbot(script: &str) -> ProcessChatbot {
        ProcessChatbot::new(ProcessCommand::new(
            "sh",
            vec!["-c".to_string(), script.to_string()],
        ))
    }

    #[tokio::test]
    async fn test_reply_passes_through() {
        let bot = chatbot(
            r#"cat >/dev/null; echo "Batches: 100%"; echo '{"fault": "Commutator", "response": "Most similar to a Commutator fault."}'"#,
        );
        let reply = bot.ask("what is wrong?").await.unwrap();
        assert_eq!(reply["fault"], "Commutator");
        assert!(reply["response"].as_str().unwrap().contains("Commutator"));
    }

    #[tokio::test]
    async fn test_error_field_becomes_reported_error() {
        let bot = chatbot(r#"cat >/dev/null; echo '{"error": "No question provided"}'"#);
        match bot.ask("").await {
            Err(GatewayError::Reported(msg)) => assert_eq!(msg, "No question provided"),
            other => panic!("Expected Reported, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_null_error_field_is_ignored() {
        let bot = chatbot(r#"cat >/dev/null; echo '{"response": "All clear.", "error": null}'"#);
        let reply = bot.ask("status?").await.unwrap();
        assert_eq!(reply["response"], "All clear.");
    }
}
