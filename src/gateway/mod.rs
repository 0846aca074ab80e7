//! External process gateway
//!
//! One-shot JSON request/response over a process boundary: the request is
//! written to stdin, stdin is closed, and stdout is read until the process
//! exits. Diagnostic lines may precede the JSON reply on stdout.

pub mod classifier;
pub mod chatbot;

use std::io;
use std::process::Stdio;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

pub use chatbot::{Chatbot, ProcessChatbot};
pub use classifier::{ClassificationResult, Classifier, ClassifierError, ProcessClassifier};

/// Characters of raw output kept in error messages
const OUTPUT_PREVIEW_CHARS: usize = 512;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error talking to external process: {0}")]
    Io(#[from] io::Error),

    #[error("external process did not finish within {0:?}")]
    Timeout(Duration),

    #[error("external process exited with status {code:?}: {stderr}")]
    ExitStatus { code: Option<i32>, stderr: String },

    #[error("external process produced no JSON reply: {output}")]
    Unparsable { output: String },

    #[error("external process reported an error: {0}")]
    Reported(String),

    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("malformed reply: {0}")]
    InvalidResponse(#[source] serde_json::Error),
}

/// How to launch an external worker
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    /// `None` waits for the process indefinitely
    pub timeout: Option<Duration>,
}

impl ProcessCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Send one JSON request and wait for the JSON reply.
    ///
    /// On timeout the child is killed before returning.
    pub async fn exchange<T>(&self, request: &T) -> Result<Value, GatewayError>
    where
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(request).map_err(GatewayError::Encode)?;

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(payload))
                .await
                .map_err(|_| {
                    tracing::warn!("`{}` timed out after {:?}", self.program, limit);
                    GatewayError::Timeout(limit)
                })?,
            None => self.run(payload).await,
        }
    }

    async fn run(&self, payload: Vec<u8>) -> Result<Value, GatewayError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| GatewayError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(&payload).await {
                Ok(()) => {}
                // The worker may exit without reading its input
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    tracing::debug!("`{}` closed stdin before reading the request", self.program);
                }
                Err(e) => return Err(e.into()),
            }
            drop(stdin);
        }

        let output = child.wait_with_output().await?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if !stderr.is_empty() {
            tracing::debug!("`{}` stderr: {}", self.program, stderr);
        }

        if !output.status.success() {
            return Err(GatewayError::ExitStatus {
                code: output.status.code(),
                stderr: preview(stderr),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_reply(&stdout).ok_or_else(|| GatewayError::Unparsable {
            output: preview(stdout.trim()),
        })
    }
}

/// Extract the reply object from raw stdout.
///
/// The whole output is tried first so pretty-printed replies work; otherwise
/// the last line that is a JSON object wins.
pub fn parse_reply(stdout: &str) -> Option<Value> {
    let trimmed = stdout.trim();
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    trimmed
        .lines()
        .rev()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .find_map(|line| match serde_json::from_str::<Value>(line) {
            Ok(value @ Value::Object(_)) => Some(value),
            _ => None,
        })
}

fn preview(text: &str) -> String {
    text.chars().take(OUTPUT_PREVIEW_CHARS).collect()
}
