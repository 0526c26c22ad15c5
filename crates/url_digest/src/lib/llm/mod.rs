pub mod openai;

use std::{fmt::Debug, future::Future, path::Path, time::Duration};

use serde::Serialize;

/// Attempts made against the completion endpoint before giving up.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A function-call contract forcing the model's reply into a fixed JSON shape.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionSchema {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub function: Option<FunctionSchema>,
    pub max_retries: u32,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        CompletionRequest {
            messages,
            temperature: 1.0,
            function: None,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_function(mut self, function: FunctionSchema) -> Self {
        self.function = Some(function);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Either the raw text of the model's reply, or the decoded arguments of the
/// forced function call when a [`FunctionSchema`] was supplied.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmReply {
    Text(String),
    FunctionCall(serde_json::Value),
}

pub trait Completion {
    type Error: Debug;

    fn complete(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<LlmReply, Self::Error>> + Send;
}

pub trait Transcriber {
    const TRANSCRIPTION_MODEL: &'static str;

    type Error: Debug;

    fn transcribe(&self, file: &Path) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

/// Seam for the retry back-off sleep, so tests can observe delays without
/// real elapsed time.
pub trait RetryDelay: Send + Sync {
    fn wait(&self, delay: Duration) -> impl Future<Output = ()> + Send;
}

/// Delay for the zero-indexed retry `attempt`: `(attempt + 1) * 2` seconds.
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(u64::from(attempt + 1) * 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_delay_doubles_per_attempt() {
        assert_eq!(backoff_delay(0), Duration::from_secs(2));
        assert_eq!(backoff_delay(1), Duration::from_secs(4));
        assert_eq!(backoff_delay(4), Duration::from_secs(10));
    }

    #[test]
    fn test_message_roles_serialize_lowercase() {
        let msg = ChatMessage::system("preamble");
        let json = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(json["role"], "system");
        let msg = ChatMessage::user("hello");
        let json = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(json["role"], "user");
    }
}
