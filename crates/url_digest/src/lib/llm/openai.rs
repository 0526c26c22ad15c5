use std::{path::Path, time::Duration};

use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::LlmError,
    llm::{backoff_delay, Completion, CompletionRequest, LlmReply, RetryDelay, Transcriber},
    Config,
};

/// Sleeps on the calling task for the requested delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialBackoff;

impl RetryDelay for ExponentialBackoff {
    async fn wait(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

pub struct OpenAiClient<D = ExponentialBackoff> {
    client: Client,
    config: Config,
    base_url: String,
    delay: D,
}

impl OpenAiClient {
    pub fn new(config: Config) -> Self {
        OpenAiClient {
            client: Client::new(),
            config,
            base_url: "https://api.openai.com/v1".into(),
            delay: ExponentialBackoff,
        }
    }
}

impl<D> OpenAiClient<D> {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_retry_delay<D2: RetryDelay>(self, delay: D2) -> OpenAiClient<D2> {
        OpenAiClient {
            client: self.client,
            config: self.config,
            base_url: self.base_url,
            delay,
        }
    }
}

impl<D: RetryDelay> OpenAiClient<D> {
    async fn send_completion_request(
        &self,
        request: &CompletionRequest,
    ) -> Result<LlmReply, LlmError> {
        let mut body = serde_json::json!({
            "model": self.config.model,
            "messages": request.messages,
            "temperature": request.temperature,
        });
        if let Some(function) = &request.function {
            body["functions"] = serde_json::json!([function]);
            body["function_call"] = serde_json::json!({ "name": function.name });
        }

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, message });
        }

        let response = resp.json::<CompletionResponse>().await?;
        let message = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| LlmError::MalformedResponse("no choices in response".into()))?;

        if request.function.is_some() {
            let call = message.function_call.ok_or_else(|| {
                LlmError::MalformedResponse("expected a function call in response".into())
            })?;
            let arguments: serde_json::Value = serde_json::from_str(&call.arguments)
                .map_err(|e| LlmError::MalformedResponse(format!("invalid arguments: {e}")))?;
            if !arguments.is_object() {
                return Err(LlmError::MalformedResponse(
                    "function arguments are not a JSON object".into(),
                ));
            }
            Ok(LlmReply::FunctionCall(arguments))
        } else {
            let content = message
                .content
                .ok_or_else(|| LlmError::MalformedResponse("no content in response".into()))?;
            Ok(LlmReply::Text(content))
        }
    }

    /// Sends a chat completion, retrying up to `request.max_retries` attempts
    /// with `(attempt + 1) * 2` second back-off between them. The last error
    /// propagates unchanged once attempts are exhausted.
    pub async fn complete_with_retry(
        &self,
        request: CompletionRequest,
    ) -> Result<LlmReply, LlmError> {
        let mut attempt = 0;
        loop {
            match self.send_completion_request(&request).await {
                Ok(reply) => return Ok(reply),
                Err(e) if attempt + 1 < request.max_retries => {
                    let delay = backoff_delay(attempt);
                    tracing::warn!(
                        error = %e,
                        attempt,
                        delay_secs = delay.as_secs(),
                        "Completion request failed, retrying"
                    );
                    self.delay.wait(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, attempt, "Completion request failed, giving up");
                    return Err(e);
                }
            }
        }
    }

    pub async fn send_transcribe_request(
        &self,
        file: &Path,
        model_name: &str,
    ) -> Result<TranscribeResponse, LlmError> {
        let bytes = tokio::fs::read(file).await?;
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name("chunk.mp3")
            .mime_str("audio/mpeg")
            .map_err(|e| LlmError::MalformedResponse(format!("invalid mime type: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .text("model", model_name.to_string())
            .part("file", part);

        let resp = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, message });
        }

        Ok(resp.json::<TranscribeResponse>().await?)
    }
}

impl<D: RetryDelay> Completion for OpenAiClient<D> {
    type Error = LlmError;

    async fn complete(&self, request: CompletionRequest) -> Result<LlmReply, Self::Error> {
        self.complete_with_retry(request).await
    }
}

impl<D: RetryDelay> Transcriber for OpenAiClient<D> {
    const TRANSCRIPTION_MODEL: &'static str = "whisper-1";

    type Error = LlmError;

    async fn transcribe(&self, file: &Path) -> Result<String, Self::Error> {
        let response = self
            .send_transcribe_request(file, Self::TRANSCRIPTION_MODEL)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to transcribe audio"))?;
        Ok(response.text)
    }
}

#[derive(Debug, Deserialize)]
pub struct TranscribeResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
    function_call: Option<FunctionCallPayload>,
}

#[derive(Debug, Deserialize)]
struct FunctionCallPayload {
    arguments: String,
}
