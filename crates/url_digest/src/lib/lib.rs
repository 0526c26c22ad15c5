//! # url_digest
//!
//! Fetches the textual content behind a URL (web page, PDF, or YouTube
//! transcript with optional audio-transcription fallback), then asks an
//! OpenAI-compatible chat-completion endpoint for a summary and a structured
//! sentiment analysis.
//!
//! Exposed as the `url-digest` CLI and the `url-digest-server` HTTP server.

mod analyzer;
mod config;
mod error;
pub mod extract;
pub mod llm;
pub mod prompt;
pub mod server;
pub mod tracing;

pub use analyzer::{AnalysisRequest, AnalysisResult, AnalyzeError, Analyzer, Sentiment};
pub use config::{Config, DEFAULT_MODEL};
pub use error::{ConfigError, ExtractionError, LlmError};
pub use extract::{ExtractionRequest, TextExtractor, TextSource};
pub use llm::openai::{ExponentialBackoff, OpenAiClient};
pub use llm::{
    ChatMessage, Completion, CompletionRequest, FunctionSchema, LlmReply, RetryDelay, Role,
    Transcriber, DEFAULT_MAX_RETRIES,
};
