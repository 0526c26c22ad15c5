#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("no transcript available: {0}")]
    TranscriptUnavailable(String),
    #[error("download failed: {0}")]
    Download(#[from] reqwest::Error),
    #[error("parse failed: {0}")]
    Parse(String),
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("audio tool failed: {0}")]
    AudioTool(String),
    #[error("audio transcription failed: {0}")]
    Transcription(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY environment variable is not set")]
    MissingApiKey,
}
