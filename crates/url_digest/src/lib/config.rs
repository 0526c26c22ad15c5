use crate::error::ConfigError;

/// Model used when `OPENAI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-16k";

/// Process-level configuration, passed explicitly into the LLM client
/// rather than read from globals.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
}

impl Config {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Config {
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Reads `OPENAI_API_KEY` (required) and `OPENAI_MODEL` (optional).
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Config { api_key, model })
    }
}
