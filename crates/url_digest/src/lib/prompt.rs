//! # Prompt Resolver
//!
//! Determines the instructional text sent to the LLM for a given purpose.
//! Resolution order: explicit override, `{PURPOSE}_PROMPT` environment
//! variable, `{purpose}_prompt.txt` in the working directory, hard-coded
//! default. Absence at any level silently falls through to the next.

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Summary,
    Sentiment,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Summary => "summary",
            Purpose::Sentiment => "sentiment",
        }
    }

    fn env_var(&self) -> &'static str {
        match self {
            Purpose::Summary => "SUMMARY_PROMPT",
            Purpose::Sentiment => "SENTIMENT_PROMPT",
        }
    }

    fn default_prompt(&self) -> &'static str {
        match self {
            Purpose::Summary => "Could you summarise this text for me?",
            Purpose::Sentiment => "Could you tell me the sentiment of this text?",
        }
    }
}

/// Resolves the prompt for `purpose`, reading prompt files from the current
/// working directory.
pub fn resolve(purpose: Purpose, explicit: Option<&str>) -> String {
    resolve_in(purpose, explicit, Path::new("."))
}

/// Same as [`resolve`] with an explicit directory for the prompt file lookup.
pub fn resolve_in(purpose: Purpose, explicit: Option<&str>, dir: &Path) -> String {
    if let Some(prompt) = explicit {
        if !prompt.is_empty() {
            return prompt.to_string();
        }
    }

    if let Ok(prompt) = std::env::var(purpose.env_var()) {
        if !prompt.is_empty() {
            return prompt;
        }
    }

    let path = dir.join(format!("{}_prompt.txt", purpose.as_str()));
    if let Ok(contents) = std::fs::read_to_string(&path) {
        if !contents.trim().is_empty() {
            return contents;
        }
    }

    tracing::debug!(
        purpose = purpose.as_str(),
        "no prompt override, env var or prompt file found, using default"
    );
    purpose.default_prompt().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_override_wins() {
        for purpose in [Purpose::Summary, Purpose::Sentiment] {
            let resolved = resolve_in(purpose, Some("custom prompt"), Path::new("/nonexistent"));
            assert_eq!(resolved, "custom prompt");
        }
    }

    #[test]
    fn test_empty_override_falls_through_to_default() {
        let resolved = resolve_in(Purpose::Summary, Some(""), Path::new("/nonexistent"));
        assert_eq!(resolved, "Could you summarise this text for me?");
    }

    #[test]
    fn test_missing_everything_uses_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let resolved = resolve_in(Purpose::Summary, None, dir.path());
        assert_eq!(resolved, "Could you summarise this text for me?");
    }

    #[test]
    fn test_prompt_file_is_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("summary_prompt.txt"), "prompt from file")
            .expect("write prompt file");
        let resolved = resolve_in(Purpose::Summary, None, dir.path());
        assert_eq!(resolved, "prompt from file");
    }

    #[test]
    fn test_blank_prompt_file_falls_through() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("summary_prompt.txt"), "  \n").expect("write prompt file");
        let resolved = resolve_in(Purpose::Summary, None, dir.path());
        assert_eq!(resolved, "Could you summarise this text for me?");
    }

    // The env-var level touches process state, so it is exercised in a single
    // test against the sentiment variable only; the other tests stick to
    // overrides, files and defaults for the summary purpose.
    #[test]
    fn test_env_var_beats_file_and_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("sentiment_prompt.txt"), "prompt from file")
            .expect("write prompt file");

        std::env::set_var("SENTIMENT_PROMPT", "prompt from env");
        let resolved = resolve_in(Purpose::Sentiment, None, dir.path());
        std::env::remove_var("SENTIMENT_PROMPT");

        assert_eq!(resolved, "prompt from env");
    }
}
