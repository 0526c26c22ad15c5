//! # Analyzer
//!
//! Composes the prompt resolver, text extractor and LLM client into a single
//! `{summary, sentiment}` analysis of a URL. Both stages reuse one extraction
//! pass; each stage can be skipped independently.

use serde_json::{json, Value};

use crate::{
    error::ExtractionError,
    extract::{ExtractionRequest, TextSource},
    llm::{ChatMessage, Completion, CompletionRequest, FunctionSchema, LlmReply},
    prompt::{self, Purpose},
};

const SUMMARY_SYSTEM_PROMPT: &str = "You are a helpful AI assistant who specialises in \
    summarising text. You are given a piece of text and asked to summarise it.";
const SENTIMENT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant who specialises in \
    sentiment analysis. You are given a piece of text and asked to analyse the sentiment.";

const STRICT_TEMPERATURE: f64 = 0.1;
const DEFAULT_TEMPERATURE: f64 = 1.0;

#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub url: String,
    pub summary_prompt: Option<String>,
    pub sentiment_prompt: Option<String>,
    pub strict: bool,
    pub skip_summary: bool,
    pub skip_sentiment: bool,
    pub allow_audio_fallback: bool,
}

impl AnalysisRequest {
    pub fn new(url: impl Into<String>) -> Self {
        AnalysisRequest {
            url: url.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sentiment {
    pub score: i64,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub summary: Option<String>,
    pub sentiment: Option<Sentiment>,
}

impl AnalysisResult {
    /// CLI JSON shape: `{"summary": ..., "sentiment": {"score", "analysis"}}`
    /// with fields present only for the stages that ran.
    pub fn to_json(&self) -> Value {
        let mut out = serde_json::Map::new();
        if let Some(summary) = &self.summary {
            out.insert("summary".into(), json!(summary));
        }
        if let Some(sentiment) = &self.sentiment {
            out.insert(
                "sentiment".into(),
                json!({ "score": sentiment.score, "analysis": sentiment.summary }),
            );
        }
        Value::Object(out)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("LLM request failed: {0}")]
    Llm(String),
}

pub struct Analyzer<S, C>
where
    S: TextSource + Send + Sync,
    C: Completion + Send + Sync,
{
    source: S,
    llm: C,
}

impl<S, C> Analyzer<S, C>
where
    S: TextSource + Send + Sync,
    C: Completion + Send + Sync,
{
    pub fn new(source: S, llm: C) -> Self {
        Analyzer { source, llm }
    }

    #[tracing::instrument(skip(self, request), fields(url = %request.url))]
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalyzeError> {
        let extraction = ExtractionRequest::new(&request.url)
            .with_audio_fallback(request.allow_audio_fallback);

        tracing::info!("Getting text from url");
        let text = self.source.extract(&extraction).await?;
        tracing::info!(chars = text.len(), "Got text from url");

        let summary = if request.skip_summary {
            None
        } else {
            Some(self.summarize(&text, request).await?)
        };

        let sentiment = if request.skip_sentiment {
            None
        } else {
            Some(self.sentiment(&text, request).await?)
        };

        Ok(AnalysisResult { summary, sentiment })
    }

    async fn summarize(&self, text: &str, request: &AnalysisRequest) -> Result<String, AnalyzeError> {
        let prompt = prompt::resolve(Purpose::Summary, request.summary_prompt.as_deref());
        let temperature = if request.strict {
            STRICT_TEMPERATURE
        } else {
            DEFAULT_TEMPERATURE
        };

        tracing::info!(chars = text.len(), "Getting summary");
        let completion = CompletionRequest::new(vec![
            ChatMessage::system(SUMMARY_SYSTEM_PROMPT),
            ChatMessage::user(format!("{prompt} :: {text}")),
        ])
        .with_temperature(temperature);

        match self.complete(completion).await? {
            LlmReply::Text(summary) => Ok(summary),
            LlmReply::FunctionCall(_) => {
                Err(AnalyzeError::Llm("unexpected function call in summary reply".into()))
            }
        }
    }

    async fn sentiment(
        &self,
        text: &str,
        request: &AnalysisRequest,
    ) -> Result<Sentiment, AnalyzeError> {
        let prompt = prompt::resolve(Purpose::Sentiment, request.sentiment_prompt.as_deref());

        tracing::info!(chars = text.len(), "Getting sentiment");
        let completion = CompletionRequest::new(vec![
            ChatMessage::system(SENTIMENT_SYSTEM_PROMPT),
            ChatMessage::user(format!("{prompt} :: {text}")),
        ])
        .with_function(sentiment_schema());

        let args = match self.complete(completion).await? {
            LlmReply::FunctionCall(args) => args,
            LlmReply::Text(_) => {
                return Err(AnalyzeError::Llm("expected a function call in sentiment reply".into()))
            }
        };

        // field-level fallbacks; a genuinely failed stage still errors above
        let score = args
            .get("sentiment_score")
            .and_then(Value::as_i64)
            .unwrap_or(0);
        let summary = args
            .get("sentiment_summary")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or("N/A")
            .to_string();

        Ok(Sentiment { score, summary })
    }

    async fn complete(&self, request: CompletionRequest) -> Result<LlmReply, AnalyzeError> {
        self.llm
            .complete(request)
            .await
            .map_err(|e| AnalyzeError::Llm(format!("{e:?}")))
    }
}

fn sentiment_schema() -> FunctionSchema {
    FunctionSchema {
        name: "get_sentiment_analysis".into(),
        description: "this function is given an integer sentiment_score from 0 (very bad) to 10 \
            (very good) and a short string sentiment_summary which describes the result of the \
            analysis."
            .into(),
        parameters: json!({
            "type": "object",
            "properties": {
                "sentiment_score": {
                    "type": "integer",
                    "description": "The sentiment score from 0 (very bad) to 10 (very good).",
                },
                "sentiment_summary": {
                    "type": "string",
                    "description": "A short bit of text describing the sentiment analysis result.",
                },
            },
            "required": ["sentiment_score", "sentiment_summary"],
        }),
    }
}
