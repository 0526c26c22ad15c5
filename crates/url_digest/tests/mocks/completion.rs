use std::sync::{Arc, Mutex};

use url_digest::{Completion, CompletionRequest, LlmReply};

#[derive(Clone)]
pub struct MockCompletion {
    pub summary: String,
    pub sentiment_args: serde_json::Value,
    pub calls: Arc<Mutex<Vec<CompletionRequest>>>,
    pub fail_with: Option<String>,
}

impl MockCompletion {
    pub fn new(summary: &str, sentiment_args: serde_json::Value) -> Self {
        Self {
            summary: summary.to_string(),
            sentiment_args,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            summary: String::new(),
            sentiment_args: serde_json::Value::Null,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl Completion for MockCompletion {
    type Error = String;

    async fn complete(&self, request: CompletionRequest) -> Result<LlmReply, Self::Error> {
        let has_function = request.function.is_some();
        self.calls.lock().unwrap().push(request);
        if let Some(ref msg) = self.fail_with {
            return Err(msg.clone());
        }
        if has_function {
            Ok(LlmReply::FunctionCall(self.sentiment_args.clone()))
        } else {
            Ok(LlmReply::Text(self.summary.clone()))
        }
    }
}
