use std::sync::{Arc, Mutex};

use url_digest::{ExtractionError, ExtractionRequest, TextSource};

#[derive(Clone)]
pub struct MockTextSource {
    pub text: String,
    pub calls: Arc<Mutex<Vec<ExtractionRequest>>>,
    pub fail_with: Option<String>,
}

impl MockTextSource {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            text: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl TextSource for MockTextSource {
    async fn extract(&self, request: &ExtractionRequest) -> Result<String, ExtractionError> {
        self.calls.lock().unwrap().push(request.clone());
        if let Some(ref msg) = self.fail_with {
            return Err(ExtractionError::Parse(msg.clone()));
        }
        Ok(self.text.clone())
    }
}
