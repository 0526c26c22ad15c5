//! # Text Extractor
//!
//! Given a URL, returns its plain-text content using one of three strategies
//! chosen by URL shape: YouTube transcript (with optional audio-transcription
//! fallback), PDF text extraction, or HTML visible-text scraping. No retry
//! happens at this layer; any network or parse failure is terminal.

mod html;
mod pdf;
mod youtube;

use std::{future::Future, path::PathBuf};

use url::Url;

use crate::{error::ExtractionError, llm::Transcriber};

#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub url: String,
    pub fallback_to_audio: bool,
}

impl ExtractionRequest {
    pub fn new(url: impl Into<String>) -> Self {
        ExtractionRequest {
            url: url.into(),
            fallback_to_audio: false,
        }
    }

    pub fn with_audio_fallback(mut self, fallback_to_audio: bool) -> Self {
        self.fallback_to_audio = fallback_to_audio;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    YouTube,
    Pdf,
    Html,
}

/// Picks the extraction strategy from the URL shape. YouTube hosts win over
/// a `.pdf` path suffix.
pub fn strategy_for(url: &Url) -> Strategy {
    if url.host_str().is_some_and(|host| host.contains("youtube.com")) {
        Strategy::YouTube
    } else if url.path().to_ascii_lowercase().ends_with(".pdf") {
        Strategy::Pdf
    } else {
        Strategy::Html
    }
}

pub trait TextSource {
    fn extract(
        &self,
        request: &ExtractionRequest,
    ) -> impl Future<Output = Result<String, ExtractionError>> + Send;
}

pub struct TextExtractor<T> {
    client: reqwest::Client,
    transcriber: T,
    workdir: PathBuf,
}

impl<T> TextExtractor<T> {
    pub fn new(transcriber: T, workdir: impl Into<PathBuf>) -> Self {
        TextExtractor {
            client: reqwest::Client::new(),
            transcriber,
            workdir: workdir.into(),
        }
    }
}

impl<T: Transcriber + Send + Sync> TextSource for TextExtractor<T> {
    async fn extract(&self, request: &ExtractionRequest) -> Result<String, ExtractionError> {
        let url = Url::parse(&request.url)?;
        tracing::debug!(url = %url, "Extracting text");
        match strategy_for(&url) {
            Strategy::YouTube => {
                youtube::extract(
                    &self.client,
                    &self.transcriber,
                    &self.workdir,
                    &url,
                    request.fallback_to_audio,
                )
                .await
            }
            Strategy::Pdf => pdf::extract(&self.client, &url).await,
            Strategy::Html => html::extract(&self.client, &url).await,
        }
    }
}
