use lopdf::Document;
use url::Url;

use crate::error::ExtractionError;

pub(super) async fn extract(client: &reqwest::Client, url: &Url) -> Result<String, ExtractionError> {
    let bytes = client
        .get(url.clone())
        .send()
        .await?
        .bytes()
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to download pdf"))?;

    let document =
        Document::load_mem(&bytes).map_err(|e| ExtractionError::Parse(format!("pdf: {e}")))?;

    let mut pages: Vec<u32> = document.get_pages().keys().copied().collect();
    pages.sort_unstable();

    // page-by-page, newline-separated, preserving page order
    let mut text = String::new();
    for page in pages {
        match document.extract_text(&[page]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => tracing::warn!(page, error = %e, "Skipping page with no extractable text"),
        }
        text.push('\n');
    }

    tracing::debug!(chars = text.len(), "Extracted text from pdf");
    Ok(text)
}
