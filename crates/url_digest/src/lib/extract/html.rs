use scraper::{Html, Node};
use url::Url;

use crate::error::ExtractionError;

/// Elements whose text is never rendered to the reader.
const HIDDEN_ELEMENTS: [&str; 5] = ["style", "script", "head", "title", "meta"];

pub(super) async fn extract(client: &reqwest::Client, url: &Url) -> Result<String, ExtractionError> {
    let body = client
        .get(url.clone())
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await?
        .text()
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to download page body"))?;

    let text = visible_text(&body);
    tracing::debug!(chars = text.len(), "Extracted visible text from html");
    Ok(text)
}

/// Concatenates the trimmed text of all visible DOM nodes, joined with single
/// spaces. Comments and text inside [`HIDDEN_ELEMENTS`] are skipped.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut parts = Vec::new();
    for node in document.tree.nodes() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
            Node::Element(element) => HIDDEN_ELEMENTS.contains(&element.name()),
            _ => false,
        });
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed.to_string());
        }
    }

    parts.join(" ")
}
