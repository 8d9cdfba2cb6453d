//! Text Extractor
//!
//! Extracts the full text of a stored PDF, page by page. Extraction
//! failures are reported as warnings and yield an empty string; callers
//! treat a blank result as "extraction failed" and must not enable chat.

use async_trait::async_trait;

use crate::storage::DocumentHandle;

/// Seam for text extraction so the orchestrator can be tested without
/// real PDF parsing.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract the document's text. Returns an empty string on failure;
    /// never errors. Single attempt, no retry.
    async fn extract(&self, handle: &DocumentHandle) -> String;
}

/// Production extractor backed by `pdf-extract`
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, handle: &DocumentHandle) -> String {
        let path = handle.path.clone();
        let file_name = handle.file_name.clone();

        // PDF parsing is CPU-bound, keep it off the async runtime
        let result = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path)).await;

        match result {
            Ok(Ok(text)) => {
                let text = join_pages(&text);
                tracing::debug!(
                    file_name = %file_name,
                    chars = text.len(),
                    "Text extracted"
                );
                text
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    file_name = %file_name,
                    error = %e,
                    "PDF text extraction failed"
                );
                String::new()
            }
            Err(e) => {
                tracing::warn!(
                    file_name = %file_name,
                    error = %e,
                    "PDF extraction task panicked"
                );
                String::new()
            }
        }
    }
}

/// Re-join per-page text with newlines.
///
/// pdf-extract separates pages with form feed characters; each page's
/// text is trimmed and followed by a newline.
fn join_pages(raw: &str) -> String {
    let pages: Vec<&str> = raw
        .split('\x0C')
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();

    if pages.is_empty() {
        return String::new();
    }

    let mut text = String::new();
    for page in pages {
        text.push_str(page);
        text.push('\n');
    }
    text
}
