//! Session Orchestrator
//!
//! Runs the three external triggers (file uploaded, question submitted,
//! reset requested) against a session's state. Each trigger runs to
//! completion while the caller holds the session lock, so there is never
//! more than one in-flight mutation per session.
//!
//! Guarantees:
//! - extraction runs at most once per distinct uploaded file; re-uploads
//!   of the same file name are a no-op;
//! - cached text from a previous document is never used to answer a
//!   question about a new one.

use std::sync::Arc;

use serde::Serialize;

use super::state::SessionState;
use super::SessionError;
use crate::chat::{AnswerGenerator, ConversationTurn};
use crate::extract::TextExtractor;
use crate::storage::{DocumentStore, StorageError};

/// Result of an upload trigger
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub file_name: String,

    pub size: u64,

    /// True when the same file name was already loaded and the upload
    /// was skipped
    pub reused: bool,

    /// Characters of extracted text now cached for the session
    pub text_chars: usize,
}

/// Wires storage, extraction and generation together per trigger
#[derive(Clone)]
pub struct SessionOrchestrator {
    store: DocumentStore,
    extractor: Arc<dyn TextExtractor>,
    generator: AnswerGenerator,
}

impl SessionOrchestrator {
    pub fn new(
        store: DocumentStore,
        extractor: Arc<dyn TextExtractor>,
        generator: AnswerGenerator,
    ) -> Self {
        Self {
            store,
            extractor,
            generator,
        }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn generator(&self) -> &AnswerGenerator {
        &self.generator
    }

    /// "File uploaded" trigger.
    ///
    /// Re-uploading the file name that is already active is idempotent:
    /// nothing is reprocessed and the log is untouched. A different file
    /// name replaces the stored document, re-runs extraction and reseeds
    /// the conversation. Blank extraction leaves the session without a
    /// document and surfaces the failure.
    pub async fn handle_upload(
        &self,
        state: &mut SessionState,
        bytes: &[u8],
        file_name: &str,
    ) -> Result<UploadOutcome, SessionError> {
        if state.document_loaded() && state.last_file_name.as_deref() == Some(file_name) {
            tracing::debug!(
                session_id = %state.id,
                file_name = %file_name,
                "Same file already loaded, skipping reprocess"
            );
            return Ok(UploadOutcome {
                file_name: file_name.to_string(),
                size: state.document.as_ref().map(|d| d.size).unwrap_or(0),
                reused: true,
                text_chars: state
                    .document_text
                    .as_ref()
                    .map(|t| t.chars().count())
                    .unwrap_or(0),
            });
        }

        // Reject an invalid payload before the loaded document is touched,
        // so a bad request leaves a healthy session intact.
        if bytes.is_empty() {
            return Err(SessionError::Storage(StorageError::EmptyFile));
        }

        state.phase = super::SessionPhase::DocumentLoading;

        let previous = state.document.take();
        // From here on the previous file is gone (the store deletes it
        // before writing), so failures must drop to NoDocument rather
        // than leave stale state behind.
        let document = self
            .store
            .store(state.id, previous.as_ref(), bytes, file_name)
            .await
            .map_err(|e| {
                state.clear_document();
                SessionError::from(e)
            })?;

        let text = self.extractor.extract(&document).await;

        if text.trim().is_empty() {
            // The replaced document is already gone; nothing stale may
            // survive to answer questions.
            self.store.remove(&document).await;
            state.clear_document();
            return Err(SessionError::ExtractionFailed(file_name.to_string()));
        }

        let size = document.size;
        let text_chars = text.chars().count();
        state.load_document(document, text);

        tracing::info!(
            session_id = %state.id,
            file_name = %file_name,
            size = size,
            text_chars = text_chars,
            "Document loaded, chat activated"
        );

        Ok(UploadOutcome {
            file_name: file_name.to_string(),
            size,
            reused: false,
            text_chars,
        })
    }

    /// "Question submitted" trigger.
    ///
    /// Appends the user turn, generates one answer over the cached text
    /// and appends the assistant turn. The generator never errors; a
    /// failed call yields a fallback answer and the conversation stays
    /// usable.
    pub async fn handle_question(
        &self,
        state: &mut SessionState,
        question: &str,
    ) -> Result<String, SessionError> {
        use super::SessionPhase;

        match state.phase {
            SessionPhase::Ready => {}
            SessionPhase::NoDocument | SessionPhase::DocumentLoading => {
                return Err(SessionError::NoDocument)
            }
            SessionPhase::AwaitingAnswer => return Err(SessionError::AnswerPending),
        }

        let question = question.trim();
        if question.is_empty() {
            return Err(SessionError::EmptyQuestion);
        }

        state.phase = SessionPhase::AwaitingAnswer;
        state.push_turn(ConversationTurn::user(question));

        let text = state.document_text.clone().unwrap_or_default();
        let answer = self.generator.generate(question, &text).await;

        state.push_turn(ConversationTurn::assistant(answer.clone()));
        state.phase = SessionPhase::Ready;

        tracing::debug!(
            session_id = %state.id,
            turns = state.log.len(),
            "Question answered"
        );

        Ok(answer)
    }

    /// "Load another document" trigger.
    ///
    /// Deletes the active document's file and returns the session to its
    /// initial state. Idempotent when no document is loaded.
    pub async fn handle_reset(&self, state: &mut SessionState) {
        if let Some(document) = state.document.take() {
            self.store.remove(&document).await;
        }
        state.clear_document();

        tracing::info!(session_id = %state.id, "Session reset");
    }
}

// ============================================================================
// Tests
// ============================================================================
