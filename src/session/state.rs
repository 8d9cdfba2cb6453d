//! Session state machine
//!
//! One `SessionState` per user session, mutated only by the orchestrator
//! while the session lock is held. The conversation log is append-only
//! except for the full clear that happens when a new document loads or
//! the session resets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::ConversationTurn;
use crate::storage::DocumentHandle;

/// Assistant turn seeded into a fresh conversation after a successful load
pub const WELCOME_MESSAGE: &str =
    "Olá! Estou pronto para conversar sobre o documento que você enviou. O que gostaria de saber?";

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    /// No document loaded, chat disabled
    NoDocument,
    /// Upload accepted, extraction in progress
    DocumentLoading,
    /// Document loaded, waiting for a question
    Ready,
    /// Question submitted, answer not yet appended
    AwaitingAnswer,
}

/// Aggregate session state
#[derive(Debug)]
pub struct SessionState {
    pub id: Uuid,

    pub phase: SessionPhase,

    /// Currently active document, owned via the Document Store
    pub document: Option<DocumentHandle>,

    /// Extracted text of the active document. Always derived from
    /// `document`; cleared whenever the document changes or goes away.
    pub document_text: Option<String>,

    /// Chronological conversation log
    pub log: Vec<ConversationTurn>,

    /// Name of the last successfully processed upload, for idempotent
    /// re-upload detection
    pub last_file_name: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            phase: SessionPhase::NoDocument,
            document: None,
            document_text: None,
            log: Vec::new(),
            last_file_name: None,
            created_at: Utc::now(),
        }
    }

    /// Whether a document is loaded and chat is active
    pub fn document_loaded(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Ready | SessionPhase::AwaitingAnswer
        )
    }

    /// Whether a question is pending submission
    pub fn answer_pending(&self) -> bool {
        self.phase == SessionPhase::AwaitingAnswer
    }

    /// Install a freshly loaded document: cache its text, clear the log,
    /// seed the welcome turn and activate chat.
    pub fn load_document(&mut self, document: DocumentHandle, text: String) {
        self.last_file_name = Some(document.file_name.clone());
        self.document = Some(document);
        self.document_text = Some(text);
        self.log.clear();
        self.log.push(ConversationTurn::assistant(WELCOME_MESSAGE));
        self.phase = SessionPhase::Ready;
    }

    /// Drop the active document and everything derived from it.
    ///
    /// The caller is responsible for deleting the backing file first.
    pub fn clear_document(&mut self) {
        self.document = None;
        self.document_text = None;
        self.last_file_name = None;
        self.log.clear();
        self.phase = SessionPhase::NoDocument;
    }

    /// Append one turn to the log
    pub fn push_turn(&mut self, turn: ConversationTurn) {
        self.log.push(turn);
    }
}
