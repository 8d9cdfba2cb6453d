//! Session API endpoints
//!
//! One session per chatting user, holding the active document and the
//! conversation log:
//! - POST   /api/v1/sessions                 - Create a session
//! - GET    /api/v1/sessions/:id             - Introspect session state
//! - DELETE /api/v1/sessions/:id             - End a session
//! - POST   /api/v1/sessions/:id/document    - Upload the active PDF
//! - POST   /api/v1/sessions/:id/chat       - Submit a question
//! - GET    /api/v1/sessions/:id/transcript  - Read the conversation log
//! - POST   /api/v1/sessions/:id/reset       - Load-another-document reset

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::ConversationTurn;
use crate::session::{SessionError, SessionPhase, UploadOutcome};
use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: String,
}

/// Read-only introspection of a session's state
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStateResponse {
    pub session_id: String,
    pub phase: SessionPhase,
    pub document_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    /// Characters of cached extracted text
    pub text_chars: usize,
    pub turns: usize,
    pub answer_pending: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    pub question: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptResponse {
    pub session_id: String,
    pub turns: Vec<ConversationTurn>,
}

// ============================================================================
// Router
// ============================================================================

/// Create the sessions router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/:id", get(get_session).delete(end_session))
        .route("/:id/document", post(upload_document))
        .route("/:id/chat", post(ask_question))
        .route("/:id/transcript", get(get_transcript))
        .route("/:id/reset", post(reset_session))
        // PDFs only, far below book-scale uploads
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/sessions
async fn create_session(State(state): State<AppState>) -> Json<CreateSessionResponse> {
    let id = state.registry().create().await;
    Json(CreateSessionResponse {
        session_id: id.to_string(),
    })
}

/// GET /api/v1/sessions/:id
///
/// Debug surface: read-only view of the session aggregate.
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionStateResponse>, SessionError> {
    let session = state.registry().get_by_str(&id).await?;
    let session = session.lock().await;

    Ok(Json(SessionStateResponse {
        session_id: session.id.to_string(),
        phase: session.phase,
        document_loaded: session.document_loaded(),
        file_name: session.last_file_name.clone(),
        file_size: session.document.as_ref().map(|d| d.size),
        text_chars: session
            .document_text
            .as_ref()
            .map(|t| t.chars().count())
            .unwrap_or(0),
        turns: session.log.len(),
        answer_pending: session.answer_pending(),
        created_at: session.created_at,
    }))
}

/// DELETE /api/v1/sessions/:id
async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, SessionError> {
    let session_id =
        Uuid::parse_str(&id).map_err(|_| SessionError::NotFound(id.clone()))?;

    // Unregister first so new lookups 404, then wait for any in-flight
    // trigger before tearing the state down. No trigger can slip in
    // between reset and storage removal.
    let session = state.registry().remove(session_id).await?;

    let mut locked = session.lock().await;
    state.orchestrator().handle_reset(&mut locked).await;
    state
        .orchestrator()
        .store()
        .remove_session_dir(session_id)
        .await;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/document
///
/// The "file uploaded" trigger. Accepts one PDF as a multipart `file`
/// field; anything else is rejected before the core sees it.
async fn upload_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadOutcome>, SessionError> {
    let session = state.registry().get_by_str(&id).await?;

    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| SessionError::InvalidUpload(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name != "file" && name != "pdf" && name != "document" {
            continue;
        }

        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or(SessionError::MissingFile)?;
        let content_type = field.content_type().map(|s| s.to_string());

        if !is_pdf_upload(&file_name, content_type.as_deref()) {
            return Err(SessionError::InvalidFileType(
                content_type.unwrap_or(file_name),
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| SessionError::InvalidUpload(e.to_string()))?;

        upload = Some((file_name, bytes.to_vec()));
        break;
    }

    let (file_name, bytes) = upload.ok_or(SessionError::MissingFile)?;

    let mut session = session.lock().await;
    let outcome = state
        .orchestrator()
        .handle_upload(&mut session, &bytes, &file_name)
        .await?;

    Ok(Json(outcome))
}

/// POST /api/v1/sessions/:id/chat
///
/// The "question submitted" trigger.
async fn ask_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, SessionError> {
    let session = state.registry().get_by_str(&id).await?;

    let mut session = session.lock().await;
    let answer = state
        .orchestrator()
        .handle_question(&mut session, &request.question)
        .await?;

    Ok(Json(AskResponse { answer }))
}

/// GET /api/v1/sessions/:id/transcript
async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TranscriptResponse>, SessionError> {
    let session = state.registry().get_by_str(&id).await?;
    let session = session.lock().await;

    Ok(Json(TranscriptResponse {
        session_id: session.id.to_string(),
        turns: session.log.clone(),
    }))
}

/// POST /api/v1/sessions/:id/reset
///
/// The "load another document" trigger: deletes the active document and
/// clears the conversation, keeping the session itself alive.
async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, SessionError> {
    let session = state.registry().get_by_str(&id).await?;

    let mut session = session.lock().await;
    state.orchestrator().handle_reset(&mut session).await;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Helpers
// ============================================================================

/// Upstream validation: only PDF uploads reach the core
fn is_pdf_upload(file_name: &str, content_type: Option<&str>) -> bool {
    content_type == Some("application/pdf") || file_name.to_ascii_lowercase().ends_with(".pdf")
}

// ============================================================================
// Tests
// ============================================================================
