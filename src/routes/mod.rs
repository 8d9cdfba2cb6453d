//! Route modules and router assembly

pub mod debug;
pub mod sessions;

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::session::SessionError;
use crate::state::AppState;

// ============================================================================
// Error Response
// ============================================================================

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let code = match &self {
            SessionError::NotFound(_) => "SESSION_NOT_FOUND",
            SessionError::NoDocument => "NO_DOCUMENT",
            SessionError::AnswerPending => "ANSWER_PENDING",
            SessionError::EmptyQuestion => "EMPTY_QUESTION",
            SessionError::ExtractionFailed(_) => "EXTRACTION_FAILED",
            SessionError::InvalidFileType(_) => "INVALID_FILE_TYPE",
            SessionError::MissingFile => "MISSING_FILE",
            SessionError::InvalidUpload(_) => "INVALID_UPLOAD",
            SessionError::Storage(_) => "STORAGE_ERROR",
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

// ============================================================================
// Health
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check(State(_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================================
// Router
// ============================================================================

/// Assemble the full application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/health", get(health_check))
        .nest("/api/v1/sessions", sessions::router())
        .nest("/api/v1/debug", debug::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
