//! Debug endpoints
//!
//! Smoke-test hook for the answer generator: runs one generation against
//! a literal fixture question/text pair, bypassing sessions entirely.

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use crate::state::AppState;

const FIXTURE_QUESTION: &str = "What color is the sky?";
const FIXTURE_TEXT: &str = "The sky is blue during the day.";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestGenerationResponse {
    pub question: &'static str,
    pub document_text: &'static str,
    pub answer: String,
    /// Whether a generation backend is configured at all
    pub configured: bool,
}

/// Create the debug router
pub fn router() -> Router<AppState> {
    Router::new().route("/generate", post(test_generation))
}

/// POST /api/v1/debug/generate
async fn test_generation(State(state): State<AppState>) -> Json<TestGenerationResponse> {
    let generator = state.orchestrator().generator();
    let answer = generator.generate(FIXTURE_QUESTION, FIXTURE_TEXT).await;

    tracing::info!(answer = %answer, "Debug generation complete");

    Json(TestGenerationResponse {
        question: FIXTURE_QUESTION,
        document_text: FIXTURE_TEXT,
        answer,
        configured: generator.is_configured(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::generator::{MockBackend, NOT_CONFIGURED_MESSAGE};
    use crate::chat::AnswerGenerator;
    use crate::config::Config;
    use crate::extract::PdfTextExtractor;
    use crate::session::SessionOrchestrator;
    use crate::storage::DocumentStore;
    use axum_test::TestServer;
    use std::sync::Arc;

    fn server_with_generator(generator: AnswerGenerator) -> TestServer {
        let config = Config::default();
        let store = DocumentStore::new(config.storage.base_dir.clone());
        let orchestrator =
            SessionOrchestrator::new(store, Arc::new(PdfTextExtractor), generator);
        let state = AppState::from_parts(config, orchestrator);
        TestServer::new(crate::routes::app(state)).unwrap()
    }

    #[tokio::test]
    async fn smoke_test_uses_fixture_pair() {
        let backend = Arc::new(MockBackend::answering("Blue."));
        let server =
            server_with_generator(AnswerGenerator::new(Some(backend.clone()), 4000));

        let response = server.post("/api/v1/debug/generate").await;
        response.assert_status_ok();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["answer"], "Blue.");
        assert_eq!(body["configured"], true);

        let prompt = backend.last_prompt().unwrap();
        assert!(prompt.contains(FIXTURE_TEXT));
        assert!(prompt.contains(FIXTURE_QUESTION));
    }

    #[tokio::test]
    async fn unconfigured_generator_degrades_gracefully() {
        let server = server_with_generator(AnswerGenerator::new(None, 4000));

        let response = server.post("/api/v1/debug/generate").await;
        response.assert_status_ok();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["configured"], false);
        assert_eq!(body["answer"], NOT_CONFIGURED_MESSAGE);
    }
}
