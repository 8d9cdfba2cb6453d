//! Application state management

use std::sync::Arc;

use crate::chat::{AnswerGenerator, CohereClient, GenerationBackend};
use crate::config::Config;
use crate::extract::PdfTextExtractor;
use crate::session::{SessionOrchestrator, SessionRegistry};
use crate::storage::DocumentStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    registry: SessionRegistry,
    orchestrator: SessionOrchestrator,
}

impl AppState {
    /// Create the application state with the production document store,
    /// PDF extractor and hosted generation client.
    ///
    /// A missing API key is not fatal: the generator degrades to a fixed
    /// message and the rest of the application keeps working.
    pub fn new(config: Config) -> Self {
        let store = DocumentStore::new(config.storage.base_dir.clone());

        let backend = CohereClient::from_config(&config.generation)
            .map(|client| Arc::new(client) as Arc<dyn GenerationBackend>);
        if backend.is_none() {
            tracing::warn!(
                "No generation API key configured; answers will be a fixed notice"
            );
        }

        let generator = AnswerGenerator::new(backend, config.generation.max_context_chars);
        let orchestrator =
            SessionOrchestrator::new(store, Arc::new(PdfTextExtractor), generator);

        Self::from_parts(config, orchestrator)
    }

    /// Assemble state from pre-built parts. Lets tests swap in mock
    /// extractors and generation backends.
    pub fn from_parts(config: Config, orchestrator: SessionOrchestrator) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                registry: SessionRegistry::new(),
                orchestrator,
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.inner.registry
    }

    pub fn orchestrator(&self) -> &SessionOrchestrator {
        &self.inner.orchestrator
    }

    /// Remove every stored document before the process exits
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down application state...");
        self.inner.orchestrator.store().cleanup().await;
    }
}
