//! Answer Generator
//!
//! Composes a prompt from the cached document text and a question, calls
//! the generation backend, and always returns a usable answer string:
//! missing backend, unreadable document and request failures all map to
//! fixed fallback messages instead of errors.

use std::sync::Arc;

use super::cohere::GenerationBackend;
use super::context::build_context;

/// Section labels of the prompt template. Sent as stop sequences so the
/// model cannot hallucinate a follow-up Q&A pair.
pub const STOP_SEQUENCES: [&str; 2] = ["Documento:", "Pergunta:"];

/// Returned when no API key is configured
pub const NOT_CONFIGURED_MESSAGE: &str =
    "O serviço de geração de respostas não está configurado. Verifique a chave de API.";

/// Returned when the document yielded no readable text
pub const NO_CONTENT_MESSAGE: &str =
    "Não consegui ler o conteúdo do documento enviado, então não posso responder perguntas sobre ele.";

fn fallback_message(detail: &str) -> String {
    format!("Desculpe, ocorreu um erro ao gerar a resposta: {}", detail)
}

fn render_prompt(excerpt: &str, question: &str) -> String {
    format!(
        "Responda à pergunta usando apenas o trecho do documento abaixo. \
         Se a resposta não estiver no documento, diga que não encontrou a informação.\n\
         \n\
         Documento:\n\
         {}\n\
         \n\
         Pergunta: {}\n\
         \n\
         Resposta:",
        excerpt, question
    )
}

// ============================================================================
// Answer Generator
// ============================================================================

/// Generates one answer per question over an optional backend
#[derive(Clone)]
pub struct AnswerGenerator {
    backend: Option<Arc<dyn GenerationBackend>>,
    max_context_chars: usize,
}

impl AnswerGenerator {
    pub fn new(backend: Option<Arc<dyn GenerationBackend>>, max_context_chars: usize) -> Self {
        Self {
            backend,
            max_context_chars,
        }
    }

    /// Whether a generation backend is configured
    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// Generate an answer for `question` over `document_text`.
    ///
    /// Returns exactly one answer string per call. Never errors: failures
    /// become a fallback message embedding the error detail.
    pub async fn generate(&self, question: &str, document_text: &str) -> String {
        let Some(backend) = &self.backend else {
            return NOT_CONFIGURED_MESSAGE.to_string();
        };

        if document_text.trim().is_empty() {
            return NO_CONTENT_MESSAGE.to_string();
        }

        let excerpt = build_context(document_text, self.max_context_chars);
        let prompt = render_prompt(excerpt, question);

        match backend.generate(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!(error = %e, "Answer generation failed");
                fallback_message(&e.to_string())
            }
        }
    }
}

// ============================================================================
// Mock Backend (tests)
// ============================================================================

/// Mock backend recording every prompt it receives
#[cfg(test)]
#[derive(Default)]
pub struct MockBackend {
    pub answer: String,
    /// When set, every call fails with this detail
    pub fail_with: Option<String>,
    pub prompts: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockBackend {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            ..Default::default()
        }
    }

    pub fn failing(detail: &str) -> Self {
        Self {
            fail_with: Some(detail.to_string()),
            ..Default::default()
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl GenerationBackend for MockBackend {
    async fn generate(&self, prompt: &str) -> Result<String, super::types::GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.fail_with {
            Some(detail) => Err(super::types::GenerationError::Request(detail.clone())),
            None => Ok(self.answer.clone()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_backend_returns_fixed_message_without_calling_out() {
        let generator = AnswerGenerator::new(None, 4000);
        let answer = generator.generate("Qual é a cor do céu?", "some text").await;
        assert_eq!(answer, NOT_CONFIGURED_MESSAGE);
    }

    #[tokio::test]
    async fn blank_document_returns_no_content_message_without_calling_out() {
        let backend = Arc::new(MockBackend::answering("should not be used"));
        let generator = AnswerGenerator::new(Some(backend.clone()), 4000);

        for text in ["", "   ", "\n\t"] {
            let answer = generator.generate("Qualquer pergunta", text).await;
            assert_eq!(answer, NO_CONTENT_MESSAGE);
        }
        assert!(backend.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn prompt_embeds_excerpt_and_question() {
        let backend = Arc::new(MockBackend::answering("Azul."));
        let generator = AnswerGenerator::new(Some(backend.clone()), 4000);

        let document = "The sky is blue during the day.\n";
        let question = "What color is the sky?";
        let answer = generator.generate(question, document).await;

        assert_eq!(answer, "Azul.");
        assert!(!answer.is_empty());
        assert_ne!(answer, NOT_CONFIGURED_MESSAGE);
        assert_ne!(answer, NO_CONTENT_MESSAGE);

        let prompt = backend.last_prompt().unwrap();
        assert!(prompt.contains("The sky is blue during the day."));
        assert!(prompt.contains(question));
        assert!(prompt.contains("Documento:"));
        assert!(prompt.contains("Pergunta:"));
        assert!(prompt.ends_with("Resposta:"));
    }

    #[tokio::test]
    async fn document_is_truncated_before_prompting() {
        let backend = Arc::new(MockBackend::answering("ok"));
        let generator = AnswerGenerator::new(Some(backend.clone()), 100);

        let document = "z".repeat(500);
        generator.generate("pergunta", &document).await;

        let prompt = backend.last_prompt().unwrap();
        assert!(prompt.contains(&"z".repeat(100)));
        assert!(!prompt.contains(&"z".repeat(101)));
    }

    #[tokio::test]
    async fn backend_failure_becomes_fallback_message_with_detail() {
        let backend = Arc::new(MockBackend::failing("connection refused"));
        let generator = AnswerGenerator::new(Some(backend), 4000);

        let answer = generator.generate("pergunta", "document text").await;
        assert!(answer.starts_with("Desculpe"));
        assert!(answer.contains("connection refused"));
    }
}
