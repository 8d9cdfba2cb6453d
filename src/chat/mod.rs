//! Chat core
//!
//! - `types`: conversation turns, generation models and errors
//! - `context`: document excerpt truncation for prompts
//! - `generator`: answer generation over a pluggable backend
//! - `cohere`: hosted generation API client

pub mod cohere;
pub mod context;
pub mod generator;
pub mod types;

pub use cohere::{CohereClient, GenerationBackend};
pub use context::build_context;
pub use generator::AnswerGenerator;
pub use types::{ConversationTurn, GenerationError, GenerationModel, Role};
