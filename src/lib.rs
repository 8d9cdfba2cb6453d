//! Document Chat Server Library
//!
//! Core of a PDF question-answering chat service: upload a document,
//! extract its text, ask questions answered by a hosted generation API
//! over the extracted text.
//!
//! # Modules
//!
//! - `storage`: temporary document store (one active file per session)
//! - `extract`: PDF text extraction
//! - `chat`: context truncation, prompt composition, answer generation
//! - `session`: conversation state machine and trigger orchestration
//! - `routes`: HTTP surface

pub mod chat;
pub mod config;
pub mod extract;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;
