//! Q&A forum: questions, answers and votes over a relational store.
//!
//! This module exposes the library's public API.

pub mod api;
pub mod config;
pub mod db;
pub mod models;

// Re-export main types
pub use api::{create_router, AppState, SharedState};
pub use config::{ServerConfig, StoreBackend};
pub use db::{ForumStore, MemoryStore, PgStore, StoreError};
pub use models::{Answer, AnswerVote, Question, QuestionFields, QuestionVote, Vote};
