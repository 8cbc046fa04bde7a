//! API module for the Q&A forum.
//!
//! This module provides the HTTP REST API built with Axum:
//! - `/health` - Health check endpoint
//! - `/questions` - Create, list, read, update and delete questions
//! - `/questions/:questionId/answers` - Answers of a question
//! - `/questions/:questionId/vote`, `/answers/:answerId/vote` - Votes
//! - `/comments` - Legacy answer routes

pub mod error;
pub mod handlers;
pub mod routes;
pub mod types;

// Re-exports
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use handlers::{AppState, SharedState};
pub use routes::{create_router, print_routes};
pub use types::*;
