//! API request/response types.

use serde::{Deserialize, Serialize};

use crate::models::question::non_empty;
use crate::models::QuestionFields;

// ============================================================================
// Response envelope
// ============================================================================

/// Body of every successful response
#[derive(Serialize, Debug)]
pub struct ApiResponse<T: Serialize> {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Confirmation without a payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

/// Identifier of a freshly inserted row
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedId {
    pub id: i32,
}

// ============================================================================
// Health Check
// ============================================================================

/// Health check response
#[derive(Serialize, Clone)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub components: HealthComponents,
}

/// Health status of individual components
#[derive(Serialize, Clone)]
pub struct HealthComponents {
    pub database: bool,
    pub backend: String,
}

// ============================================================================
// Questions
// ============================================================================

/// Body of POST /questions and PUT /questions/:questionId
#[derive(Deserialize, Default, Debug)]
pub struct QuestionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl QuestionRequest {
    /// `None` if any field is missing or blank
    pub fn into_fields(self) -> Option<QuestionFields> {
        QuestionFields::new(self.title, self.description, self.category)
    }
}

// ============================================================================
// Answers
// ============================================================================

/// Body of POST /questions/:questionId/answers
#[derive(Deserialize, Default, Debug)]
pub struct AnswerRequest {
    pub content: Option<String>,
}

impl AnswerRequest {
    pub fn content(self) -> Option<String> {
        non_empty(self.content)
    }
}

/// Body of the legacy POST /comments. `question_id` may be a number or a
/// numeric string, as older clients send either.
#[derive(Deserialize, Default, Debug)]
pub struct CommentRequest {
    pub question_id: Option<serde_json::Value>,
    pub content: Option<String>,
}

// ============================================================================
// Votes
// ============================================================================

/// Body of the vote endpoints. Kept raw so any bad value maps to one error.
#[derive(Deserialize, Default, Debug)]
pub struct VoteRequest {
    pub vote: Option<serde_json::Value>,
}
