//! Store abstraction the request handlers are written against.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Answer, AnswerVote, Question, QuestionFields, QuestionVote, Vote};

/// Failures reported by a store backend.
///
/// All variants surface to clients the same way; the split exists for logs.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A constraint (foreign key, check, unique) rejected the statement
    #[error("{0}")]
    Constraint(String),

    /// The backend could not be reached or the pool is exhausted/closed
    #[error("{0}")]
    Unavailable(String),

    /// Any other query failure
    #[error("{0}")]
    Query(String),
}

impl StoreError {
    /// Short label used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Constraint(_) => "constraint",
            StoreError::Unavailable(_) => "unavailable",
            StoreError::Query(_) => "query",
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.constraint().is_some() => {
                StoreError::Constraint(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) => StoreError::Query(db_err.message().to_string()),
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Unavailable(err.to_string())
            }
            _ => StoreError::Query(err.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Data access for questions, answers and votes.
///
/// Each method maps to one statement against the store. Existence checks are
/// separate calls, so a parent may disappear between a check and the write
/// that follows it.
#[async_trait]
pub trait ForumStore: Send + Sync {
    /// Inserts a question and returns its generated id
    async fn create_question(&self, fields: &QuestionFields) -> StoreResult<i32>;

    async fn list_questions(&self) -> StoreResult<Vec<Question>>;

    async fn get_question(&self, id: i32) -> StoreResult<Option<Question>>;

    /// Overwrites all fields; `None` when no row has this id
    async fn update_question(&self, id: i32, fields: &QuestionFields) -> StoreResult<Option<Question>>;

    /// Deletes and returns the row; `None` when no row has this id
    async fn delete_question(&self, id: i32) -> StoreResult<Option<Question>>;

    async fn question_exists(&self, id: i32) -> StoreResult<bool>;

    /// Inserts an answer and returns its generated id
    async fn create_answer(&self, question_id: i32, content: &str) -> StoreResult<i32>;

    async fn list_answers(&self, question_id: i32) -> StoreResult<Vec<Answer>>;

    /// Deletes every answer of a question and returns how many went away
    async fn delete_answers(&self, question_id: i32) -> StoreResult<u64>;

    async fn list_all_answers(&self) -> StoreResult<Vec<Answer>>;

    async fn get_answer(&self, id: i32) -> StoreResult<Option<Answer>>;

    async fn delete_answer(&self, id: i32) -> StoreResult<Option<Answer>>;

    async fn answer_exists(&self, id: i32) -> StoreResult<bool>;

    /// Sets the vote slot of a question, creating it if absent
    async fn vote_question(&self, question_id: i32, vote: Vote) -> StoreResult<QuestionVote>;

    /// Sets the vote slot of an answer, creating it if absent
    async fn vote_answer(&self, answer_id: i32, vote: Vote) -> StoreResult<AnswerVote>;

    /// Checks if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Releases backend resources. Called once on shutdown.
    async fn close(&self);

    /// Backend name for logging
    fn backend_name(&self) -> &str;
}
