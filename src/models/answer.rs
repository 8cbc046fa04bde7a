use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A response attached to a question. Legacy routes call it a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Answer {
    pub id: i32,
    pub question_id: i32,
    pub content: String,
}
