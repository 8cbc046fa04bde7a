use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Top-level forum post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Question {
    /// Generated by the store on insert
    pub id: i32,

    pub title: String,

    pub description: String,

    pub category: String,
}

/// Validated field set used to create or overwrite a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionFields {
    pub title: String,
    pub description: String,
    pub category: String,
}

impl QuestionFields {
    /// Builds the field set, rejecting any field that is absent or blank
    pub fn new(
        title: Option<String>,
        description: Option<String>,
        category: Option<String>,
    ) -> Option<Self> {
        Some(Self {
            title: non_empty(title)?,
            description: non_empty(description)?,
            category: non_empty(category)?,
        })
    }

    /// Materializes the row the store would hold for `id`
    pub fn into_question(self, id: i32) -> Question {
        Question {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
        }
    }
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_fields_accept_complete_input() {
        let fields = QuestionFields::new(some("T"), some("D"), some("C")).unwrap();
        assert_eq!(fields.title, "T");
        assert_eq!(fields.into_question(7).id, 7);
    }

    #[test]
    fn test_fields_reject_missing_or_blank() {
        assert!(QuestionFields::new(None, some("D"), some("C")).is_none());
        assert!(QuestionFields::new(some("T"), some(""), some("C")).is_none());
        assert!(QuestionFields::new(some("T"), some("D"), some("   ")).is_none());
    }
}
