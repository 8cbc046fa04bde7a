use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A signed unit vote. Only +1 and -1 exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    /// Numeric value as stored in the vote tables
    pub fn value(self) -> i32 {
        match self {
            Vote::Up => 1,
            Vote::Down => -1,
        }
    }

    /// Parses a raw JSON vote. Any number equal to 1 or -1 (`1.0` included)
    /// is accepted; strings, other numbers and non-numbers are rejected.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value.as_f64()? {
            v if v == 1.0 => Some(Vote::Up),
            v if v == -1.0 => Some(Vote::Down),
            _ => None,
        }
    }
}

/// The single vote slot held for a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct QuestionVote {
    pub question_id: i32,
    pub vote: i32,
}

/// The single vote slot held for an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AnswerVote {
    pub answer_id: i32,
    pub vote: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vote_accepts_unit_values() {
        assert_eq!(Vote::from_json(&json!(1)), Some(Vote::Up));
        assert_eq!(Vote::from_json(&json!(-1)), Some(Vote::Down));
        assert_eq!(Vote::Down.value(), -1);
    }

    #[test]
    fn test_vote_rejects_everything_else() {
        for raw in [json!(0), json!(2), json!(-2), json!("1"), json!(1.5), json!(null), json!(true)] {
            assert_eq!(Vote::from_json(&raw), None, "accepted {}", raw);
        }
    }

    #[test]
    fn test_vote_accepts_integral_floats() {
        assert_eq!(Vote::from_json(&json!(1.0)), Some(Vote::Up));
        assert_eq!(Vote::from_json(&json!(-1.0)), Some(Vote::Down));
        assert_eq!(Vote::from_json(&json!(0.999)), None);
    }
}
