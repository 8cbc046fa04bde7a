pub mod question;
pub mod answer;
pub mod vote;

pub use question::{Question, QuestionFields};
pub use answer::Answer;
pub use vote::{AnswerVote, QuestionVote, Vote};
