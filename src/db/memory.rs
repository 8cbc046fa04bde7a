//! In-process store for tests and local runs without PostgreSQL.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::{ForumStore, StoreError, StoreResult};
use crate::models::{Answer, AnswerVote, Question, QuestionFields, QuestionVote, Vote};

#[derive(Default)]
struct Tables {
    questions: BTreeMap<i32, Question>,
    answers: BTreeMap<i32, Answer>,
    question_votes: BTreeMap<i32, i32>,
    answer_votes: BTreeMap<i32, i32>,
    next_question_id: i32,
    next_answer_id: i32,
}

impl Tables {
    fn remove_answers_where(&mut self, keep: impl Fn(&Answer) -> bool) -> u64 {
        let before = self.answers.len();
        let mut removed = Vec::new();
        self.answers.retain(|id, answer| {
            let retain = keep(answer);
            if !retain {
                removed.push(*id);
            }
            retain
        });
        for id in removed {
            self.answer_votes.remove(&id);
        }
        (before - self.answers.len()) as u64
    }
}

/// Store kept in memory.
///
/// Mirrors the reference schema: ids start at 1 and are never reused,
/// answers need an existing question, and deleting a question removes its
/// answers and votes.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    failing: AtomicBool,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail, or restores normal behavior
    pub fn set_failing(&self, fail: bool) {
        self.failing.store(fail, Ordering::SeqCst);
    }

    /// Builder form of [`MemoryStore::set_failing`]
    pub fn should_fail(self, fail: bool) -> Self {
        self.set_failing(fail);
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn check(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is closed".to_string()));
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ForumStore for MemoryStore {
    async fn create_question(&self, fields: &QuestionFields) -> StoreResult<i32> {
        self.check()?;
        let mut tables = self.tables.write().await;
        tables.next_question_id += 1;
        let id = tables.next_question_id;
        tables.questions.insert(id, fields.clone().into_question(id));
        Ok(id)
    }

    async fn list_questions(&self) -> StoreResult<Vec<Question>> {
        self.check()?;
        Ok(self.tables.read().await.questions.values().cloned().collect())
    }

    async fn get_question(&self, id: i32) -> StoreResult<Option<Question>> {
        self.check()?;
        Ok(self.tables.read().await.questions.get(&id).cloned())
    }

    async fn update_question(&self, id: i32, fields: &QuestionFields) -> StoreResult<Option<Question>> {
        self.check()?;
        let mut tables = self.tables.write().await;
        Ok(tables.questions.get_mut(&id).map(|question| {
            *question = fields.clone().into_question(id);
            question.clone()
        }))
    }

    async fn delete_question(&self, id: i32) -> StoreResult<Option<Question>> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let removed = tables.questions.remove(&id);
        if removed.is_some() {
            tables.question_votes.remove(&id);
            tables.remove_answers_where(|a| a.question_id != id);
        }
        Ok(removed)
    }

    async fn question_exists(&self, id: i32) -> StoreResult<bool> {
        self.check()?;
        Ok(self.tables.read().await.questions.contains_key(&id))
    }

    async fn create_answer(&self, question_id: i32, content: &str) -> StoreResult<i32> {
        self.check()?;
        let mut tables = self.tables.write().await;
        if !tables.questions.contains_key(&question_id) {
            return Err(StoreError::Constraint(format!(
                "insert on table \"answers\" violates foreign key constraint: question_id={} is not present in table \"questions\"",
                question_id
            )));
        }
        tables.next_answer_id += 1;
        let id = tables.next_answer_id;
        tables.answers.insert(
            id,
            Answer {
                id,
                question_id,
                content: content.to_string(),
            },
        );
        Ok(id)
    }

    async fn list_answers(&self, question_id: i32) -> StoreResult<Vec<Answer>> {
        self.check()?;
        Ok(self
            .tables
            .read()
            .await
            .answers
            .values()
            .filter(|a| a.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn delete_answers(&self, question_id: i32) -> StoreResult<u64> {
        self.check()?;
        let mut tables = self.tables.write().await;
        Ok(tables.remove_answers_where(|a| a.question_id != question_id))
    }

    async fn list_all_answers(&self) -> StoreResult<Vec<Answer>> {
        self.check()?;
        Ok(self.tables.read().await.answers.values().cloned().collect())
    }

    async fn get_answer(&self, id: i32) -> StoreResult<Option<Answer>> {
        self.check()?;
        Ok(self.tables.read().await.answers.get(&id).cloned())
    }

    async fn delete_answer(&self, id: i32) -> StoreResult<Option<Answer>> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let removed = tables.answers.remove(&id);
        if removed.is_some() {
            tables.answer_votes.remove(&id);
        }
        Ok(removed)
    }

    async fn answer_exists(&self, id: i32) -> StoreResult<bool> {
        self.check()?;
        Ok(self.tables.read().await.answers.contains_key(&id))
    }

    async fn vote_question(&self, question_id: i32, vote: Vote) -> StoreResult<QuestionVote> {
        self.check()?;
        let mut tables = self.tables.write().await;
        if !tables.questions.contains_key(&question_id) {
            return Err(StoreError::Constraint(format!(
                "question_id={} is not present in table \"questions\"",
                question_id
            )));
        }
        tables.question_votes.insert(question_id, vote.value());
        Ok(QuestionVote {
            question_id,
            vote: vote.value(),
        })
    }

    async fn vote_answer(&self, answer_id: i32, vote: Vote) -> StoreResult<AnswerVote> {
        self.check()?;
        let mut tables = self.tables.write().await;
        if !tables.answers.contains_key(&answer_id) {
            return Err(StoreError::Constraint(format!(
                "answer_id={} is not present in table \"answers\"",
                answer_id
            )));
        }
        tables.answer_votes.insert(answer_id, vote.value());
        Ok(AnswerVote {
            answer_id,
            vote: vote.value(),
        })
    }

    async fn health_check(&self) -> bool {
        self.check().is_ok()
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
