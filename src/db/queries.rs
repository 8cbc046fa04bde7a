use async_trait::async_trait;

use super::connection::{self, DatabaseConnection};
use super::store::{ForumStore, StoreResult};
use crate::models::{Answer, AnswerVote, Question, QuestionFields, QuestionVote, Vote};

/// PostgreSQL-backed store. Every operation is one parameterized statement.
#[derive(Clone)]
pub struct PgStore {
    pool: DatabaseConnection,
}

impl PgStore {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }
}

// One vote slot per target, enforced by the primary key on the target id.
// A first vote creates the slot; later votes overwrite it.
const UPSERT_QUESTION_VOTE: &str = r#"
    INSERT INTO question_votes (question_id, vote)
    VALUES ($1, $2)
    ON CONFLICT (question_id) DO UPDATE SET vote = EXCLUDED.vote
    RETURNING question_id, vote
"#;

const UPSERT_ANSWER_VOTE: &str = r#"
    INSERT INTO answer_votes (answer_id, vote)
    VALUES ($1, $2)
    ON CONFLICT (answer_id) DO UPDATE SET vote = EXCLUDED.vote
    RETURNING answer_id, vote
"#;

#[async_trait]
impl ForumStore for PgStore {
    async fn create_question(&self, fields: &QuestionFields) -> StoreResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO questions (title, description, category) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(fields.title.as_str())
        .bind(fields.description.as_str())
        .bind(fields.category.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_questions(&self) -> StoreResult<Vec<Question>> {
        let rows = sqlx::query_as::<_, Question>(
            "SELECT id, title, description, category FROM questions ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get_question(&self, id: i32) -> StoreResult<Option<Question>> {
        let row = sqlx::query_as::<_, Question>(
            "SELECT id, title, description, category FROM questions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_question(&self, id: i32, fields: &QuestionFields) -> StoreResult<Option<Question>> {
        let row = sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET title = $1, description = $2, category = $3
            WHERE id = $4
            RETURNING id, title, description, category
            "#,
        )
        .bind(fields.title.as_str())
        .bind(fields.description.as_str())
        .bind(fields.category.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete_question(&self, id: i32) -> StoreResult<Option<Question>> {
        let row = sqlx::query_as::<_, Question>(
            "DELETE FROM questions WHERE id = $1 RETURNING id, title, description, category",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn question_exists(&self, id: i32) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM questions WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create_answer(&self, question_id: i32, content: &str) -> StoreResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO answers (question_id, content) VALUES ($1, $2) RETURNING id",
        )
        .bind(question_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_answers(&self, question_id: i32) -> StoreResult<Vec<Answer>> {
        let rows = sqlx::query_as::<_, Answer>(
            "SELECT id, question_id, content FROM answers WHERE question_id = $1 ORDER BY id",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn delete_answers(&self, question_id: i32) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM answers WHERE question_id = $1")
            .bind(question_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn list_all_answers(&self) -> StoreResult<Vec<Answer>> {
        let rows = sqlx::query_as::<_, Answer>(
            "SELECT id, question_id, content FROM answers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get_answer(&self, id: i32) -> StoreResult<Option<Answer>> {
        let row = sqlx::query_as::<_, Answer>(
            "SELECT id, question_id, content FROM answers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete_answer(&self, id: i32) -> StoreResult<Option<Answer>> {
        let row = sqlx::query_as::<_, Answer>(
            "DELETE FROM answers WHERE id = $1 RETURNING id, question_id, content",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn answer_exists(&self, id: i32) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM answers WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn vote_question(&self, question_id: i32, vote: Vote) -> StoreResult<QuestionVote> {
        let row = sqlx::query_as::<_, QuestionVote>(UPSERT_QUESTION_VOTE)
            .bind(question_id)
            .bind(vote.value())
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    async fn vote_answer(&self, answer_id: i32, vote: Vote) -> StoreResult<AnswerVote> {
        let row = sqlx::query_as::<_, AnswerVote>(UPSERT_ANSWER_VOTE)
            .bind(answer_id)
            .bind(vote.value())
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    async fn health_check(&self) -> bool {
        connection::check_connection(&self.pool).await
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    fn backend_name(&self) -> &str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::{connect_db, DbConfig};

    async fn test_store() -> PgStore {
        dotenv::dotenv().ok();
        let config = DbConfig::from_env().unwrap();
        PgStore::new(connect_db(&config).await.unwrap())
    }

    fn fields(title: &str) -> QuestionFields {
        QuestionFields::new(
            Some(title.to_string()),
            Some("description".to_string()),
            Some("general".to_string()),
        )
        .unwrap()
    }

    #[tokio::test]
    #[ignore]
    async fn test_question_lifecycle() {
        let store = test_store().await;

        let id = store.create_question(&fields("lifecycle")).await.unwrap();
        assert_eq!(store.get_question(id).await.unwrap().unwrap().title, "lifecycle");

        let updated = store.update_question(id, &fields("renamed")).await.unwrap().unwrap();
        assert_eq!(updated.title, "renamed");

        assert!(store.delete_question(id).await.unwrap().is_some());
        assert!(store.delete_question(id).await.unwrap().is_none());
        assert!(!store.question_exists(id).await.unwrap());
    }

    #[tokio::test]
    #[ignore]
    async fn test_vote_slot_is_overwritten() {
        let store = test_store().await;
        let id = store.create_question(&fields("votes")).await.unwrap();

        let first = store.vote_question(id, Vote::Up).await.unwrap();
        assert_eq!(first.vote, 1);
        let second = store.vote_question(id, Vote::Down).await.unwrap();
        assert_eq!(second, QuestionVote { question_id: id, vote: -1 });

        store.delete_question(id).await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn test_concurrent_first_votes_share_one_slot() {
        let store = test_store().await;
        let id = store.create_question(&fields("racing votes")).await.unwrap();

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..16 {
            let store = store.clone();
            let vote = if i % 2 == 0 { Vote::Up } else { Vote::Down };
            tasks.spawn(async move { store.vote_question(id, vote).await });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap().unwrap();
        }

        let slots = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM question_votes WHERE question_id = $1",
        )
        .bind(id)
        .fetch_one(&store.pool)
        .await
        .unwrap();
        assert_eq!(slots, 1);

        store.delete_question(id).await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn test_answer_for_missing_question_violates_constraint() {
        let store = test_store().await;
        let err = store.create_answer(i32::MAX, "orphan").await.unwrap_err();
        assert_eq!(err.kind(), "constraint");
    }
}
