//! API request handlers.
//!
//! Every handler validates its input before touching the store, then issues
//! one store call (two when a parent must exist first) and shapes the reply.
//! Parent checks and the writes that follow them are separate round trips.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use crate::db::ForumStore;
use crate::models::{Answer, AnswerVote, Question, QuestionVote, Vote};

use super::error::{ApiError, ApiResult};
use super::types::*;

const QUESTION_NOT_FOUND: &str = "Question not found.";
const ANSWER_NOT_FOUND: &str = "Answer not found.";
const NO_ANSWERS: &str = "No answers found for this question.";

/// Application state shared across handlers
pub struct AppState {
    /// Store backend, opened before the server starts and closed after it stops
    pub store: Arc<dyn ForumStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ForumStore>) -> Self {
        Self { store }
    }
}

/// Thread-safe shared state
pub type SharedState = Arc<AppState>;

type Created<T> = (StatusCode, Json<ApiResponse<T>>);

/// Parses a numeric id.
///
/// Anything other than an optionally signed run of digits is invalid input.
/// A well-formed number outside the `i32` range cannot name a stored row, so
/// it is reported as `missing` without asking the store.
fn parse_id(raw: &str, missing: &str) -> ApiResult<i32> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        debug!("Rejected non-numeric id: {:?}", raw);
        return Err(ApiError::invalid_request());
    }
    raw.parse::<i32>().map_err(|_| {
        debug!("Id out of range: {}", raw);
        ApiError::not_found(missing)
    })
}

/// Parses an id sent in a JSON body, as a number or a numeric string
fn id_from_json(value: &serde_json::Value, missing: &str) -> ApiResult<i32> {
    match value {
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => parse_id(&n.to_string(), missing),
        serde_json::Value::String(s) => parse_id(s.trim(), missing),
        _ => Err(ApiError::invalid_request()),
    }
}

// ============================================================================
// Health Check Handler
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<SharedState>) -> Json<HealthResponse> {
    let db_healthy = state.store.health_check().await;

    Json(HealthResponse {
        status: if db_healthy { "healthy" } else { "unhealthy" }.to_string(),
        service: "qaforum".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        components: HealthComponents {
            database: db_healthy,
            backend: state.store.backend_name().to_string(),
        },
    })
}

// ============================================================================
// Question Handlers
// ============================================================================

/// POST /questions
pub async fn create_question(
    State(state): State<SharedState>,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> ApiResult<Created<CreatedId>> {
    let Json(request) = payload?;
    let fields = request.into_fields().ok_or_else(ApiError::invalid_request)?;

    let id = state
        .store
        .create_question(&fields)
        .await
        .map_err(ApiError::store("Unable to create question."))?;

    info!("Created question {}", id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data("Question created successfully.", CreatedId { id })),
    ))
}

/// GET /questions
pub async fn list_questions(
    State(state): State<SharedState>,
) -> ApiResult<Json<ApiResponse<Vec<Question>>>> {
    let questions = state
        .store
        .list_questions()
        .await
        .map_err(ApiError::store("Unable to fetch questions."))?;

    Ok(Json(ApiResponse::with_data("Successfully retrieved questions.", questions)))
}

/// GET /questions/:questionId
pub async fn get_question(
    State(state): State<SharedState>,
    Path(question_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Question>>> {
    let question_id = parse_id(&question_id, QUESTION_NOT_FOUND)?;

    let question = state
        .store
        .get_question(question_id)
        .await
        .map_err(ApiError::store("Unable to fetch question."))?
        .ok_or_else(|| ApiError::not_found(QUESTION_NOT_FOUND))?;

    Ok(Json(ApiResponse::with_data("Successfully retrieved the question.", question)))
}

/// PUT /questions/:questionId
pub async fn update_question(
    State(state): State<SharedState>,
    Path(question_id): Path<String>,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<Question>>> {
    let Json(request) = payload?;
    let fields = request.into_fields().ok_or_else(ApiError::invalid_request)?;
    let question_id = parse_id(&question_id, QUESTION_NOT_FOUND)?;

    let question = state
        .store
        .update_question(question_id, &fields)
        .await
        .map_err(ApiError::store("Unable to update question."))?
        .ok_or_else(|| ApiError::not_found(QUESTION_NOT_FOUND))?;

    info!("Updated question {}", question_id);

    Ok(Json(ApiResponse::with_data("Question updated successfully.", question)))
}

/// DELETE /questions/:questionId
pub async fn delete_question(
    State(state): State<SharedState>,
    Path(question_id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let question_id = parse_id(&question_id, QUESTION_NOT_FOUND)?;

    state
        .store
        .delete_question(question_id)
        .await
        .map_err(ApiError::store("Unable to delete question."))?
        .ok_or_else(|| ApiError::not_found(QUESTION_NOT_FOUND))?;

    info!("Deleted question {}", question_id);

    Ok(Json(ApiResponse::message("Question post has been deleted successfully.")))
}

// ============================================================================
// Answer Handlers
// ============================================================================

/// POST /questions/:questionId/answers
pub async fn create_answer(
    State(state): State<SharedState>,
    Path(question_id): Path<String>,
    payload: Result<Json<AnswerRequest>, JsonRejection>,
) -> ApiResult<Created<CreatedId>> {
    let Json(request) = payload?;
    let content = request.content().ok_or_else(ApiError::invalid_request)?;
    let question_id = parse_id(&question_id, QUESTION_NOT_FOUND)?;

    let exists = state
        .store
        .question_exists(question_id)
        .await
        .map_err(ApiError::store("Unable to create answer."))?;
    if !exists {
        return Err(ApiError::not_found(QUESTION_NOT_FOUND));
    }

    let id = state
        .store
        .create_answer(question_id, &content)
        .await
        .map_err(ApiError::store("Unable to create answer."))?;

    info!("Created answer {} for question {}", id, question_id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data("Answer created successfully.", CreatedId { id })),
    ))
}

/// GET /questions/:questionId/answers
///
/// A question without answers is reported as 404, not as an empty list.
pub async fn list_answers(
    State(state): State<SharedState>,
    Path(question_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<Answer>>>> {
    let question_id = parse_id(&question_id, NO_ANSWERS)?;

    let answers = state
        .store
        .list_answers(question_id)
        .await
        .map_err(ApiError::store("Unable to fetch answers."))?;

    if answers.is_empty() {
        return Err(ApiError::not_found(NO_ANSWERS));
    }

    Ok(Json(ApiResponse::with_data("Successfully retrieved answers.", answers)))
}

/// DELETE /questions/:questionId/answers
pub async fn delete_answers(
    State(state): State<SharedState>,
    Path(question_id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let question_id = parse_id(&question_id, NO_ANSWERS)?;

    let deleted = state
        .store
        .delete_answers(question_id)
        .await
        .map_err(ApiError::store("Unable to delete answers."))?;

    if deleted == 0 {
        return Err(ApiError::not_found(NO_ANSWERS));
    }

    info!("Deleted {} answers of question {}", deleted, question_id);

    Ok(Json(ApiResponse::message(
        "All answers for the question have been deleted successfully.",
    )))
}

// ============================================================================
// Vote Handlers
// ============================================================================

fn parse_vote(payload: Result<Json<VoteRequest>, JsonRejection>) -> ApiResult<Vote> {
    let Json(request) = payload.map_err(|_| ApiError::invalid_vote())?;
    request
        .vote
        .as_ref()
        .and_then(Vote::from_json)
        .ok_or_else(ApiError::invalid_vote)
}

/// POST /questions/:questionId/vote
pub async fn vote_question(
    State(state): State<SharedState>,
    Path(question_id): Path<String>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<QuestionVote>>> {
    let vote = parse_vote(payload)?;
    let question_id = parse_id(&question_id, QUESTION_NOT_FOUND)?;

    let exists = state
        .store
        .question_exists(question_id)
        .await
        .map_err(ApiError::store("Unable to vote question."))?;
    if !exists {
        return Err(ApiError::not_found(QUESTION_NOT_FOUND));
    }

    let recorded = state
        .store
        .vote_question(question_id, vote)
        .await
        .map_err(ApiError::store("Unable to vote question."))?;

    debug!("Question {} vote set to {}", question_id, recorded.vote);

    Ok(Json(ApiResponse::with_data(
        "Vote on the question has been recorded successfully.",
        recorded,
    )))
}

/// POST /answers/:answerId/vote
pub async fn vote_answer(
    State(state): State<SharedState>,
    Path(answer_id): Path<String>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<AnswerVote>>> {
    let vote = parse_vote(payload)?;
    let answer_id = parse_id(&answer_id, ANSWER_NOT_FOUND)?;

    let exists = state
        .store
        .answer_exists(answer_id)
        .await
        .map_err(ApiError::store("Unable to vote answer."))?;
    if !exists {
        return Err(ApiError::not_found(ANSWER_NOT_FOUND));
    }

    let recorded = state
        .store
        .vote_answer(answer_id, vote)
        .await
        .map_err(ApiError::store("Unable to vote answer."))?;

    debug!("Answer {} vote set to {}", answer_id, recorded.vote);

    Ok(Json(ApiResponse::with_data(
        "Vote on the answer has been recorded successfully.",
        recorded,
    )))
}

// ============================================================================
// Legacy Comment Handlers
// ============================================================================

/// POST /comments
///
/// Older alias for answer creation. The parent question is not checked here;
/// a dangling `question_id` surfaces as a store constraint failure.
pub async fn create_comment(
    State(state): State<SharedState>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> ApiResult<Created<CreatedId>> {
    let Json(request) = payload?;
    let content = AnswerRequest { content: request.content }
        .content()
        .ok_or_else(ApiError::invalid_request)?;
    let question_id = request
        .question_id
        .as_ref()
        .ok_or_else(ApiError::invalid_request)
        .and_then(|value| id_from_json(value, QUESTION_NOT_FOUND))?;

    let id = state
        .store
        .create_answer(question_id, &content)
        .await
        .map_err(ApiError::store("Unable to create comment."))?;

    info!("Created comment {} for question {}", id, question_id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data("Comment created successfully.", CreatedId { id })),
    ))
}

/// GET /comments
pub async fn list_comments(
    State(state): State<SharedState>,
) -> ApiResult<Json<ApiResponse<Vec<Answer>>>> {
    let answers = state
        .store
        .list_all_answers()
        .await
        .map_err(ApiError::store("Unable to fetch comments."))?;

    Ok(Json(ApiResponse::with_data("Successfully retrieved comments.", answers)))
}

/// GET /comments/:id
pub async fn get_comment(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Answer>>> {
    let id = parse_id(&id, ANSWER_NOT_FOUND)?;

    let answer = state
        .store
        .get_answer(id)
        .await
        .map_err(ApiError::store("Unable to fetch comment."))?
        .ok_or_else(|| ApiError::not_found(ANSWER_NOT_FOUND))?;

    Ok(Json(ApiResponse::with_data("Successfully retrieved the comment.", answer)))
}

/// DELETE /comments/:id
pub async fn delete_comment(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let id = parse_id(&id, ANSWER_NOT_FOUND)?;

    let answer = state
        .store
        .delete_answer(id)
        .await
        .map_err(ApiError::store("Unable to delete comment."))?
        .ok_or_else(|| ApiError::not_found(ANSWER_NOT_FOUND))?;

    info!("Deleted comment {}", answer.id);

    Ok(Json(ApiResponse::message(format!(
        "Comment id: {} has been deleted successfully.",
        answer.id
    ))))
}

/// Fallback for unknown routes
pub async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", QUESTION_NOT_FOUND).unwrap(), 42);
        assert_eq!(parse_id("-3", QUESTION_NOT_FOUND).unwrap(), -3);

        for raw in ["abc", "4.2", "", "-", "+5", " 7", "12a"] {
            let err = parse_id(raw, QUESTION_NOT_FOUND).unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{:?}", raw);
        }
    }

    #[test]
    fn test_parse_id_out_of_range_is_not_found() {
        for raw in ["3000000000", "-3000000000", "123456789012345678901234567890"] {
            let err = parse_id(raw, ANSWER_NOT_FOUND).unwrap_err();
            assert_eq!(err.status(), StatusCode::NOT_FOUND, "{:?}", raw);
            assert_eq!(err.to_string(), ANSWER_NOT_FOUND);
        }
    }

    #[test]
    fn test_id_from_json() {
        use serde_json::json;

        assert_eq!(id_from_json(&json!(5), QUESTION_NOT_FOUND).unwrap(), 5);
        assert_eq!(id_from_json(&json!("5"), QUESTION_NOT_FOUND).unwrap(), 5);
        assert_eq!(
            id_from_json(&json!(3000000000u64), QUESTION_NOT_FOUND).unwrap_err().status(),
            StatusCode::NOT_FOUND
        );
        for bad in [json!(5.5), json!("five"), json!(null), json!([5])] {
            let err = id_from_json(&bad, QUESTION_NOT_FOUND).unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{}", bad);
        }
    }
}
