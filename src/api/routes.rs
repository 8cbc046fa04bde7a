//! API route definitions.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, SharedState};

/// Creates the API router with all routes configured
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .merge(question_routes())
        .merge(comment_routes())
        .fallback(handlers::route_not_found)
        .with_state(state)
}

/// Questions, their answers and votes
fn question_routes() -> Router<SharedState> {
    Router::new()
        .route(
            "/questions",
            post(handlers::create_question).get(handlers::list_questions),
        )
        .route(
            "/questions/:questionId",
            get(handlers::get_question)
                .put(handlers::update_question)
                .delete(handlers::delete_question),
        )
        .route(
            "/questions/:questionId/answers",
            post(handlers::create_answer)
                .get(handlers::list_answers)
                .delete(handlers::delete_answers),
        )
        .route("/questions/:questionId/vote", post(handlers::vote_question))
        .route("/answers/:answerId/vote", post(handlers::vote_answer))
}

/// Legacy comment routes, operating on the answers table
fn comment_routes() -> Router<SharedState> {
    Router::new()
        .route(
            "/comments",
            post(handlers::create_comment).get(handlers::list_comments),
        )
        .route(
            "/comments/:id",
            get(handlers::get_comment).delete(handlers::delete_comment),
        )
}

/// Prints all available routes for logging
pub fn print_routes() {
    tracing::info!("Available API routes:");
    tracing::info!("  GET    /health                        - Health check");
    tracing::info!("  POST   /questions                     - Create a question");
    tracing::info!("  GET    /questions                     - List questions");
    tracing::info!("  GET    /questions/:questionId         - Get a question");
    tracing::info!("  PUT    /questions/:questionId         - Update a question");
    tracing::info!("  DELETE /questions/:questionId         - Delete a question");
    tracing::info!("  POST   /questions/:questionId/answers - Answer a question");
    tracing::info!("  GET    /questions/:questionId/answers - List answers of a question");
    tracing::info!("  DELETE /questions/:questionId/answers - Delete answers of a question");
    tracing::info!("  POST   /questions/:questionId/vote    - Vote on a question");
    tracing::info!("  POST   /answers/:answerId/vote        - Vote on an answer");
    tracing::info!("Legacy comment routes:");
    tracing::info!("  POST   /comments                      - Create a comment");
    tracing::info!("  GET    /comments                      - List comments");
    tracing::info!("  GET    /comments/:id                  - Get a comment");
    tracing::info!("  DELETE /comments/:id                  - Delete a comment");
}
