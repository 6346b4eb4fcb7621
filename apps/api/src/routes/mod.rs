pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::guidance::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Guidance use cases
        .route("/api/v1/guidance/chat", post(handlers::handle_chat))
        .route("/api/v1/guidance/quiz", post(handlers::handle_quiz))
        .route("/api/v1/guidance/colleges", post(handlers::handle_colleges))
        .route(
            "/api/v1/guidance/career-insight",
            post(handlers::handle_career_insight),
        )
        .route("/api/v1/guidance/alerts", post(handlers::handle_alerts))
        .route(
            "/api/v1/guidance/study-plan",
            post(handlers::handle_study_plan),
        )
        .route("/api/v1/guidance/careers", post(handlers::handle_careers))
        .route("/api/v1/guidance/skills", post(handlers::handle_skills))
        .route(
            "/api/v1/guidance/course-scores",
            post(handlers::handle_course_scores),
        )
        .route(
            "/api/v1/guidance/dashboard",
            post(handlers::handle_dashboard),
        )
        // Cache + catalog
        .route("/api/v1/cache", delete(handlers::handle_clear_cache))
        .route(
            "/api/v1/catalog/streams",
            get(handlers::handle_list_streams),
        )
        .with_state(state)
}
