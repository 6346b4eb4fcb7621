use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::cache::CachePurpose;
use crate::errors::AppError;
use crate::guidance::catalog::{self, StreamInfo, STREAMS};
use crate::guidance::outcome::AiOutcome;
use crate::guidance::types::{
    Alert, CareerInsight, CareerSuggestion, CollegeRecommendations, Dashboard, QuizAnalysis,
    ScoredCourse, StudyPlan,
};
use crate::models::profile::{QuizAnswerSet, UserProfile};
use crate::state::AppState;

const DEFAULT_CAREER_COUNT: usize = 6;
const MAX_CAREER_COUNT: usize = 10;

/// Explicit stream, else the profile's stream.
fn resolve_stream(explicit: Option<&str>, profile: &UserProfile) -> Result<String, AppError> {
    let non_blank = |s: &&str| !s.trim().is_empty();
    explicit
        .filter(non_blank)
        .or(profile.stream.as_deref().filter(non_blank))
        .map(|s| s.trim().to_string())
        .ok_or_else(|| AppError::Validation("stream is required (request or profile)".to_string()))
}

fn require_text<'a>(value: &'a str, field: &str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(value)
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

/// POST /api/v1/guidance/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<AiOutcome<String>>, AppError> {
    let message = require_text(&req.message, "message")?;
    Ok(Json(state.advisor.chat(message, req.profile.as_ref()).await))
}

#[derive(Deserialize)]
pub struct QuizRequest {
    pub answers: QuizAnswerSet,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

#[derive(Serialize)]
pub struct QuizResponse {
    #[serde(flatten)]
    pub analysis: AiOutcome<QuizAnalysis>,
    /// Stream key derived from the stream question's answer, when recognised.
    pub stream: Option<&'static str>,
}

/// POST /api/v1/guidance/quiz
pub async fn handle_quiz(
    State(state): State<AppState>,
    Json(req): Json<QuizRequest>,
) -> Result<Json<QuizResponse>, AppError> {
    if req.answers.is_empty() {
        return Err(AppError::Validation("answers must not be empty".to_string()));
    }
    let stream = req
        .answers
        .stream_answer()
        .and_then(catalog::stream_key_for_answer);
    let analysis = state
        .advisor
        .analyze_quiz(&req.answers, req.profile.as_ref())
        .await;
    Ok(Json(QuizResponse { analysis, stream }))
}

#[derive(Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub profile: UserProfile,
}

/// POST /api/v1/guidance/colleges
pub async fn handle_colleges(
    State(state): State<AppState>,
    Json(req): Json<ProfileRequest>,
) -> Json<AiOutcome<CollegeRecommendations>> {
    Json(state.advisor.recommend_colleges(&req.profile).await)
}

#[derive(Deserialize)]
pub struct CareerInsightRequest {
    pub career: String,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

/// POST /api/v1/guidance/career-insight
pub async fn handle_career_insight(
    State(state): State<AppState>,
    Json(req): Json<CareerInsightRequest>,
) -> Result<Json<AiOutcome<CareerInsight>>, AppError> {
    let career = require_text(&req.career, "career")?;
    Ok(Json(
        state
            .advisor
            .career_insight(career, req.profile.as_ref())
            .await,
    ))
}

#[derive(Deserialize)]
pub struct AlertsRequest {
    #[serde(default)]
    pub profile: UserProfile,
    /// YYYY-MM-DD; defaults to today (UTC).
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// POST /api/v1/guidance/alerts
pub async fn handle_alerts(
    State(state): State<AppState>,
    Json(req): Json<AlertsRequest>,
) -> Json<AiOutcome<Vec<Alert>>> {
    let today = req.date.unwrap_or_else(|| Utc::now().date_naive());
    Json(state.advisor.smart_alerts(&req.profile, today).await)
}

#[derive(Deserialize)]
pub struct StudyPlanRequest {
    #[serde(default)]
    pub profile: UserProfile,
    #[serde(default)]
    pub goal: String,
}

/// POST /api/v1/guidance/study-plan
///
/// Falls back to the profile's career goals when no goal is given.
pub async fn handle_study_plan(
    State(state): State<AppState>,
    Json(req): Json<StudyPlanRequest>,
) -> Result<Json<AiOutcome<StudyPlan>>, AppError> {
    let goal = if req.goal.trim().is_empty() {
        req.profile.career_goals.as_deref().unwrap_or_default()
    } else {
        &req.goal
    };
    let goal = require_text(goal, "goal")?;
    Ok(Json(state.advisor.study_plan(&req.profile, goal).await))
}

#[derive(Deserialize)]
pub struct CareersRequest {
    #[serde(default)]
    pub profile: UserProfile,
    #[serde(default)]
    pub stream: Option<String>,
    #[serde(default)]
    pub count: Option<usize>,
}

/// POST /api/v1/guidance/careers
pub async fn handle_careers(
    State(state): State<AppState>,
    Json(req): Json<CareersRequest>,
) -> Result<Json<AiOutcome<Vec<CareerSuggestion>>>, AppError> {
    let stream = resolve_stream(req.stream.as_deref(), &req.profile)?;
    let count = req
        .count
        .unwrap_or(DEFAULT_CAREER_COUNT)
        .clamp(1, MAX_CAREER_COUNT);
    Ok(Json(
        state
            .advisor
            .personalized_careers(&req.profile, &stream, count)
            .await,
    ))
}

#[derive(Deserialize)]
pub struct StreamRequest {
    #[serde(default)]
    pub profile: UserProfile,
    #[serde(default)]
    pub stream: Option<String>,
}

/// POST /api/v1/guidance/skills
pub async fn handle_skills(
    State(state): State<AppState>,
    Json(req): Json<StreamRequest>,
) -> Result<Json<AiOutcome<Vec<String>>>, AppError> {
    let stream = resolve_stream(req.stream.as_deref(), &req.profile)?;
    Ok(Json(state.advisor.top_skills(&req.profile, &stream).await))
}

#[derive(Deserialize)]
pub struct CourseScoresRequest {
    #[serde(default)]
    pub profile: UserProfile,
    #[serde(default)]
    pub stream: Option<String>,
    /// Defaults to the stream's catalog courses.
    #[serde(default)]
    pub courses: Option<Vec<String>>,
}

/// POST /api/v1/guidance/course-scores
pub async fn handle_course_scores(
    State(state): State<AppState>,
    Json(req): Json<CourseScoresRequest>,
) -> Result<Json<AiOutcome<Vec<ScoredCourse>>>, AppError> {
    let stream = resolve_stream(req.stream.as_deref(), &req.profile)?;
    let courses: Vec<String> = match req.courses {
        Some(list) => list
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect(),
        None => catalog::courses_for_stream(&stream),
    };
    if courses.is_empty() {
        return Err(AppError::Validation(format!(
            "no courses given and no catalog courses for stream '{stream}'"
        )));
    }
    Ok(Json(
        state
            .advisor
            .score_courses(&req.profile, &stream, &courses)
            .await,
    ))
}

/// POST /api/v1/guidance/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Json(req): Json<StreamRequest>,
) -> Result<Json<Dashboard>, AppError> {
    let stream = resolve_stream(req.stream.as_deref(), &req.profile)?;
    if catalog::find_stream(&stream).is_none() {
        return Err(AppError::NotFound(format!("Stream '{stream}' not found")));
    }
    Ok(Json(state.advisor.dashboard(&req.profile, &stream).await))
}

#[derive(Deserialize)]
pub struct ClearCacheQuery {
    pub purpose: Option<String>,
    pub stream: Option<String>,
}

/// DELETE /api/v1/cache
pub async fn handle_clear_cache(
    State(state): State<AppState>,
    Query(params): Query<ClearCacheQuery>,
) -> Result<Json<Value>, AppError> {
    let purpose = params
        .purpose
        .as_deref()
        .map(str::parse::<CachePurpose>)
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let removed = state
        .advisor
        .cache()
        .clear(purpose, params.stream.as_deref())
        .await?;
    Ok(Json(json!({ "removed": removed })))
}

/// GET /api/v1/catalog/streams
pub async fn handle_list_streams() -> Json<&'static [StreamInfo]> {
    Json(STREAMS)
}
