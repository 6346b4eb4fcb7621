//! Response Normalizers: raw model text (or the call's failure) in, typed result out.
//!
//! Normalization never fails: extraction misses, shape violations and call
//! failures all end in the use case's fallback value, logged at `warn`.
//!
//! Per-call states: Invoking -> Normalizing -> Done (model), or
//! Invoking -> Failed -> FallbackApplied -> Done. No retries.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::guidance::fallbacks::{self, OUTPUT_DECAY};
use crate::guidance::outcome::{AiFailure, AiOutcome, UseCase};
use crate::guidance::types::{
    Alert, CareerInsight, CareerSuggestion, CollegeRecommendations, QuizAnalysis, ScoredCourse,
    StudyPlan,
};
use crate::llm_client::json_extract::extract_json;

/// Shared pipeline: extract JSON, validate, or fall back.
pub fn normalize<T>(
    use_case: UseCase,
    raw: Result<String, AiFailure>,
    validate: impl FnOnce(Value) -> Result<T, AiFailure>,
    fallback: impl FnOnce(&AiFailure) -> T,
) -> AiOutcome<T> {
    let result = raw
        .and_then(|text| extract_json(&text).ok_or(AiFailure::Parse))
        .and_then(validate);

    match result {
        Ok(value) => {
            debug!("{}: model output accepted", use_case.as_str());
            AiOutcome::Model(value)
        }
        Err(failure) => fall_back(use_case, failure, fallback),
    }
}

fn fall_back<T>(
    use_case: UseCase,
    failure: AiFailure,
    fallback: impl FnOnce(&AiFailure) -> T,
) -> AiOutcome<T> {
    warn!(
        "{} failed ({}), serving fallback: {}",
        use_case.as_str(),
        failure.kind(),
        failure
    );
    AiOutcome::Fallback(fallback(&failure))
}

// ────────────────────────────────────────────────────────────────────────────
// Shape validators
// ────────────────────────────────────────────────────────────────────────────

fn expect_object(value: &Value) -> Result<(), AiFailure> {
    if value.is_object() {
        Ok(())
    } else {
        Err(AiFailure::Shape(format!(
            "expected a JSON object, got {}",
            json_kind(value)
        )))
    }
}

fn expect_array(value: &Value) -> Result<&Vec<Value>, AiFailure> {
    value
        .as_array()
        .ok_or_else(|| AiFailure::Shape(format!("expected a JSON array, got {}", json_kind(value))))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Objects only: derived struct deserializers would otherwise accept arrays.
fn object_as<T: DeserializeOwned>(value: Value) -> Result<T, AiFailure> {
    expect_object(&value)?;
    Ok(serde_json::from_value(value)?)
}

pub fn validate_quiz_analysis(value: Value) -> Result<QuizAnalysis, AiFailure> {
    object_as(value)
}

pub fn validate_colleges(value: Value) -> Result<CollegeRecommendations, AiFailure> {
    object_as(value)
}

pub fn validate_career_insight(value: Value) -> Result<CareerInsight, AiFailure> {
    object_as(value)
}

pub fn validate_study_plan(value: Value) -> Result<StudyPlan, AiFailure> {
    object_as(value)
}

pub fn validate_alerts(value: Value) -> Result<Vec<Alert>, AiFailure> {
    expect_array(&value)?;
    Ok(serde_json::from_value(value)?)
}

pub fn validate_careers(value: Value) -> Result<Vec<CareerSuggestion>, AiFailure> {
    expect_array(&value)?;
    let mut careers: Vec<CareerSuggestion> = serde_json::from_value(value)?;
    careers.retain(|c| !c.title.trim().is_empty());
    if careers.is_empty() {
        return Err(AiFailure::Shape("career list is empty".to_string()));
    }
    for career in &mut careers {
        career.match_score = career.match_score.clamp(0.0, 100.0);
    }
    Ok(careers)
}

#[derive(Deserialize)]
struct SkillsEnvelope {
    skills: Vec<String>,
}

pub fn validate_top_skills(value: Value) -> Result<Vec<String>, AiFailure> {
    let envelope: SkillsEnvelope = object_as(value)?;
    let skills: Vec<String> = envelope
        .skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if skills.is_empty() {
        return Err(AiFailure::Shape("skills array is empty".to_string()));
    }
    Ok(skills)
}

/// Coerces each array element to `{course, score, reason}`.
///
/// - `score` present: clamped to 0–100 (numeric strings accepted)
/// - `score` missing or non-numeric: linear decay keyed by array index
/// - `course` missing: the requested course at the same index, else the element is dropped
/// - bare strings are course names
pub fn validate_course_scores(
    value: Value,
    requested: &[String],
) -> Result<Vec<ScoredCourse>, AiFailure> {
    let items = expect_array(&value)?;

    let scored: Vec<ScoredCourse> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| coerce_scored_course(index, item, requested))
        .collect();

    if scored.is_empty() {
        return Err(AiFailure::Shape(
            "course array has no usable entries".to_string(),
        ));
    }
    Ok(scored)
}

fn coerce_scored_course(index: usize, item: &Value, requested: &[String]) -> Option<ScoredCourse> {
    let decayed = || OUTPUT_DECAY.score_at(index);

    match item {
        Value::String(name) if !name.trim().is_empty() => Some(ScoredCourse {
            course: name.trim().to_string(),
            score: decayed(),
            reason: OUTPUT_DECAY.reason.to_string(),
        }),
        Value::Object(fields) => {
            let course = fields
                .get("course")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .or_else(|| requested.get(index).cloned())?;

            let score = fields
                .get("score")
                .and_then(numeric)
                .map(clamp_score)
                .unwrap_or_else(decayed);

            let reason = fields
                .get("reason")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .unwrap_or(OUTPUT_DECAY.reason)
                .to_string();

            Some(ScoredCourse {
                course,
                score,
                reason,
            })
        }
        _ => None,
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn clamp_score(raw: f64) -> u32 {
    raw.clamp(0.0, 100.0).round() as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Per-use-case normalizers
// ────────────────────────────────────────────────────────────────────────────

/// Chat answers are free text: any non-blank completion is accepted.
pub fn normalize_chat(raw: Result<String, AiFailure>) -> AiOutcome<String> {
    let result = raw.and_then(|text| {
        let text = text.trim();
        if text.is_empty() {
            Err(AiFailure::Parse)
        } else {
            Ok(text.to_string())
        }
    });
    match result {
        Ok(text) => AiOutcome::Model(text),
        Err(failure) => fall_back(UseCase::Chat, failure, fallbacks::chat_reply),
    }
}

pub fn normalize_quiz_analysis(raw: Result<String, AiFailure>) -> AiOutcome<QuizAnalysis> {
    normalize(UseCase::QuizAnalysis, raw, validate_quiz_analysis, |_| {
        fallbacks::quiz_analysis()
    })
}

pub fn normalize_colleges(raw: Result<String, AiFailure>) -> AiOutcome<CollegeRecommendations> {
    normalize(UseCase::CollegeRecommendation, raw, validate_colleges, |_| {
        fallbacks::college_recommendations()
    })
}

pub fn normalize_career_insight(raw: Result<String, AiFailure>) -> AiOutcome<CareerInsight> {
    normalize(UseCase::CareerInsight, raw, validate_career_insight, |_| {
        fallbacks::career_insight()
    })
}

pub fn normalize_alerts(raw: Result<String, AiFailure>, today: NaiveDate) -> AiOutcome<Vec<Alert>> {
    normalize(UseCase::AlertGeneration, raw, validate_alerts, |_| {
        fallbacks::alerts(today)
    })
}

pub fn normalize_study_plan(raw: Result<String, AiFailure>) -> AiOutcome<StudyPlan> {
    normalize(UseCase::StudyPlan, raw, validate_study_plan, |_| {
        fallbacks::study_plan()
    })
}

pub fn normalize_careers(raw: Result<String, AiFailure>) -> AiOutcome<Vec<CareerSuggestion>> {
    normalize(UseCase::CareerList, raw, validate_careers, |_| {
        fallbacks::careers()
    })
}

pub fn normalize_top_skills(raw: Result<String, AiFailure>) -> AiOutcome<Vec<String>> {
    normalize(UseCase::SkillRanking, raw, validate_top_skills, |_| {
        fallbacks::top_skills()
    })
}

pub fn normalize_course_scores(
    raw: Result<String, AiFailure>,
    courses: &[String],
) -> AiOutcome<Vec<ScoredCourse>> {
    normalize(
        UseCase::CourseScoring,
        raw,
        |value| validate_course_scores(value, courses),
        |failure| fallbacks::course_scores(courses, failure),
    )
}
