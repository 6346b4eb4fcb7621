//! Tagged use-case results and the failure taxonomy that feeds fallbacks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm_client::LlmError;

/// A normalized result: either genuine model output or the use case's fallback.
/// Both variants carry a fully typed value, so callers never special-case shape.
///
/// Serialized as `{"kind": "model" | "fallback", "value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AiOutcome<T> {
    Model(T),
    Fallback(T),
}

impl<T> AiOutcome<T> {
    pub fn value(&self) -> &T {
        match self {
            AiOutcome::Model(v) | AiOutcome::Fallback(v) => v,
        }
    }

    /// True when the fallback was served. Drives the "AI service temporarily
    /// unavailable" banner.
    pub fn is_degraded(&self) -> bool {
        matches!(self, AiOutcome::Fallback(_))
    }
}

/// Why a call ended on its fallback. Never propagated past the normalizer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AiFailure {
    #[error("model credential is not configured")]
    Configuration,

    #[error("model transport failed: {message}")]
    Transport { status: Option<u16>, message: String },

    #[error("no JSON value could be recovered from the model output")]
    Parse,

    #[error("model output has the wrong shape: {0}")]
    Shape(String),
}

impl AiFailure {
    /// The call itself failed, as opposed to returning unusable output.
    pub fn is_call_failure(&self) -> bool {
        matches!(self, AiFailure::Configuration | AiFailure::Transport { .. })
    }

    pub fn is_quota(&self) -> bool {
        match self {
            AiFailure::Transport { status, message } => {
                *status == Some(429) || message.to_lowercase().contains("quota")
            }
            _ => false,
        }
    }

    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            AiFailure::Configuration => "configuration",
            AiFailure::Transport { .. } => "transport",
            AiFailure::Parse => "parse",
            AiFailure::Shape(_) => "shape",
        }
    }
}

impl From<LlmError> for AiFailure {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Unavailable => AiFailure::Configuration,
            LlmError::Api { status, message } => AiFailure::Transport {
                status: Some(status),
                message,
            },
            LlmError::Http(e) => AiFailure::Transport {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            },
            other => AiFailure::Transport {
                status: None,
                message: other.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for AiFailure {
    fn from(err: serde_json::Error) -> Self {
        AiFailure::Shape(err.to_string())
    }
}

/// Named AI-backed operations. Used for log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseCase {
    Chat,
    QuizAnalysis,
    CollegeRecommendation,
    CareerInsight,
    AlertGeneration,
    StudyPlan,
    CareerList,
    SkillRanking,
    CourseScoring,
}

impl UseCase {
    pub fn as_str(self) -> &'static str {
        match self {
            UseCase::Chat => "chat",
            UseCase::QuizAnalysis => "quiz_analysis",
            UseCase::CollegeRecommendation => "college_recommendation",
            UseCase::CareerInsight => "career_insight",
            UseCase::AlertGeneration => "alert_generation",
            UseCase::StudyPlan => "study_plan",
            UseCase::CareerList => "career_list",
            UseCase::SkillRanking => "skill_ranking",
            UseCase::CourseScoring => "course_scoring",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_serializes_with_kind_tag() {
        let model = AiOutcome::Model(vec!["Rust".to_string()]);
        assert_eq!(
            serde_json::to_value(&model).unwrap(),
            json!({"kind": "model", "value": ["Rust"]})
        );

        let fallback: AiOutcome<u32> = AiOutcome::Fallback(7);
        assert_eq!(
            serde_json::to_value(&fallback).unwrap(),
            json!({"kind": "fallback", "value": 7})
        );
    }

    #[test]
    fn test_outcome_degraded_flag() {
        assert!(!AiOutcome::Model(1).is_degraded());
        assert!(AiOutcome::Fallback(1).is_degraded());
    }

    #[test]
    fn test_unavailable_maps_to_configuration() {
        let failure: AiFailure = LlmError::Unavailable.into();
        assert_eq!(failure, AiFailure::Configuration);
        assert!(failure.is_call_failure());
    }

    #[test]
    fn test_rate_limit_is_quota_transport() {
        let failure: AiFailure = LlmError::Api {
            status: 429,
            message: "Too many requests".to_string(),
        }
        .into();
        assert!(failure.is_quota());
        assert_eq!(failure.kind(), "transport");
    }

    #[test]
    fn test_empty_content_is_transport_not_parse() {
        let failure: AiFailure = LlmError::EmptyContent.into();
        assert!(matches!(failure, AiFailure::Transport { status: None, .. }));
        assert!(!failure.is_quota());
    }
}
