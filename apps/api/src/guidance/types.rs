//! Typed results, one per use case. Field names follow the camelCase JSON the
//! prompts ask the model for, so the same types read model output and cache entries.

use serde::{Deserialize, Serialize};

use crate::guidance::outcome::AiOutcome;

/// Quiz analysis. Required keys: careers, courses, skills, personality, recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnalysis {
    pub careers: Vec<String>,
    pub courses: Vec<String>,
    pub skills: Vec<String>,
    pub personality: String,
    pub recommendations: String,
    #[serde(default)]
    pub study_plan: Vec<String>,
    #[serde(default)]
    pub colleges: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct College {
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub rating: f64,
    /// "Easy" | "Medium" | "Hard"
    #[serde(default)]
    pub admission_difficulty: String,
    #[serde(default)]
    pub fees: String,
    #[serde(default)]
    pub placement_rate: String,
    #[serde(default)]
    pub top_recruiters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeRecommendations {
    pub colleges: Vec<College>,
    pub courses: Vec<String>,
    pub insights: String,
    #[serde(default)]
    pub application_tips: Vec<String>,
    #[serde(default)]
    pub scholarships: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerInsight {
    pub description: String,
    pub skills: Vec<String>,
    pub salary: String,
    pub growth: String,
    pub education: String,
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(default)]
    pub roadmap: Vec<String>,
    #[serde(default)]
    pub skills_gap: Vec<String>,
    #[serde(default)]
    pub timeline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub title: String,
    pub message: String,
    /// deadline | scholarship | event | reminder | exam | internship
    #[serde(rename = "type", default = "default_alert_type")]
    pub alert_type: String,
    /// high | medium | low
    #[serde(default = "default_priority")]
    pub priority: String,
    /// YYYY-MM-DD
    #[serde(default)]
    pub date: String,
    /// HH:MM
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub action_required: String,
    /// college | career | skill | exam
    #[serde(default)]
    pub related_to: String,
}

fn default_alert_type() -> String {
    "reminder".to_string()
}

fn default_priority() -> String {
    "medium".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyWeek {
    pub week: u32,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub milestone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub plan_name: String,
    pub duration: String,
    #[serde(default)]
    pub schedule: Vec<StudyWeek>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub timeline: String,
    #[serde(default)]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerSuggestion {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub salary: String,
    /// Very High | High | Medium | Low
    #[serde(default)]
    pub demand: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub growth: String,
    /// Clamped to 0–100 by the normalizer.
    #[serde(default)]
    pub match_score: f64,
    #[serde(default)]
    pub personalized_reason: String,
    #[serde(default = "default_icon")]
    pub icon: String,
}

fn default_icon() -> String {
    "briefcase".to_string()
}

/// One course with its relevance to the student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredCourse {
    pub course: String,
    /// 0 – 100
    pub score: u32,
    pub reason: String,
}

/// Skill ranking and course scoring for one stream, fetched together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub stream: String,
    pub top_skills: AiOutcome<Vec<String>>,
    pub course_scores: AiOutcome<Vec<ScoredCourse>>,
}
