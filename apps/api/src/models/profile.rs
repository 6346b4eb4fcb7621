use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm_client::prompts::{NOT_COMPLETED, NOT_SPECIFIED};

/// Semi-structured student profile as the client stores it.
///
/// Every field is optional; prompt builders substitute `Not specified` for
/// anything missing. The core only reads profiles, it never writes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub education: Option<String>,
    pub interests: Vec<String>,
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub career_goals: Option<String>,
    pub stream: Option<String>,
    /// Prior quiz outcome (answers + analysis), kept opaque.
    pub quiz_results: Option<Value>,
}

/// Profile fields a prompt builder can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Age,
    Education,
    Interests,
    CareerGoals,
    Skills,
    Location,
    Stream,
    QuizResults,
}

impl ProfileField {
    /// Every field, in the order the full profile block lists them.
    pub const ALL: [ProfileField; 9] = [
        ProfileField::Name,
        ProfileField::Age,
        ProfileField::Education,
        ProfileField::Interests,
        ProfileField::CareerGoals,
        ProfileField::Skills,
        ProfileField::Location,
        ProfileField::Stream,
        ProfileField::QuizResults,
    ];

    fn label(self) -> &'static str {
        match self {
            ProfileField::Name => "Name",
            ProfileField::Age => "Age",
            ProfileField::Education => "Current Education",
            ProfileField::Interests => "Interests",
            ProfileField::CareerGoals => "Career Goals",
            ProfileField::Skills => "Skills",
            ProfileField::Location => "Location",
            ProfileField::Stream => "Stream",
            ProfileField::QuizResults => "Quiz Results",
        }
    }
}

impl UserProfile {
    /// Renders the chosen fields as `- Label: value` lines.
    pub fn render(&self, fields: &[ProfileField]) -> String {
        fields
            .iter()
            .map(|&field| format!("- {}: {}", field.label(), self.field_value(field)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn field_value(&self, field: ProfileField) -> String {
        match field {
            ProfileField::Name => text_or_placeholder(self.name.as_deref()),
            ProfileField::Age => self
                .age
                .map(|a| a.to_string())
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            ProfileField::Education => text_or_placeholder(self.education.as_deref()),
            ProfileField::Interests => list_or_placeholder(&self.interests),
            ProfileField::CareerGoals => text_or_placeholder(self.career_goals.as_deref()),
            ProfileField::Skills => list_or_placeholder(&self.skills),
            ProfileField::Location => text_or_placeholder(self.location.as_deref()),
            ProfileField::Stream => text_or_placeholder(self.stream.as_deref()),
            ProfileField::QuizResults => self
                .quiz_results
                .as_ref()
                .filter(|v| !v.is_null())
                .map(Value::to_string)
                .unwrap_or_else(|| NOT_COMPLETED.to_string()),
        }
    }
}

fn text_or_placeholder(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_SPECIFIED.to_string(),
    }
}

fn list_or_placeholder(values: &[String]) -> String {
    let items: Vec<&str> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();
    if items.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        items.join(", ")
    }
}

/// Quiz answers keyed by question index. Ordered so prompts render deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizAnswerSet(pub BTreeMap<u32, String>);

impl QuizAnswerSet {
    /// Question 0 asks which stream the student is in.
    pub const STREAM_QUESTION: u32 = 0;

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn stream_answer(&self) -> Option<&str> {
        self.0.get(&Self::STREAM_QUESTION).map(String::as_str)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }
}
