//! Deterministic fallback values, one per use case.
//!
//! Each fallback satisfies the same shape contract as real model output; the
//! normalizer tests re-validate every value here through its own validator.

use chrono::NaiveDate;

use crate::guidance::outcome::AiFailure;
use crate::guidance::types::{
    Alert, CareerInsight, CareerSuggestion, College, CollegeRecommendations, QuizAnalysis,
    ScoredCourse, StudyPlan,
};

const CONFIGURATION_REPLY: &str =
    "I'm sorry, there's a configuration issue. Please check the API key setup.";
const QUOTA_REPLY: &str = "I'm sorry, I've reached my usage limit. Please try again later.";
const CONNECTIVITY_REPLY: &str =
    "I'm sorry, I'm having trouble connecting right now. Please try again later.";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Chat apology matching why the call failed.
pub fn chat_reply(failure: &AiFailure) -> String {
    if matches!(failure, AiFailure::Configuration) {
        CONFIGURATION_REPLY.to_string()
    } else if failure.is_quota() {
        QUOTA_REPLY.to_string()
    } else {
        CONNECTIVITY_REPLY.to_string()
    }
}

pub fn quiz_analysis() -> QuizAnalysis {
    QuizAnalysis {
        careers: strings(&["Software Engineer", "Data Analyst", "Product Manager"]),
        courses: strings(&["Computer Science", "Business Analytics"]),
        skills: strings(&["Problem Solving", "Communication", "Technical Skills"]),
        personality: "Analytical and detail-oriented".to_string(),
        recommendations: "Based on your responses, you show strong analytical thinking and \
            problem-solving abilities."
            .to_string(),
        study_plan: strings(&[
            "Complete relevant coursework",
            "Build practical projects",
            "Gain industry experience",
        ]),
        colleges: strings(&["IIT Delhi", "IIT Bombay", "IIM Bangalore"]),
    }
}

pub fn college_recommendations() -> CollegeRecommendations {
    CollegeRecommendations {
        colleges: vec![College {
            name: "Indian Institute of Technology Delhi".to_string(),
            location: "Delhi".to_string(),
            courses: strings(&["Computer Science", "Engineering"]),
            reason: "Excellent for technical education".to_string(),
            rating: 4.8,
            admission_difficulty: "Hard".to_string(),
            fees: "₹2-3 LPA".to_string(),
            placement_rate: "95%".to_string(),
            top_recruiters: strings(&["Google", "Microsoft", "Amazon"]),
        }],
        courses: strings(&["Computer Science", "Engineering"]),
        insights: "Based on your profile, technical education would be a great fit.".to_string(),
        application_tips: strings(&[
            "Focus on JEE preparation",
            "Build strong foundation in mathematics",
            "Participate in coding competitions",
        ]),
        scholarships: strings(&["Merit-based scholarships", "Need-based financial aid"]),
    }
}

pub fn career_insight() -> CareerInsight {
    CareerInsight {
        description: "A professional role in the field".to_string(),
        skills: strings(&["Communication", "Problem Solving"]),
        salary: "₹5-15 LPA".to_string(),
        growth: "Good growth prospects".to_string(),
        education: "Relevant degree required".to_string(),
        companies: strings(&["Top companies in the field"]),
        pros: strings(&["Good opportunities", "Growth potential"]),
        cons: strings(&["Competitive field", "Continuous learning required"]),
        roadmap: strings(&["Complete education", "Gain experience", "Build network"]),
        skills_gap: strings(&["Technical skills", "Soft skills"]),
        timeline: "2-4 years".to_string(),
    }
}

/// A single counseling reminder dated `today`.
pub fn alerts(today: NaiveDate) -> Vec<Alert> {
    vec![Alert {
        title: "Career Guidance Session".to_string(),
        message: "Schedule a session to discuss your career goals".to_string(),
        alert_type: "reminder".to_string(),
        priority: "medium".to_string(),
        date: today.format("%Y-%m-%d").to_string(),
        time: "10:00".to_string(),
        action_required: "Book a counseling session".to_string(),
        related_to: "career".to_string(),
    }]
}

pub fn study_plan() -> StudyPlan {
    StudyPlan {
        plan_name: "Basic Study Plan".to_string(),
        duration: "3 months".to_string(),
        schedule: vec![],
        resources: strings(&["Online courses", "Books", "Practice tests"]),
        skills: strings(&["Problem solving", "Communication"]),
        timeline: "3-month structured plan".to_string(),
        tips: strings(&["Stay consistent", "Practice daily"]),
    }
}

pub fn careers() -> Vec<CareerSuggestion> {
    vec![
        CareerSuggestion {
            title: "Software Engineer".to_string(),
            description: "Design and develop software applications and systems".to_string(),
            salary: "₹8-15 LPA".to_string(),
            demand: "High".to_string(),
            skills: strings(&["Programming", "Problem Solving", "Teamwork"]),
            growth: "Excellent growth prospects in tech".to_string(),
            match_score: 75.0,
            personalized_reason: "Strong demand in current market".to_string(),
            icon: "code".to_string(),
        },
        CareerSuggestion {
            title: "Data Scientist".to_string(),
            description: "Analyze complex data to help organizations make decisions".to_string(),
            salary: "₹10-20 LPA".to_string(),
            demand: "Very High".to_string(),
            skills: strings(&["Statistics", "Machine Learning", "Python"]),
            growth: "Rapidly growing field with AI/ML boom".to_string(),
            match_score: 80.0,
            personalized_reason: "High demand for data skills across industries".to_string(),
            icon: "trending-up".to_string(),
        },
    ]
}

pub fn top_skills() -> Vec<String> {
    strings(&[
        "Problem Solving",
        "Communication",
        "Time Management",
        "Critical Thinking",
        "Collaboration",
        "Self-Learning",
    ])
}

/// Linear-decay scoring parameters for course lists the model did not score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecayProfile {
    pub start: u32,
    pub step: u32,
    pub floor: u32,
    pub reason: &'static str,
}

/// Used when the model answered but its output was unusable, and to fill
/// missing scores in otherwise valid output.
pub const OUTPUT_DECAY: DecayProfile = DecayProfile {
    start: 60,
    step: 8,
    floor: 35,
    reason: "Good match with your interests and background.",
};

/// Used when the call itself failed.
pub const CALL_FAILURE_DECAY: DecayProfile = DecayProfile {
    start: 55,
    step: 6,
    floor: 30,
    reason: "Relevant to your selected stream.",
};

impl DecayProfile {
    /// `max(start - step * index, floor)`: strictly decreasing until the floor.
    pub fn score_at(&self, index: usize) -> u32 {
        let drop = u64::from(self.step).saturating_mul(index as u64);
        let score = u64::from(self.start).saturating_sub(drop);
        score.max(u64::from(self.floor)) as u32
    }
}

/// Scores `courses` in order by the decay profile matching `failure`.
pub fn course_scores(courses: &[String], failure: &AiFailure) -> Vec<ScoredCourse> {
    let profile = if failure.is_call_failure() {
        CALL_FAILURE_DECAY
    } else {
        OUTPUT_DECAY
    };
    decayed_scores(courses, &profile)
}

pub fn decayed_scores(courses: &[String], profile: &DecayProfile) -> Vec<ScoredCourse> {
    courses
        .iter()
        .enumerate()
        .map(|(i, course)| ScoredCourse {
            course: course.clone(),
            score: profile.score_at(i),
            reason: profile.reason.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course_list(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Course {i}")).collect()
    }

    #[test]
    fn test_output_decay_sequence() {
        let scores: Vec<u32> = (0..7).map(|i| OUTPUT_DECAY.score_at(i)).collect();
        assert_eq!(scores, vec![60, 52, 44, 36, 35, 35, 35]);
    }

    #[test]
    fn test_call_failure_decay_sequence() {
        let scores: Vec<u32> = (0..7).map(|i| CALL_FAILURE_DECAY.score_at(i)).collect();
        assert_eq!(scores, vec![55, 49, 43, 37, 31, 30, 30]);
    }

    #[test]
    fn test_decay_never_underflows_for_large_index() {
        assert_eq!(OUTPUT_DECAY.score_at(usize::MAX / 2), 35);
    }

    #[test]
    fn test_decay_strictly_decreases_until_floor() {
        for profile in [OUTPUT_DECAY, CALL_FAILURE_DECAY] {
            let scores: Vec<u32> = (0..20).map(|i| profile.score_at(i)).collect();
            for pair in scores.windows(2) {
                if pair[1] > profile.floor {
                    assert_eq!(pair[0] - pair[1], profile.step);
                } else {
                    assert!(pair[1] == profile.floor && pair[0] >= pair[1]);
                }
            }
        }
    }

    #[test]
    fn test_course_scores_are_deterministic_and_keep_order() {
        let courses = course_list(5);
        let first = course_scores(&courses, &AiFailure::Parse);
        let second = course_scores(&courses, &AiFailure::Parse);
        assert_eq!(first, second);
        assert_eq!(
            first.iter().map(|c| c.course.as_str()).collect::<Vec<_>>(),
            courses.iter().map(String::as_str).collect::<Vec<_>>()
        );
        assert!(first.iter().all(|c| c.reason == OUTPUT_DECAY.reason));
    }

    #[test]
    fn test_course_scores_pick_profile_by_failure_kind() {
        let courses = course_list(1);
        assert_eq!(course_scores(&courses, &AiFailure::Configuration)[0].score, 55);
        assert_eq!(
            course_scores(&courses, &AiFailure::Shape("x".to_string()))[0].score,
            60
        );
    }

    #[test]
    fn test_chat_reply_by_failure() {
        assert!(chat_reply(&AiFailure::Configuration).contains("configuration"));
        let quota = AiFailure::Transport {
            status: Some(429),
            message: "rate limited".to_string(),
        };
        assert!(chat_reply(&quota).contains("usage limit"));
        assert!(chat_reply(&AiFailure::Parse).contains("trouble connecting"));
    }

    #[test]
    fn test_alert_fallback_uses_given_date() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let alerts = alerts(today);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].date, "2026-03-14");
        assert_eq!(alerts[0].time, "10:00");
    }
}
