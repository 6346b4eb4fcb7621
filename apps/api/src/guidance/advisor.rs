//! CareerAdvisor: one method per use case.
//!
//! Flow for every call: (cache lookup) -> credential check -> build prompt ->
//! invoke -> normalize -> (write-through when the model answered). Without a
//! credential no prompt is built and no request leaves the process.

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{AiCache, CachePurpose};
use crate::guidance::catalog;
use crate::guidance::normalize;
use crate::guidance::outcome::{AiFailure, AiOutcome};
use crate::guidance::prompts;
use crate::guidance::types::{
    Alert, CareerInsight, CareerSuggestion, CollegeRecommendations, Dashboard, QuizAnalysis,
    ScoredCourse, StudyPlan,
};
use crate::llm_client::ModelInvoker;
use crate::models::profile::{QuizAnswerSet, UserProfile};

#[derive(Clone)]
pub struct CareerAdvisor {
    invoker: Arc<dyn ModelInvoker>,
    cache: AiCache,
}

impl CareerAdvisor {
    pub fn new(invoker: Arc<dyn ModelInvoker>, cache: AiCache) -> Self {
        Self { invoker, cache }
    }

    pub fn model_configured(&self) -> bool {
        self.invoker.is_configured()
    }

    pub fn cache(&self) -> &AiCache {
        &self.cache
    }

    /// Sends one prompt. The prompt closure only runs when a credential is present.
    async fn ask(&self, prompt: impl FnOnce() -> String) -> Result<String, AiFailure> {
        if !self.invoker.is_configured() {
            return Err(AiFailure::Configuration);
        }
        let prompt = prompt();
        debug!("Invoking model ({} prompt chars)", prompt.len());
        Ok(self.invoker.invoke(&prompt).await?)
    }

    /// Read-before-fetch and write-through around `compute`, single-flight per key.
    async fn cached<T, F, Fut>(&self, purpose: CachePurpose, stream: &str, compute: F) -> AiOutcome<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AiOutcome<T>>,
    {
        let _fill = self.cache.lock_fill(purpose, stream).await;

        match self.cache.get::<T>(purpose, stream).await {
            Ok(Some(hit)) => {
                debug!("Cache hit for {} / {stream}", purpose.as_str());
                return AiOutcome::Model(hit);
            }
            Ok(None) => {}
            Err(e) => warn!("Cache read failed for {} / {stream}: {e}", purpose.as_str()),
        }

        let outcome = compute().await;

        if let AiOutcome::Model(value) = &outcome {
            if let Err(e) = self.cache.set(purpose, stream, value).await {
                warn!("Cache write failed for {} / {stream}: {e}", purpose.as_str());
            }
        }
        outcome
    }

    pub async fn chat(&self, message: &str, profile: Option<&UserProfile>) -> AiOutcome<String> {
        let raw = self
            .ask(|| prompts::build_chat_prompt(message, profile))
            .await;
        normalize::normalize_chat(raw)
    }

    pub async fn analyze_quiz(
        &self,
        answers: &QuizAnswerSet,
        profile: Option<&UserProfile>,
    ) -> AiOutcome<QuizAnalysis> {
        let raw = self
            .ask(|| prompts::build_quiz_analysis_prompt(answers, profile))
            .await;
        normalize::normalize_quiz_analysis(raw)
    }

    pub async fn recommend_colleges(&self, profile: &UserProfile) -> AiOutcome<CollegeRecommendations> {
        let raw = self.ask(|| prompts::build_college_prompt(profile)).await;
        normalize::normalize_colleges(raw)
    }

    pub async fn career_insight(
        &self,
        career: &str,
        profile: Option<&UserProfile>,
    ) -> AiOutcome<CareerInsight> {
        let raw = self
            .ask(|| prompts::build_career_insight_prompt(career, profile))
            .await;
        normalize::normalize_career_insight(raw)
    }

    pub async fn smart_alerts(&self, profile: &UserProfile, today: NaiveDate) -> AiOutcome<Vec<Alert>> {
        let raw = self
            .ask(|| prompts::build_alerts_prompt(profile, today))
            .await;
        normalize::normalize_alerts(raw, today)
    }

    pub async fn study_plan(&self, profile: &UserProfile, goal: &str) -> AiOutcome<StudyPlan> {
        let raw = self
            .ask(|| prompts::build_study_plan_prompt(profile, goal))
            .await;
        normalize::normalize_study_plan(raw)
    }

    pub async fn personalized_careers(
        &self,
        profile: &UserProfile,
        stream: &str,
        count: usize,
    ) -> AiOutcome<Vec<CareerSuggestion>> {
        self.cached(CachePurpose::Careers, stream, || async move {
            let raw = self
                .ask(|| prompts::build_careers_prompt(profile, stream, count))
                .await;
            normalize::normalize_careers(raw)
        })
        .await
    }

    pub async fn top_skills(&self, profile: &UserProfile, stream: &str) -> AiOutcome<Vec<String>> {
        self.cached(CachePurpose::Skills, stream, || async move {
            let raw = self
                .ask(|| prompts::build_skills_prompt(profile, stream))
                .await;
            normalize::normalize_top_skills(raw)
        })
        .await
    }

    pub async fn score_courses(
        &self,
        profile: &UserProfile,
        stream: &str,
        courses: &[String],
    ) -> AiOutcome<Vec<ScoredCourse>> {
        if courses.is_empty() {
            debug!("No courses to score for {stream}");
            return AiOutcome::Fallback(Vec::new());
        }
        let compute = || async move {
            let raw = self
                .ask(|| prompts::build_course_scoring_prompt(profile, stream, courses))
                .await;
            normalize::normalize_course_scores(raw, courses)
        };
        // The cache key is the stream alone, so only the catalog list may use it.
        if courses == catalog::courses_for_stream(stream).as_slice() {
            self.cached(CachePurpose::CourseScores, stream, compute).await
        } else {
            debug!("Custom course list for {stream}: scoring without cache");
            compute().await
        }
    }

    /// Skill ranking and course scoring for the stream's catalog courses, run concurrently.
    pub async fn dashboard(&self, profile: &UserProfile, stream: &str) -> Dashboard {
        let courses = catalog::courses_for_stream(stream);
        let (top_skills, course_scores) = tokio::join!(
            self.top_skills(profile, stream),
            self.score_courses(profile, stream, &courses),
        );
        info!(
            "Dashboard for {stream}: skills {}, courses {}",
            if top_skills.is_degraded() { "fallback" } else { "model" },
            if course_scores.is_degraded() { "fallback" } else { "model" },
        );
        Dashboard {
            stream: stream.trim().to_string(),
            top_skills,
            course_scores,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::guidance::fallbacks;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays canned replies in order and counts invocations.
    pub(crate) struct ScriptedInvoker {
        configured: bool,
        replies: Mutex<VecDeque<Result<String, LlmError>>>,
        delay: Duration,
        pub calls: AtomicUsize,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedInvoker {
        pub(crate) fn new(replies: Vec<Result<String, LlmError>>) -> Self {
            Self {
                configured: true,
                replies: Mutex::new(replies.into()),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn unconfigured() -> Self {
            Self {
                configured: false,
                ..Self::new(Vec::new())
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelInvoker for ScriptedInvoker {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn invoke(&self, prompt: &str) -> Result<String, LlmError> {
            if !self.configured {
                return Err(LlmError::Unavailable);
            }
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }

    fn advisor(invoker: Arc<ScriptedInvoker>) -> CareerAdvisor {
        CareerAdvisor::new(invoker, AiCache::in_memory())
    }

    fn profile() -> UserProfile {
        UserProfile {
            name: Some("Asha".to_string()),
            stream: Some("Science (PCM)".to_string()),
            interests: vec!["Robotics".to_string()],
            ..UserProfile::default()
        }
    }

    fn quota_error() -> LlmError {
        LlmError::Api {
            status: 429,
            message: "Resource has been exhausted (e.g. check quota).".to_string(),
        }
    }

    #[tokio::test]
    async fn test_no_credential_top_skills_is_fixed_list() {
        let invoker = Arc::new(ScriptedInvoker::unconfigured());
        let advisor = advisor(invoker.clone());

        let outcome = advisor.top_skills(&profile(), "Science (PCM)").await;

        assert_eq!(
            outcome,
            AiOutcome::Fallback(vec![
                "Problem Solving".to_string(),
                "Communication".to_string(),
                "Time Management".to_string(),
                "Critical Thinking".to_string(),
                "Collaboration".to_string(),
                "Self-Learning".to_string(),
            ])
        );
        assert_eq!(invoker.call_count(), 0);
        assert!(invoker.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_model_result_is_written_through_and_reused() {
        let invoker = Arc::new(ScriptedInvoker::new(vec![Ok(
            r#"{"skills": ["Calculus", "Python"]}"#.to_string(),
        )]));
        let advisor = advisor(invoker.clone());

        let first = advisor.top_skills(&profile(), "Science (PCM)").await;
        let second = advisor.top_skills(&profile(), "Science (PCM)").await;

        assert_eq!(first, second);
        assert!(!first.is_degraded());
        assert_eq!(invoker.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_hit_served_without_credential() {
        let invoker = Arc::new(ScriptedInvoker::unconfigured());
        let advisor = advisor(invoker.clone());
        let cached = vec!["Economics".to_string()];
        advisor
            .cache()
            .set(CachePurpose::Skills, "Commerce", &cached)
            .await
            .unwrap();

        let outcome = advisor.top_skills(&profile(), "Commerce").await;
        assert_eq!(outcome, AiOutcome::Model(cached));
    }

    #[tokio::test]
    async fn test_fallback_is_never_cached() {
        let invoker = Arc::new(ScriptedInvoker::new(vec![Err(quota_error())]));
        let advisor = advisor(invoker.clone());
        let courses = catalog::courses_for_stream("Commerce");

        let outcome = advisor.score_courses(&profile(), "Commerce", &courses).await;
        assert!(outcome.is_degraded());
        assert_eq!(outcome.value()[0].score, 55);

        let cached: Option<Vec<ScoredCourse>> = advisor
            .cache()
            .get(CachePurpose::CourseScores, "Commerce")
            .await
            .unwrap();
        assert_eq!(cached, None);
    }

    #[tokio::test]
    async fn test_prose_reply_scores_courses_by_decay() {
        let invoker = Arc::new(ScriptedInvoker::new(vec![Ok(
            "I think all of these are great options for you!".to_string(),
        )]));
        let advisor = advisor(invoker);
        let courses = catalog::courses_for_stream("Science (PCB)");

        let outcome = advisor.score_courses(&profile(), "Science (PCB)", &courses).await;

        assert_eq!(
            outcome,
            AiOutcome::Fallback(fallbacks::decayed_scores(&courses, &fallbacks::OUTPUT_DECAY))
        );
    }

    #[tokio::test]
    async fn test_fenced_scores_are_clamped() {
        let invoker = Arc::new(ScriptedInvoker::new(vec![Ok(
            "Sure! ```json\n[{\"course\":\"X\",\"score\":150,\"reason\":\"ok\"}]\n```".to_string(),
        )]));
        let advisor = advisor(invoker);

        let outcome = advisor
            .score_courses(&profile(), "Science (PCM)", &["X".to_string()])
            .await;

        assert_eq!(
            outcome,
            AiOutcome::Model(vec![ScoredCourse {
                course: "X".to_string(),
                score: 100,
                reason: "ok".to_string(),
            }])
        );
    }

    #[tokio::test]
    async fn test_concurrent_misses_invoke_once() {
        let invoker = Arc::new(
            ScriptedInvoker::new(vec![Ok(r#"{"skills": ["Research"]}"#.to_string())])
                .with_delay(Duration::from_millis(30)),
        );
        let advisor = advisor(invoker.clone());
        let p = profile();

        let (a, b) = tokio::join!(
            advisor.top_skills(&p, "Arts / Humanities"),
            advisor.top_skills(&p, "Arts / Humanities"),
        );

        assert_eq!(a, b);
        assert_eq!(invoker.call_count(), 1);
    }

    #[tokio::test]
    async fn test_chat_quota_apology() {
        let invoker = Arc::new(ScriptedInvoker::new(vec![Err(quota_error())]));
        let advisor = advisor(invoker);

        let outcome = advisor.chat("Which course suits me?", None).await;
        assert_eq!(
            outcome,
            AiOutcome::Fallback(fallbacks::chat_reply(&AiFailure::from(quota_error())))
        );
    }

    #[tokio::test]
    async fn test_dashboard_joins_both_results() {
        let invoker = Arc::new(ScriptedInvoker::unconfigured());
        let advisor = advisor(invoker);

        let dashboard = advisor.dashboard(&profile(), "Commerce").await;

        assert_eq!(dashboard.stream, "Commerce");
        assert_eq!(dashboard.top_skills.value(), &fallbacks::top_skills());
        assert_eq!(dashboard.course_scores.value().len(), 5);
        assert_eq!(
            dashboard.course_scores.value()[1].reason,
            fallbacks::CALL_FAILURE_DECAY.reason
        );
    }

    #[tokio::test]
    async fn test_custom_course_list_bypasses_cache() {
        let invoker = Arc::new(ScriptedInvoker::new(vec![
            Ok(r#"[{"course":"X","score":70,"reason":"fit"}]"#.to_string()),
            Ok(r#"[{"course":"Y","score":80,"reason":"a"},{"course":"Z","score":60,"reason":"b"}]"#
                .to_string()),
        ]));
        let advisor = advisor(invoker.clone());
        let p = profile();

        let first = advisor.score_courses(&p, "Commerce", &["X".to_string()]).await;
        let second = advisor
            .score_courses(&p, "Commerce", &["Y".to_string(), "Z".to_string()])
            .await;

        assert_eq!(first.value()[0].course, "X");
        let names: Vec<&str> = second.value().iter().map(|c| c.course.as_str()).collect();
        assert_eq!(names, ["Y", "Z"]);
        assert!(!second.is_degraded());
        assert_eq!(invoker.call_count(), 2);

        let cached: Option<Vec<ScoredCourse>> = advisor
            .cache()
            .get(CachePurpose::CourseScores, "Commerce")
            .await
            .unwrap();
        assert_eq!(cached, None);
    }

    #[tokio::test]
    async fn test_catalog_course_scores_are_reused() {
        let courses = catalog::courses_for_stream("Commerce");
        let reply = serde_json::to_string(
            &courses
                .iter()
                .map(|c| serde_json::json!({ "course": c, "score": 75, "reason": "fit" }))
                .collect::<Vec<_>>(),
        )
        .unwrap();
        let invoker = Arc::new(ScriptedInvoker::new(vec![Ok(reply)]));
        let advisor = advisor(invoker.clone());

        let first = advisor.score_courses(&profile(), "Commerce", &courses).await;
        let second = advisor.score_courses(&profile(), "Commerce", &courses).await;

        assert!(!first.is_degraded());
        assert_eq!(first, second);
        assert_eq!(invoker.call_count(), 1);
    }

    #[tokio::test]
    async fn test_score_courses_without_courses_skips_model() {
        let invoker = Arc::new(ScriptedInvoker::new(vec![]));
        let advisor = advisor(invoker.clone());

        let outcome = advisor.score_courses(&profile(), "Vocational", &[]).await;
        assert_eq!(outcome, AiOutcome::Fallback(Vec::new()));
        assert_eq!(invoker.call_count(), 0);
    }

    #[tokio::test]
    async fn test_alerts_prompt_reaches_invoker() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let invoker = Arc::new(ScriptedInvoker::new(vec![Ok(
            r#"[{"title":"JEE Main registration","message":"Opens soon","type":"deadline","priority":"high","date":"2026-11-01"}]"#
                .to_string(),
        )]));
        let advisor = advisor(invoker.clone());

        let outcome = advisor.smart_alerts(&profile(), today).await;

        assert!(!outcome.is_degraded());
        assert_eq!(outcome.value()[0].alert_type, "deadline");
        assert!(invoker.prompts.lock().unwrap()[0].contains("2026-10-18"));
    }
}
