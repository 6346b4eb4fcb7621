// Prompt templates and builders for every guidance use case.
// Builders are pure: same inputs, same prompt text. All placeholders are
// filled in a single pass, so user-supplied text is never rescanned.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::llm_client::prompts::{COUNSELOR_ROLE, JSON_ONLY_INSTRUCTION};
use crate::models::profile::{ProfileField, QuizAnswerSet, UserProfile};

const CHAT_PROFILE_FIELDS: &[ProfileField] = &[
    ProfileField::Name,
    ProfileField::Age,
    ProfileField::Education,
    ProfileField::Interests,
    ProfileField::CareerGoals,
    ProfileField::Skills,
    ProfileField::Location,
    ProfileField::QuizResults,
];

const QUIZ_PROFILE_FIELDS: &[ProfileField] = &[
    ProfileField::Education,
    ProfileField::Interests,
    ProfileField::Location,
];

const INSIGHT_PROFILE_FIELDS: &[ProfileField] = &[
    ProfileField::Education,
    ProfileField::Skills,
    ProfileField::Location,
    ProfileField::CareerGoals,
];

/// Chat prompt. Replace: {role}, {profile_block}, {message}
pub const CHAT_PROMPT_TEMPLATE: &str = r#"{role}
Provide helpful, personalized career guidance based on the user's question and their profile. Be friendly, informative, and specific.
{profile_block}
User's question: {message}

Please provide a response that includes:
1. A direct answer to their question
2. Relevant career insights based on their profile
3. Personalized advice considering their background
4. Next steps they can take

Keep your response conversational and under 300 words."#;

/// Quiz analysis prompt. Replace: {role}, {profile_block}, {answers_json}, {json_directive}
pub const QUIZ_ANALYSIS_PROMPT_TEMPLATE: &str = r#"{role}
Analyze these quiz answers and provide personalized career recommendations.
{profile_block}
Quiz Answers (question index -> chosen option): {answers_json}

Provide:
1. Top 3 career recommendations based on their profile and quiz results
2. Suggested courses/streams that align with their background
3. Key skills to develop considering their current level
4. Personality insights from the quiz responses
5. A personalized study plan
6. Recommended colleges/universities based on their location and interests

Return a JSON object with this EXACT structure:
{
  "careers": ["career1", "career2", "career3"],
  "courses": ["course1", "course2"],
  "skills": ["skill1", "skill2", "skill3"],
  "personality": "description",
  "recommendations": "detailed explanation",
  "studyPlan": ["step1", "step2", "step3"],
  "colleges": ["college1", "college2", "college3"]
}

{json_directive}"#;

/// College recommendation prompt. Replace: {role}, {profile_block}, {json_directive}
pub const COLLEGE_PROMPT_TEMPLATE: &str = r#"{role}
Based on this student profile, recommend colleges and courses.

Profile:
{profile_block}

Consider their location preferences, academic background, career goals, financial situation, interests, skills and quiz results.

Return a JSON object with this EXACT structure:
{
  "colleges": [
    {
      "name": "College Name",
      "location": "City, State",
      "courses": ["Course1", "Course2"],
      "reason": "Why this college fits their profile",
      "rating": 4.5,
      "admissionDifficulty": "Easy|Medium|Hard",
      "fees": "₹X-Y LPA",
      "placementRate": "X%",
      "topRecruiters": ["Company1", "Company2"]
    }
  ],
  "courses": ["Recommended Course 1", "Recommended Course 2"],
  "insights": "Personalized insights about the recommendations",
  "applicationTips": ["tip1", "tip2", "tip3"],
  "scholarships": ["scholarship1", "scholarship2"]
}

{json_directive}"#;

/// Career insight prompt. Replace: {role}, {profile_block}, {json_directive}, {career}
pub const CAREER_INSIGHT_PROMPT_TEMPLATE: &str = r#"{role}
Provide detailed, personalized insights about the career: {career}
{profile_block}
Include:
1. Job description tailored to their background
2. Required skills and how they can develop them
3. Salary range in India based on their location
4. Growth prospects considering their profile
5. Educational requirements and pathways
6. Top companies hiring in their area
7. A personalized career roadmap
8. A skills gap analysis

Return a JSON object with this EXACT structure:
{
  "description": "personalized job description",
  "skills": ["skill1", "skill2"],
  "salary": "₹X-Y LPA",
  "growth": "growth prospects",
  "education": "educational requirements",
  "companies": ["company1", "company2"],
  "pros": ["advantage1", "advantage2"],
  "cons": ["challenge1", "challenge2"],
  "roadmap": ["step1", "step2", "step3"],
  "skillsGap": ["skill1 to develop", "skill2 to improve"],
  "timeline": "estimated timeline to achieve this career"
}

{json_directive}"#;

/// Alert generation prompt. Replace: {role}, {profile_block}, {current_date}, {json_directive}
pub const ALERTS_PROMPT_TEMPLATE: &str = r#"{role}
Generate personalized alerts for a student with this profile:
{profile_block}

Current Date: {current_date}

Generate relevant alerts such as:
- Application deadlines for colleges matching their profile
- Scholarship opportunities they are eligible for
- Career events in their area
- Skill development opportunities
- Exam dates relevant to their goals
- Internship opportunities
- Career fairs and networking events

Return a JSON ARRAY with this EXACT structure:
[
  {
    "title": "Alert Title",
    "message": "Personalized alert message",
    "type": "deadline|scholarship|event|reminder|exam|internship",
    "priority": "high|medium|low",
    "date": "YYYY-MM-DD",
    "time": "HH:MM",
    "actionRequired": "What they need to do",
    "relatedTo": "college|career|skill|exam"
  }
]

{json_directive}"#;

/// Study plan prompt. Replace: {role}, {profile_block}, {json_directive}, {goal}
pub const STUDY_PLAN_PROMPT_TEMPLATE: &str = r#"{role}
Generate a personalized study plan for this student.

Profile:
{profile_block}

Goal: {goal}

Include a weekly schedule, resources to use, milestones, skills to focus on, practice exercises and a timeline.

Return a JSON object with this EXACT structure:
{
  "planName": "Study Plan Name",
  "duration": "X months/weeks",
  "schedule": [
    {
      "week": 1,
      "topics": ["topic1", "topic2"],
      "activities": ["activity1", "activity2"],
      "resources": ["resource1", "resource2"],
      "milestone": "milestone description"
    }
  ],
  "resources": ["resource1", "resource2"],
  "skills": ["skill1", "skill2"],
  "timeline": "detailed timeline",
  "tips": ["tip1", "tip2"]
}

{json_directive}"#;

/// Career list prompt. Replace: {role}, {profile_block}, {count}, {json_directive}, {stream}
pub const CAREERS_PROMPT_TEMPLATE: &str = r#"{role}
Suggest the {count} careers that best fit this student.

Profile:
{profile_block}

Stream: {stream}

Score each career's match with the student from 0 to 100 and give a one-sentence personalized reason.
Pick "icon" from: briefcase, trending-up, dollar-sign, users, code, brain, cloud, palette, bar-chart, megaphone.

Return a JSON ARRAY with this EXACT structure:
[
  {
    "title": "Career Title",
    "description": "What the job involves",
    "salary": "₹X-Y LPA",
    "demand": "Very High|High|Medium|Low",
    "skills": ["skill1", "skill2", "skill3"],
    "growth": "growth prospects",
    "matchScore": 82,
    "personalizedReason": "Why it fits this student",
    "icon": "code"
  }
]

{json_directive}"#;

/// Skill ranking prompt. Replace: {role}, {profile_block}, {json_directive}, {stream}
pub const SKILLS_PROMPT_TEMPLATE: &str = r#"{role}
Given this student's profile and their chosen stream, list the top 6 skills they should focus on next.

Profile:
{profile_block}

Stream: {stream}

Return a JSON object with this EXACT structure:
{ "skills": ["skill1", "skill2", "skill3", "skill4", "skill5", "skill6"] }

{json_directive}"#;

/// Course scoring prompt. Replace: {role}, {profile_block}, {json_directive}, {stream}, {courses_json}
pub const COURSE_SCORING_PROMPT_TEMPLATE: &str = r#"{role}
Score each course from 0 to 100 for this student and give a brief personalized reason (at most 20 words).

Profile:
{profile_block}

Stream: {stream}
Courses: {courses_json}

Return a JSON ARRAY with one object per course, in the same order:
[{ "course": "course title", "score": 78, "reason": "short reason" }]

{json_directive}"#;

/// Profile block for prompts that take an optional profile; empty when absent.
fn optional_profile_block(
    heading: &str,
    profile: Option<&UserProfile>,
    fields: &[ProfileField],
) -> String {
    match profile {
        Some(p) => format!("\n{heading}:\n{}\n", p.render(fields)),
        None => String::new(),
    }
}

fn full_profile(profile: &UserProfile) -> String {
    profile.render(&ProfileField::ALL)
}

fn to_json_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"));

/// Fills every `{name}` in one pass over the template. Substituted text is
/// never rescanned, so braces inside user input come through verbatim.
/// Names missing from `values` are left as written.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

pub fn build_chat_prompt(message: &str, profile: Option<&UserProfile>) -> String {
    let profile_block = optional_profile_block("User Profile", profile, CHAT_PROFILE_FIELDS);
    fill(
        CHAT_PROMPT_TEMPLATE,
        &[
            ("role", COUNSELOR_ROLE),
            ("profile_block", &profile_block),
            ("message", message.trim()),
        ],
    )
}

pub fn build_quiz_analysis_prompt(
    answers: &QuizAnswerSet,
    profile: Option<&UserProfile>,
) -> String {
    let profile_block = optional_profile_block("User Profile Context", profile, QUIZ_PROFILE_FIELDS);
    fill(
        QUIZ_ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("role", COUNSELOR_ROLE),
            ("json_directive", JSON_ONLY_INSTRUCTION),
            ("profile_block", &profile_block),
            ("answers_json", &answers.to_json()),
        ],
    )
}

pub fn build_college_prompt(profile: &UserProfile) -> String {
    fill(
        COLLEGE_PROMPT_TEMPLATE,
        &[
            ("role", COUNSELOR_ROLE),
            ("json_directive", JSON_ONLY_INSTRUCTION),
            ("profile_block", &full_profile(profile)),
        ],
    )
}

pub fn build_career_insight_prompt(career: &str, profile: Option<&UserProfile>) -> String {
    let profile_block = optional_profile_block("User Profile", profile, INSIGHT_PROFILE_FIELDS);
    fill(
        CAREER_INSIGHT_PROMPT_TEMPLATE,
        &[
            ("role", COUNSELOR_ROLE),
            ("json_directive", JSON_ONLY_INSTRUCTION),
            ("profile_block", &profile_block),
            ("career", career.trim()),
        ],
    )
}

pub fn build_alerts_prompt(profile: &UserProfile, today: NaiveDate) -> String {
    fill(
        ALERTS_PROMPT_TEMPLATE,
        &[
            ("role", COUNSELOR_ROLE),
            ("json_directive", JSON_ONLY_INSTRUCTION),
            ("current_date", &today.format("%Y-%m-%d").to_string()),
            ("profile_block", &full_profile(profile)),
        ],
    )
}

pub fn build_study_plan_prompt(profile: &UserProfile, goal: &str) -> String {
    fill(
        STUDY_PLAN_PROMPT_TEMPLATE,
        &[
            ("role", COUNSELOR_ROLE),
            ("json_directive", JSON_ONLY_INSTRUCTION),
            ("profile_block", &full_profile(profile)),
            ("goal", goal.trim()),
        ],
    )
}

pub fn build_careers_prompt(profile: &UserProfile, stream: &str, count: usize) -> String {
    fill(
        CAREERS_PROMPT_TEMPLATE,
        &[
            ("role", COUNSELOR_ROLE),
            ("json_directive", JSON_ONLY_INSTRUCTION),
            ("count", &count.to_string()),
            ("profile_block", &full_profile(profile)),
            ("stream", stream.trim()),
        ],
    )
}

pub fn build_skills_prompt(profile: &UserProfile, stream: &str) -> String {
    fill(
        SKILLS_PROMPT_TEMPLATE,
        &[
            ("role", COUNSELOR_ROLE),
            ("json_directive", JSON_ONLY_INSTRUCTION),
            ("profile_block", &full_profile(profile)),
            ("stream", stream.trim()),
        ],
    )
}

pub fn build_course_scoring_prompt(
    profile: &UserProfile,
    stream: &str,
    courses: &[String],
) -> String {
    fill(
        COURSE_SCORING_PROMPT_TEMPLATE,
        &[
            ("role", COUNSELOR_ROLE),
            ("json_directive", JSON_ONLY_INSTRUCTION),
            ("profile_block", &full_profile(profile)),
            ("stream", stream.trim()),
            ("courses_json", &to_json_list(courses)),
        ],
    )
}
