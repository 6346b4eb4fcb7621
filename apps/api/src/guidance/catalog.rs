//! Static stream catalog: base course lists, baseline skills, and the quiz
//! option text each stream key is derived from.

use serde::Serialize;

/// One academic stream and its static lookup data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StreamInfo {
    pub key: &'static str,
    /// Full option text shown by the quiz's first question.
    pub quiz_option: &'static str,
    pub courses: &'static [&'static str],
    pub baseline_skills: &'static [&'static str],
}

pub const STREAMS: &[StreamInfo] = &[
    StreamInfo {
        key: "Science (PCM)",
        quiz_option: "Science (PCM – Physics, Chemistry, Maths)",
        courses: &[
            "B.Tech / BE (Engineering)",
            "B.Sc. (Physics/Maths/Data Science)",
            "B.Arch. (Architecture)",
            "BCA (Computer Applications)",
            "Merchant Navy / Defence (NDA, Navy Tech)",
        ],
        baseline_skills: &[
            "Problem Solving",
            "Mathematics",
            "Analytical Thinking",
            "Programming Basics",
            "Physics Fundamentals",
        ],
    },
    StreamInfo {
        key: "Science (PCB)",
        quiz_option: "Science (PCB – Physics, Chemistry, Biology)",
        courses: &[
            "MBBS (Medicine)",
            "BDS (Dentistry)",
            "B.Sc. Nursing / BPT (Physiotherapy)",
            "B.Pharm (Pharmacy)",
            "Allied Medical Sciences (MLT, Radiology, Biotech)",
        ],
        baseline_skills: &[
            "Biology Concepts",
            "Critical Thinking",
            "Empathy & Care",
            "Lab Skills",
            "Chemistry Basics",
        ],
    },
    StreamInfo {
        key: "Commerce",
        quiz_option: "Commerce",
        courses: &[
            "B.Com (General/Hons.)",
            "BBA / BBM (Management)",
            "CA (Chartered Accountancy)",
            "CS (Company Secretary)",
            "Economics (B.A./B.Sc.)",
        ],
        baseline_skills: &[
            "Accounting Basics",
            "Business Communication",
            "Quantitative Aptitude",
            "Economics",
            "Excel/Spreadsheets",
        ],
    },
    StreamInfo {
        key: "Arts / Humanities",
        quiz_option: "Arts / Humanities",
        courses: &[
            "B.A. (History, Pol. Science, Sociology, etc.)",
            "B.A. English / Languages",
            "BFA / Performing Arts",
            "BJMC (Journalism & Mass Communication)",
            "Law (BA LLB, 5 years)",
        ],
        baseline_skills: &[
            "Writing & Communication",
            "Research",
            "Creativity",
            "Public Speaking",
            "Critical Analysis",
        ],
    },
];

pub fn find_stream(key: &str) -> Option<&'static StreamInfo> {
    STREAMS.iter().find(|s| s.key == key.trim())
}

/// Base course list for a stream; empty for unknown streams.
pub fn courses_for_stream(key: &str) -> Vec<String> {
    find_stream(key)
        .map(|s| s.courses.iter().map(|c| c.to_string()).collect())
        .unwrap_or_default()
}

/// Maps the quiz's stream answer (full option text or the bare key) to a stream key.
pub fn stream_key_for_answer(answer: &str) -> Option<&'static str> {
    let answer = answer.trim();
    STREAMS
        .iter()
        .find(|s| s.quiz_option == answer || s.key == answer)
        .map(|s| s.key)
}
