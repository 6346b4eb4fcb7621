// Shared prompt constants used by every use-case prompt builder.
// Use-case templates live in guidance/prompts.rs.

/// Placeholder substituted for any absent profile field.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Placeholder for a profile that has not taken the quiz yet.
pub const NOT_COMPLETED: &str = "Not completed";

/// Role statement opening every prompt.
pub const COUNSELOR_ROLE: &str = "You are an AI career counselor for students. \
    Give guidance specific to the Indian education system and job market.";

/// Appended to every prompt whose answer is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Respond with valid JSON only, using EXACTLY the keys shown above. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences.";
