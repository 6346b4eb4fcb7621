//! AI-backed guidance use cases for students choosing a stream, course, and career.

pub mod advisor;
pub mod catalog;
pub mod fallbacks;
pub mod handlers;
pub mod normalize;
pub mod outcome;
pub mod prompts;
pub mod types;

pub use advisor::CareerAdvisor;
