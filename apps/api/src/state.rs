use crate::config::Config;
use crate::guidance::CareerAdvisor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the model invoker and the AI result cache.
    pub advisor: CareerAdvisor,
    pub config: Config,
}
