mod cache;
mod config;
mod errors;
mod guidance;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::store::RedisStore;
use crate::cache::AiCache;
use crate::config::Config;
use crate::guidance::CareerAdvisor;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerGuide API v{}", env!("CARGO_PKG_VERSION"));

    // Model credential is resolved once here and never re-read
    let model_config = config.model_config();
    if !model_config.is_configured() {
        warn!("GEMINI_API_KEY not set: every guidance call will serve its fallback");
    }
    let llm = GeminiClient::new(model_config)?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let cache = match &config.redis_url {
        Some(url) => {
            let redis = RedisStore::new(url, &config.cache_namespace)?;
            info!("Redis cache initialized (namespace: {})", config.cache_namespace);
            AiCache::new(Arc::new(redis))
        }
        None => {
            info!("REDIS_URL not set: using in-memory cache");
            AiCache::in_memory()
        }
    };

    let state = AppState {
        advisor: CareerAdvisor::new(Arc::new(llm), cache),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
