//! Client-Side Cache: AI results per (purpose, stream), persisted through a
//! pluggable [`CacheStore`].
//!
//! Entries are wrapped in a versioned envelope `{"version":1,"value":..}`;
//! an entry with any other version reads as absent. Callers write only
//! model-produced results, never fallbacks.

pub mod coalesce;
pub mod store;

use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::cache::coalesce::{FillGuard, FillLocks};
use crate::cache::store::{CacheStore, MemoryStore};

pub const ENVELOPE_VERSION: u64 = 1;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("cache entry serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("unknown cache purpose: {0}")]
    UnknownPurpose(String),
}

/// Which use case an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CachePurpose {
    Skills,
    CourseScores,
    Careers,
}

impl CachePurpose {
    pub const ALL: [CachePurpose; 3] = [
        CachePurpose::Skills,
        CachePurpose::CourseScores,
        CachePurpose::Careers,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CachePurpose::Skills => "ai_skills",
            CachePurpose::CourseScores => "ai_course_scores",
            CachePurpose::Careers => "ai_careers",
        }
    }
}

impl FromStr for CachePurpose {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        CachePurpose::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CacheError::UnknownPurpose(s.to_string()))
    }
}

/// `"<purpose>_<stream>"`
pub fn cache_key(purpose: CachePurpose, stream: &str) -> String {
    format!("{}_{}", purpose.as_str(), stream.trim())
}

/// Splits a key back into purpose and stream. Purposes are matched
/// longest-first, so no purpose can shadow another that extends it.
fn parse_key(key: &str) -> Option<(CachePurpose, &str)> {
    let mut purposes = CachePurpose::ALL;
    purposes.sort_by_key(|p| std::cmp::Reverse(p.as_str().len()));
    purposes.into_iter().find_map(|p| {
        key.strip_prefix(p.as_str())?
            .strip_prefix('_')
            .map(|stream| (p, stream))
    })
}

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    version: u64,
    value: &'a T,
}

#[derive(Deserialize)]
struct EnvelopeIn<T> {
    value: T,
}

#[derive(Clone)]
pub struct AiCache {
    store: Arc<dyn CacheStore>,
    fills: Arc<FillLocks>,
}

impl AiCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            fills: Arc::new(FillLocks::new()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        purpose: CachePurpose,
        stream: &str,
    ) -> Result<Option<T>, CacheError> {
        let key = cache_key(purpose, stream);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(None);
        };

        let entry: Value = serde_json::from_str(&raw)?;
        let version = entry.get("version").and_then(Value::as_u64);
        if version != Some(ENVELOPE_VERSION) {
            debug!("Ignoring cache entry {key} with version {version:?}");
            return Ok(None);
        }

        let envelope: EnvelopeIn<T> = serde_json::from_value(entry)?;
        Ok(Some(envelope.value))
    }

    pub async fn set<T: Serialize>(
        &self,
        purpose: CachePurpose,
        stream: &str,
        value: &T,
    ) -> Result<(), CacheError> {
        let key = cache_key(purpose, stream);
        let raw = serde_json::to_string(&EnvelopeOut {
            version: ENVELOPE_VERSION,
            value,
        })?;
        self.store.set(&key, raw).await?;
        debug!("Cached {key}");
        Ok(())
    }

    /// Removes matching entries. `None` matches everything on that axis.
    /// Returns the number of entries removed.
    pub async fn clear(
        &self,
        purpose: Option<CachePurpose>,
        stream: Option<&str>,
    ) -> Result<usize, CacheError> {
        let stream = stream.map(str::trim);
        let doomed: Vec<String> = self
            .store
            .keys()
            .await?
            .into_iter()
            .filter(|key| match parse_key(key) {
                Some((p, s)) => {
                    purpose.map_or(true, |want| want == p) && stream.map_or(true, |want| want == s)
                }
                None => false,
            })
            .collect();

        for key in &doomed {
            self.store.remove(key).await?;
        }
        Ok(doomed.len())
    }

    /// Serializes fills of one key; hold the guard across lookup, invoke and write.
    pub async fn lock_fill(&self, purpose: CachePurpose, stream: &str) -> FillGuard {
        self.fills.acquire(&cache_key(purpose, stream)).await
    }

    #[cfg(test)]
    pub(crate) async fn put_raw(&self, purpose: CachePurpose, stream: &str, raw: &str) {
        self.store
            .set(&cache_key(purpose, stream), raw.to_string())
            .await
            .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guidance::types::ScoredCourse;

    fn skills() -> Vec<String> {
        vec!["Calculus".to_string(), "Python".to_string()]
    }

    #[tokio::test]
    async fn test_set_then_get_round_trips() {
        let cache = AiCache::in_memory();
        cache
            .set(CachePurpose::Skills, "Science (PCM)", &skills())
            .await
            .unwrap();

        let hit: Option<Vec<String>> = cache.get(CachePurpose::Skills, "Science (PCM)").await.unwrap();
        assert_eq!(hit, Some(skills()));

        let other: Option<Vec<String>> = cache.get(CachePurpose::Careers, "Science (PCM)").await.unwrap();
        assert_eq!(other, None);
    }

    #[tokio::test]
    async fn test_clear_everything_empties_cache() {
        let cache = AiCache::in_memory();
        cache.set(CachePurpose::Skills, "Commerce", &skills()).await.unwrap();
        cache.set(CachePurpose::Careers, "Commerce", &skills()).await.unwrap();

        assert_eq!(cache.clear(None, None).await.unwrap(), 2);
        let hit: Option<Vec<String>> = cache.get(CachePurpose::Skills, "Commerce").await.unwrap();
        assert_eq!(hit, None);
    }

    #[tokio::test]
    async fn test_clear_by_purpose_and_stream() {
        let cache = AiCache::in_memory();
        let scores = vec![ScoredCourse {
            course: "B.Com (General/Hons.)".to_string(),
            score: 70,
            reason: "fit".to_string(),
        }];
        cache.set(CachePurpose::CourseScores, "Commerce", &scores).await.unwrap();
        cache.set(CachePurpose::Skills, "Commerce", &skills()).await.unwrap();
        cache.set(CachePurpose::Skills, "Science (PCB)", &skills()).await.unwrap();

        assert_eq!(cache.clear(Some(CachePurpose::Skills), Some("Commerce")).await.unwrap(), 1);
        assert_eq!(cache.clear(None, Some("Commerce")).await.unwrap(), 1);

        let kept: Option<Vec<String>> = cache.get(CachePurpose::Skills, "Science (PCB)").await.unwrap();
        assert_eq!(kept, Some(skills()));
    }

    #[tokio::test]
    async fn test_other_envelope_version_reads_as_absent() {
        let cache = AiCache::in_memory();
        cache
            .put_raw(CachePurpose::Skills, "Commerce", r#"{"version":2,"value":["x"]}"#)
            .await;
        let hit: Option<Vec<String>> = cache.get(CachePurpose::Skills, "Commerce").await.unwrap();
        assert_eq!(hit, None);

        cache
            .put_raw(CachePurpose::Skills, "Commerce", r#"["bare", "legacy"]"#)
            .await;
        let hit: Option<Vec<String>> = cache.get(CachePurpose::Skills, "Commerce").await.unwrap();
        assert_eq!(hit, None);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_an_error() {
        let cache = AiCache::in_memory();
        cache.put_raw(CachePurpose::Skills, "Commerce", "{not json").await;
        let result: Result<Option<Vec<String>>, _> = cache.get(CachePurpose::Skills, "Commerce").await;
        assert!(matches!(result, Err(CacheError::Serde(_))));
    }

    #[test]
    fn test_key_format_and_parsing() {
        assert_eq!(cache_key(CachePurpose::CourseScores, " Commerce "), "ai_course_scores_Commerce");
        assert_eq!(
            parse_key("ai_course_scores_Arts / Humanities"),
            Some((CachePurpose::CourseScores, "Arts / Humanities"))
        );
        assert_eq!(parse_key("ai_unknown_Commerce"), None);
        assert_eq!("ai_careers".parse::<CachePurpose>().unwrap(), CachePurpose::Careers);
        assert!("careers".parse::<CachePurpose>().is_err());
    }
}
