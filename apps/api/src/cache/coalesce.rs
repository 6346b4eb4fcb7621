use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as KeyLock, OwnedMutexGuard};

type Inflight = Arc<Mutex<HashMap<String, Arc<KeyLock<()>>>>>;

/// Single-flight fill locks, one per cache key.
///
/// The second caller for a key waits for the first fill to finish and then
/// finds the entry already cached. An entry lives only while someone holds or
/// waits on its lock; the last [`FillGuard`] to drop removes it.
#[derive(Default)]
pub struct FillLocks {
    inflight: Inflight,
}

impl FillLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, key: &str) -> FillGuard {
        let lock = {
            let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(
                inflight
                    .entry(key.to_string())
                    .or_insert_with(|| Arc::new(KeyLock::new(()))),
            )
        };
        let held = Arc::clone(&lock).lock_owned().await;
        FillGuard {
            key: key.to_string(),
            lock,
            held: Some(held),
            inflight: Arc::clone(&self.inflight),
        }
    }
}

/// Held for the duration of one fill.
pub struct FillGuard {
    key: String,
    lock: Arc<KeyLock<()>>,
    held: Option<OwnedMutexGuard<()>>,
    inflight: Inflight,
}

impl Drop for FillGuard {
    fn drop(&mut self) {
        self.held.take();
        // Clones are only taken under the map lock, so a count of two (map
        // plus this guard) means nobody else holds or awaits this key.
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        if Arc::strong_count(&self.lock) == 2 {
            inflight.remove(&self.key);
        }
    }
}
