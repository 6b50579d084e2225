use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Per-slug async locks serializing reconcile-and-write for one repository.
#[derive(Default)]
pub(crate) struct SlugLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl SlugLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `slug`.
    pub async fn lock(&self, slug: &str) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut locks = self.locks.lock();
            // Entries only referenced by the map are idle
            locks.retain(|_, m| Arc::strong_count(m) > 1);
            Arc::clone(locks.entry(slug.to_string()).or_default())
        };
        mutex.lock_owned().await
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }
}
