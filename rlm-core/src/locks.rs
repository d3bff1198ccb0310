//! Per-entity operation locks
//!
//! Operations touching the same policy, hold or evidence id run one at a
//! time; operations on different ids proceed concurrently.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Keyed async mutexes
#[derive(Debug, Default)]
pub struct EntityLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a single key
    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let entry = {
            let mut locks = self.locks.lock().await;
            // Drop entries nobody holds or waits on
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        entry.lock_owned().await
    }

    /// Acquire locks for several keys in sorted order
    pub async fn lock_many<'a, I>(&self, keys: I) -> Vec<OwnedMutexGuard<()>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let ordered: BTreeSet<&str> = keys.into_iter().collect();
        let mut guards = Vec::with_capacity(ordered.len());
        for key in ordered {
            guards.push(self.lock(key).await);
        }
        guards
    }

    /// Number of tracked keys
    pub async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}

/// Lock key for a retention policy
pub fn policy_key(id: &str) -> String {
    format!("policy:{}", id)
}

/// Lock key for a legal hold
pub fn hold_key(id: &str) -> String {
    format!("hold:{}", id)
}

/// Lock key for an evidence item
pub fn evidence_key(id: &str) -> String {
    format!("evidence:{}", id)
}
