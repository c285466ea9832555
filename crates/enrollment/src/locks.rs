//! Per-user mutual exclusion.

use std::collections::HashMap;
use std::sync::Arc;

use eduquest_core::UserId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async lock per user.
///
/// Operations on different users run in parallel; operations on the same
/// user run one at a time in arrival order.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl UserLocks {
    /// Empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `user_id`'s state.
    pub async fn acquire(&self, user_id: UserId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Entries nobody holds or waits on can go.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(user_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of users with a live lock entry.
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    /// Whether no user currently holds a lock.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
