//! Per-event mutual exclusion.
//!
//! Purchases against the same event queue on one async mutex; purchases on
//! different events never contend. Entries nobody holds or waits on are
//! pruned on the next acquisition.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of per-event locks.
#[derive(Debug, Default)]
pub struct EventLocks {
    locks: Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>,
}

impl EventLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `event_id`. Access is released when the
    /// returned guard is dropped.
    pub async fn acquire(&self, event_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(event_id).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of events with a live lock entry.
    pub fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_same_event_is_exclusive() {
        // Arrange
        let locks = Arc::new(EventLocks::new());
        let guard = locks.acquire(1).await;

        // Act
        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move { locks.acquire(1).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        // Assert
        assert!(!contender.is_finished());
        drop(guard);
        let second = tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
        drop(second);
    }

    #[tokio::test]
    async fn test_different_events_do_not_contend() {
        let locks = EventLocks::new();
        let _first = locks.acquire(1).await;

        let second = tokio::time::timeout(Duration::from_millis(100), locks.acquire(2)).await;

        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_idle_entries_are_pruned() {
        let locks = EventLocks::new();
        drop(locks.acquire(1).await);
        drop(locks.acquire(2).await);

        let _held = locks.acquire(3).await;

        assert_eq!(locks.tracked(), 1);
    }
}
