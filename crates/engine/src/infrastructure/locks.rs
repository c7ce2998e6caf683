//! Per-location mutation locks.
//!
//! A command holds the lock of every location it touches for the duration of
//! its validate-and-apply step. Locks are always taken in ascending id order,
//! so two commands spanning the same pair of locations cannot deadlock.

use std::sync::Arc;

use dashmap::DashMap;
use imagind_domain::LocationId;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct LocationLocks {
    locks: DashMap<LocationId, Arc<Mutex<()>>>,
}

/// Held locks; released on drop.
pub struct LocationGuard {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl LocationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, location_id: LocationId) -> Arc<Mutex<()>> {
        let entry = self
            .locks
            .entry(location_id)
            .or_insert_with(|| Arc::new(Mutex::new(())));
        Arc::clone(entry.value())
    }

    pub async fn acquire(&self, locations: &[LocationId]) -> LocationGuard {
        let mut ordered = locations.to_vec();
        ordered.sort();
        ordered.dedup();

        let mut guards = Vec::with_capacity(ordered.len());
        for location_id in &ordered {
            guards.push(self.lock_for(*location_id).lock_owned().await);
        }

        LocationGuard { _guards: guards }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_location_is_mutually_exclusive() {
        let locks = Arc::new(LocationLocks::new());
        let hall = LocationId::new();

        let guard = locks.acquire(&[hall]).await;
        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire(&[hall]).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());
        drop(guard);
        let acquired = tokio::time::timeout(Duration::from_secs(1), contender).await;
        assert!(matches!(acquired, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn opposite_order_requests_do_not_deadlock() {
        let locks = Arc::new(LocationLocks::new());
        let a = LocationId::new();
        let b = LocationId::new();

        let mut tasks = Vec::new();
        for i in 0..20 {
            let locks = Arc::clone(&locks);
            let order = if i % 2 == 0 { [a, b] } else { [b, a] };
            tasks.push(tokio::spawn(async move {
                let _guard = locks.acquire(&order).await;
                tokio::task::yield_now().await;
            }));
        }

        let all = futures_util::future::join_all(tasks);
        let finished = tokio::time::timeout(Duration::from_secs(5), all).await;
        assert!(finished.is_ok());
    }

    #[tokio::test]
    async fn different_locations_do_not_block() {
        let locks = LocationLocks::new();
        let _hall = locks.acquire(&[LocationId::new()]).await;
        let other = tokio::time::timeout(
            Duration::from_millis(100),
            locks.acquire(&[LocationId::new()]),
        )
        .await;
        assert!(other.is_ok());
    }
}
