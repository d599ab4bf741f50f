//! Expiry Sweep Task
//!
//! Background task that periodically removes expired entries from a backend.
//! Lookups already treat expired entries as absent; the sweep only reclaims
//! the memory of entries nobody reads again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::MIN_CLEANUP_INTERVAL;
use crate::store::Backend;

/// Spawns a background task that periodically purges expired entries.
///
/// The task runs until aborted, sleeping for `interval` between sweeps.
/// Intervals shorter than [`MIN_CLEANUP_INTERVAL`] are raised to it. A sweep
/// that fails (for example because the backend has
/// been shut down) is logged and retried on the next tick.
///
/// # Example
/// ```ignore
/// let backend = Arc::new(MemoryBackend::new());
/// let cleanup_handle = spawn_cleanup_task(backend.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(backend: Arc<dyn Backend>, interval: Duration) -> JoinHandle<()> {
    if interval < MIN_CLEANUP_INTERVAL {
        warn!(
            "Expiry sweep interval {:?} is below the minimum, using {:?}",
            interval, MIN_CLEANUP_INTERVAL
        );
    }
    let interval = interval.max(MIN_CLEANUP_INTERVAL);

    tokio::spawn(async move {
        info!("Starting expiry sweep with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            match backend.purge_expired().await {
                Ok(removed) if removed > 0 => {
                    info!("Expiry sweep: removed {} expired entries", removed)
                }
                Ok(_) => debug!("Expiry sweep: no expired entries found"),
                Err(e) => warn!("Expiry sweep failed: {}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .set("expire_soon", b"value".to_vec(), Some(Duration::from_millis(200)))
            .await
            .unwrap();

        let handle = spawn_cleanup_task(backend.clone(), Duration::from_secs(1));

        // Wait for the entry to expire and a sweep to run
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(backend.is_empty().await);
        assert!(backend.keys("*").await.unwrap().is_empty());

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .set("long_lived", b"value".to_vec(), Some(Duration::from_secs(3600)))
            .await
            .unwrap();

        let handle = spawn_cleanup_task(backend.clone(), Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(
            backend.get("long_lived").await.unwrap(),
            Some(b"value".to_vec())
        );

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_survives_shut_down_backend() {
        let backend = Arc::new(MemoryBackend::new());
        backend.shutdown();

        let handle = spawn_cleanup_task(backend, Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(1200)).await;

        assert!(!handle.is_finished(), "Sweep should keep running after errors");
        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let backend = Arc::new(MemoryBackend::new());
        let handle = spawn_cleanup_task(backend, Duration::from_secs(1));

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }

    #[tokio::test]
    async fn test_zero_interval_is_raised_to_minimum() {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .set("expire_soon", b"value".to_vec(), Some(Duration::from_millis(100)))
            .await
            .unwrap();

        let handle = spawn_cleanup_task(backend.clone(), Duration::ZERO);

        // Expired but not yet swept: no sweep runs before the minimum interval
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(backend.stored_len().await, 1);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(backend.stored_len().await, 0);

        handle.abort();
    }
}
