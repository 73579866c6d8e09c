/// Key set cache timing tests
///
/// Run against the local key set server from `common` and count how often
/// it is hit. Clock jumps use tokio's paused time; the clock is resumed
/// before any HTTP traffic so request timeouts run on real time.

mod common;

use common::{spawn_jwks_server, KEY_ID};
use std::sync::{atomic::Ordering, Arc};
use std::time::Duration;
use ttracker_shared::auth::jwks::{JwksCache, MIN_REFRESH_INTERVAL};

const TIMEOUT: Duration = Duration::from_secs(5);

/// Moves tokio's clock forward without waiting
async fn jump(by: Duration) {
    tokio::time::pause();
    tokio::time::advance(by).await;
    tokio::time::resume();
}

#[tokio::test]
async fn test_key_set_refetched_after_ttl() {
    let (url, fetches) = spawn_jwks_server().await;
    let ttl = Duration::from_secs(60);
    let cache = JwksCache::new(url, ttl, TIMEOUT).unwrap();

    cache.get().await.unwrap();
    cache.get().await.unwrap();
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    jump(ttl - Duration::from_secs(1)).await;
    cache.get().await.unwrap();
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    jump(Duration::from_secs(2)).await;
    let keys = cache.get().await.unwrap();
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
    assert!(keys.find(KEY_ID).is_some());
}

#[tokio::test]
async fn test_unknown_key_refetch_is_rate_limited() {
    let (url, fetches) = spawn_jwks_server().await;
    let cache = JwksCache::new(url, Duration::from_secs(3600), TIMEOUT).unwrap();
    let count = || fetches.load(Ordering::SeqCst);

    assert!(cache.get_key("rotated-key").await.unwrap().is_none());
    assert_eq!(count(), 1);

    // Set is younger than the minimum interval
    assert!(cache.get_key("rotated-key").await.unwrap().is_none());
    assert_eq!(count(), 1);

    jump(MIN_REFRESH_INTERVAL + Duration::from_secs(1)).await;
    assert!(cache.get_key("rotated-key").await.unwrap().is_none());
    assert_eq!(count(), 2);

    // The refetch restarted the interval
    assert!(cache.get_key("rotated-key").await.unwrap().is_none());
    assert_eq!(count(), 2);

    // Known keys never trigger a refetch
    jump(MIN_REFRESH_INTERVAL + Duration::from_secs(1)).await;
    assert!(cache.get_key(KEY_ID).await.unwrap().is_some());
    assert_eq!(count(), 2);
}

#[tokio::test]
async fn test_background_refresh() {
    let (url, fetches) = spawn_jwks_server().await;
    let cache = Arc::new(JwksCache::new(url, Duration::from_millis(100), TIMEOUT).unwrap());

    let handle = cache.clone().spawn_background_refresh();

    let mut waited = Duration::ZERO;
    while fetches.load(Ordering::SeqCst) < 3 && waited < TIMEOUT {
        tokio::time::sleep(Duration::from_millis(50)).await;
        waited += Duration::from_millis(50);
    }
    assert!(fetches.load(Ordering::SeqCst) >= 3);

    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());
}
