/// Cached identity provider key set
///
/// The key set is fetched over HTTP and kept for a configurable time-to-live.
/// Concurrent requests that find the cache stale trigger a single fetch; the
/// others wait on the lock and reuse the result.
///
/// A token signed with a key ID missing from the cached set forces one early
/// refetch, rate limited by [`MIN_REFRESH_INTERVAL`], so key rotation on the
/// provider side is picked up without waiting for the TTL.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use ttracker_shared::auth::jwks::JwksCache;
///
/// # async fn example() -> Result<(), ttracker_shared::auth::jwks::JwksError> {
/// let cache = Arc::new(JwksCache::new(
///     "https://issuer.example.com/.well-known/jwks.json",
///     Duration::from_secs(3600),
///     Duration::from_secs(10),
/// )?);
/// cache.clone().spawn_background_refresh();
///
/// let keys = cache.get().await?;
/// println!("{} keys", keys.keys.len());
/// # Ok(())
/// # }
/// ```

use jsonwebtoken::jwk::{Jwk, JwkSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Minimum age of the cached set before an unknown key ID forces a refetch
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Error type for key set retrieval
#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    /// Request failed, returned a non-success status or an unparsable body
    #[error("Failed to fetch key set: {0}")]
    Fetch(#[from] reqwest::Error),
}

#[derive(Debug)]
struct CachedKeys {
    keys: Arc<JwkSet>,
    fetched_at: Instant,
}

/// Time-bounded cache of the provider's signing keys
#[derive(Debug)]
pub struct JwksCache {
    url: String,
    ttl: Duration,
    client: reqwest::Client,
    cached: RwLock<Option<CachedKeys>>,
}

impl JwksCache {
    /// Creates an empty cache; nothing is fetched until first use
    pub fn new(url: impl Into<String>, ttl: Duration, timeout: Duration) -> Result<Self, JwksError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            url: url.into(),
            ttl,
            client,
            cached: RwLock::new(None),
        })
    }

    /// Gets the key set, fetching it when absent or older than the TTL
    pub async fn get(&self) -> Result<Arc<JwkSet>, JwksError> {
        {
            let cached = self.cached.read().await;
            if let Some(entry) = cached.as_ref() {
                if entry.fetched_at.elapsed() < self.ttl {
                    return Ok(entry.keys.clone());
                }
            }
        }

        let mut cached = self.cached.write().await;

        // Another request may have refreshed while we waited for the lock.
        if let Some(entry) = cached.as_ref() {
            if entry.fetched_at.elapsed() < self.ttl {
                return Ok(entry.keys.clone());
            }
        }

        let keys = self.fetch().await?;
        *cached = Some(CachedKeys {
            keys: keys.clone(),
            fetched_at: Instant::now(),
        });

        Ok(keys)
    }

    /// Finds the key with the given ID
    ///
    /// Returns `Ok(None)` when the key is absent even after any refetch that
    /// the rate limit allows.
    pub async fn get_key(&self, kid: &str) -> Result<Option<Jwk>, JwksError> {
        let keys = self.get().await?;
        if let Some(jwk) = keys.find(kid) {
            return Ok(Some(jwk.clone()));
        }

        let mut cached = self.cached.write().await;
        if let Some(entry) = cached.as_ref() {
            if let Some(jwk) = entry.keys.find(kid) {
                return Ok(Some(jwk.clone()));
            }
            if entry.fetched_at.elapsed() < MIN_REFRESH_INTERVAL {
                debug!(kid = %kid, "Unknown key ID, key set refreshed recently");
                return Ok(None);
            }
        }

        info!(kid = %kid, "Unknown key ID, refetching key set");
        let keys = self.fetch().await?;
        let jwk = keys.find(kid).cloned();
        *cached = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });

        Ok(jwk)
    }

    /// Fetches the key set and replaces the cached copy
    pub async fn refresh(&self) -> Result<(), JwksError> {
        let keys = self.fetch().await?;
        *self.cached.write().await = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });
        Ok(())
    }

    /// Refreshes the cache every TTL in a background task
    ///
    /// A failed refresh is logged and the previous set stays in place until
    /// the next attempt or the next request-driven fetch.
    pub fn spawn_background_refresh(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.ttl);
            loop {
                interval.tick().await;
                match self.refresh().await {
                    Ok(()) => debug!(url = %self.url, "Key set refreshed"),
                    Err(e) => warn!(url = %self.url, error = %e, "Key set refresh failed"),
                }
            }
        })
    }

    async fn fetch(&self) -> Result<Arc<JwkSet>, JwksError> {
        debug!(url = %self.url, "Fetching key set");

        let keys = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;

        debug!(keys = keys.keys.len(), "Key set fetched");
        Ok(Arc::new(keys))
    }
}
