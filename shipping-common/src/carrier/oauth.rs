//! OAuth2 access-token caching shared by the FedEx and UPS gateways.
//!
//! Both carriers issue short-lived client-credentials tokens. The cache
//! hands out the stored token until shortly before expiry; each gateway owns
//! its own fetch. Interior mutability keeps `create_shipment(&self)` free of
//! visible state changes.

use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Refresh this long before the carrier-reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// A concurrency-safe cache for one gateway's access token.
#[derive(Debug, Default)]
pub(crate) struct TokenCache {
    inner: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token if it is still comfortably valid.
    pub async fn get(&self) -> Option<String> {
        let guard = self.inner.read().await;
        guard
            .as_ref()
            .filter(|t| t.expires_at.saturating_duration_since(Instant::now()) > EXPIRY_MARGIN)
            .map(|t| t.access_token.clone())
    }

    /// Store a freshly issued token with its lifetime in seconds.
    pub async fn store(&self, access_token: String, expires_in_secs: u64) {
        let token = CachedToken {
            access_token,
            expires_at: Instant::now() + Duration::from_secs(expires_in_secs),
        };
        *self.inner.write().await = Some(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_cache_misses() {
        let cache = TokenCache::new();
        assert_eq!(cache.get().await, None);
    }

    #[tokio::test]
    async fn test_store_then_get() {
        let cache = TokenCache::new();
        cache.store("abc".to_string(), 3600).await;
        assert_eq!(cache.get().await.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_token_expiring_within_margin_misses() {
        let cache = TokenCache::new();
        cache.store("abc".to_string(), 30).await; // inside the 60s margin
        assert_eq!(cache.get().await, None);
    }
}
