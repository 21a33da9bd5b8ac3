//! Process-lifetime TTL cache for the region reference list.
//!
//! The list is large and changes rarely; refetching it per request is wasted
//! traffic. The cache is owned by `HhClient` and injected wherever needed —
//! no module-level ambient state. Stale reads during a concurrent refresh are
//! acceptable.

use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::hh::types::HhArea;

pub const AREA_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

struct CachedAreas {
    fetched_at: Instant,
    areas: Vec<HhArea>,
}

pub struct AreaCache {
    ttl: Duration,
    inner: RwLock<Option<CachedAreas>>,
}

impl AreaCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: RwLock::new(None),
        }
    }

    /// Returns the cached list if present and not expired.
    pub async fn get(&self) -> Option<Vec<HhArea>> {
        let guard = self.inner.read().await;
        let cached = guard.as_ref()?;
        if cached.fetched_at.elapsed() < self.ttl {
            Some(cached.areas.clone())
        } else {
            None
        }
    }

    /// Replaces the cached list. At most one refresh writes at a time; the
    /// last write wins.
    pub async fn put(&self, areas: Vec<HhArea>) {
        let mut guard = self.inner.write().await;
        *guard = Some(CachedAreas {
            fetched_at: Instant::now(),
            areas,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(id: &str) -> HhArea {
        HhArea {
            id: id.to_string(),
            name: format!("Area {id}"),
            parent_id: None,
            areas: vec![],
        }
    }

    #[tokio::test]
    async fn test_empty_cache_misses() {
        let cache = AreaCache::new(AREA_CACHE_TTL);
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn test_put_then_get_within_ttl() {
        let cache = AreaCache::new(AREA_CACHE_TTL);
        cache.put(vec![area("1"), area("2")]).await;
        let got = cache.get().await.unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].id, "1");
    }

    #[tokio::test]
    async fn test_expired_entry_misses() {
        let cache = AreaCache::new(Duration::ZERO);
        cache.put(vec![area("1")]).await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let cache = AreaCache::new(AREA_CACHE_TTL);
        cache.put(vec![area("1")]).await;
        cache.put(vec![area("2"), area("3")]).await;
        let got = cache.get().await.unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].id, "2");
    }
}
