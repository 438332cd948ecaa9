//! Offline response cache.
//!
//! API reads are served network-first with the cached copy as fallback;
//! navigation pages and static assets are served cache-first. Responses are
//! grouped into named caches so that a version bump can discard stale ones
//! on activation.

use crate::config::CacheConfig;
use crate::error::Result;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// How a request path is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Try the network, fall back to the cache on failure.
    NetworkFirst,
    /// Serve from the cache, fall back to the network on a miss.
    CacheFirst,
    /// Bypass the cache entirely.
    NetworkOnly,
}

type NamedCache = HashMap<String, String>;

/// Named response caches keyed by request path.
#[derive(Debug, Clone)]
pub struct OfflineCache {
    config: CacheConfig,
    caches: Arc<RwLock<HashMap<String, NamedCache>>>,
}

impl OfflineCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            caches: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Name of the current cache version.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Pick the strategy for a request path (query string ignored).
    pub fn strategy_for(&self, path: &str) -> FetchStrategy {
        let route = path.split('?').next().unwrap_or(path);

        if self
            .config
            .api_prefixes
            .iter()
            .any(|prefix| route.starts_with(prefix.as_str()))
        {
            FetchStrategy::NetworkFirst
        } else if self.config.navigation_paths.iter().any(|p| p == route)
            || self
                .config
                .static_prefixes
                .iter()
                .any(|prefix| route.starts_with(prefix.as_str()))
        {
            FetchStrategy::CacheFirst
        } else {
            FetchStrategy::NetworkOnly
        }
    }

    /// Create the named cache if it does not exist yet.
    pub async fn open(&self, name: &str) {
        self.caches
            .write()
            .await
            .entry(name.to_string())
            .or_default();
    }

    /// Store a response in the current cache.
    pub async fn put(&self, path: &str, body: String) {
        self.caches
            .write()
            .await
            .entry(self.config.name.clone())
            .or_default()
            .insert(path.to_string(), body);
    }

    /// Look a path up, preferring the current cache over older ones.
    pub async fn lookup(&self, path: &str) -> Option<String> {
        let caches = self.caches.read().await;
        if let Some(body) = caches.get(&self.config.name).and_then(|c| c.get(path)) {
            return Some(body.clone());
        }
        caches.values().find_map(|c| c.get(path).cloned())
    }

    /// Names of every cache currently held.
    pub async fn cache_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.caches.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Precache the configured paths.
    ///
    /// All-or-nothing: if any fetch fails nothing is stored and the error is returned.
    pub async fn install<F, Fut>(&self, fetch: F) -> Result<usize>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        let paths = self.config.precache.clone();
        let bodies = futures::future::try_join_all(paths.iter().cloned().map(&fetch)).await?;

        self.open(&self.config.name).await;
        for (path, body) in paths.iter().zip(bodies) {
            self.put(path, body).await;
        }

        info!("Precached {} paths into {}", paths.len(), self.config.name);
        Ok(paths.len())
    }

    /// Drop every cache except the current version. Returns the purged names.
    pub async fn activate(&self) -> Vec<String> {
        let mut caches = self.caches.write().await;
        let mut purged: Vec<String> = caches
            .keys()
            .filter(|name| **name != self.config.name)
            .cloned()
            .collect();
        purged.sort();

        for name in &purged {
            caches.remove(name);
            debug!("Purged stale cache {}", name);
        }
        purged
    }

    /// Serve a GET request according to its strategy.
    pub async fn fetch<F, Fut>(&self, path: &str, network: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        match self.strategy_for(path) {
            FetchStrategy::NetworkFirst => match network().await {
                Ok(body) => {
                    self.put(path, body.clone()).await;
                    Ok(body)
                }
                Err(e) => match self.lookup(path).await {
                    Some(body) => {
                        debug!("Network failed for {}, serving cached copy: {}", path, e);
                        Ok(body)
                    }
                    None => Err(e),
                },
            },
            FetchStrategy::CacheFirst => match self.lookup(path).await {
                Some(body) => Ok(body),
                None => network().await,
            },
            FetchStrategy::NetworkOnly => network().await,
        }
    }
}
