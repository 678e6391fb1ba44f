//! Session cache implementation.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Cache entry with value and expiration.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry<V> {
    value: V,
    created_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    /// Check if this entry is expired.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }

    /// Get remaining time until expiration.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.ttl.checked_sub(self.created_at.elapsed())
    }
}

/// `[cache]` section of `dramaturg.toml`.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct SessionCacheConfig {
    /// Time-to-live for cached entries (seconds)
    #[serde(default = "default_ttl")]
    #[builder(default = "default_ttl()")]
    ttl_secs: u64,

    /// Maximum cache size (number of sessions)
    #[serde(default = "default_max_entries")]
    #[builder(default = "default_max_entries()")]
    max_entries: usize,

    /// How often the sweeper drops expired entries (seconds)
    #[serde(default = "default_sweep_interval")]
    #[builder(default = "default_sweep_interval()")]
    sweep_interval_secs: u64,
}

fn default_ttl() -> u64 {
    1800
}

fn default_max_entries() -> usize {
    256
}

fn default_sweep_interval() -> u64 {
    60
}

impl Default for SessionCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            max_entries: default_max_entries(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

#[derive(Debug)]
struct Inner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    access_order: Vec<String>,
}

impl<V> Inner<V> {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.access_order.iter().position(|k| k == key) {
            let key = self.access_order.remove(pos);
            self.access_order.push(key);
        }
    }

    fn forget(&mut self, key: &str) {
        self.entries.remove(key);
        if let Some(pos) = self.access_order.iter().position(|k| k == key) {
            self.access_order.remove(pos);
        }
    }

    fn evict_lru(&mut self) {
        if !self.access_order.is_empty() {
            let key = self.access_order.remove(0);
            tracing::debug!(session = %key, "Evicting LRU entry");
            self.entries.remove(&key);
        }
    }

    fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();
        for key in expired {
            self.forget(&key);
        }
        before - self.entries.len()
    }
}

/// TTL + LRU cache keyed by session id.
///
/// When created inside a Tokio runtime the cache spawns a sweeper that drops
/// expired entries every `sweep_interval_secs`; the task is aborted when the
/// cache is dropped. Expired entries are also skipped lazily on `get`.
///
/// # Example
///
/// ```
/// use dramaturg_cache::{SessionCache, SessionCacheConfig};
///
/// # #[tokio::main]
/// # async fn main() {
/// let cache = SessionCache::new(SessionCacheConfig::default());
/// cache.insert("session-1", 12u32).await;
/// assert_eq!(cache.get("session-1").await, Some(12));
/// assert_eq!(cache.get("session-2").await, None);
/// # }
/// ```
pub struct SessionCache<V> {
    config: SessionCacheConfig,
    inner: Arc<Mutex<Inner<V>>>,
    sweeper: Option<JoinHandle<()>>,
}

impl<V> SessionCache<V>
where
    V: Clone + Send + 'static,
{
    /// Create a new session cache with configuration.
    pub fn new(config: SessionCacheConfig) -> Self {
        tracing::debug!(
            ttl_secs = config.ttl_secs,
            max_entries = config.max_entries,
            "Creating new SessionCache"
        );

        let inner = Arc::new(Mutex::new(Inner {
            entries: HashMap::new(),
            access_order: Vec::new(),
        }));

        let sweeper = match tokio::runtime::Handle::try_current() {
            Ok(handle) => Some(handle.spawn(sweep(
                Arc::clone(&inner),
                Duration::from_secs(config.sweep_interval_secs.max(1)),
            ))),
            Err(_) => {
                tracing::warn!("No Tokio runtime; expired sessions are only dropped on access");
                None
            }
        };

        Self {
            config,
            inner,
            sweeper,
        }
    }

    /// Configuration in effect.
    pub fn config(&self) -> &SessionCacheConfig {
        &self.config
    }

    /// Insert or replace the value for a session.
    #[tracing::instrument(skip(self, value), fields(session = %session))]
    pub async fn insert(&self, session: &str, value: V) {
        let mut inner = self.inner.lock().await;

        if inner.entries.len() >= self.config.max_entries && !inner.entries.contains_key(session) {
            inner.evict_lru();
        }

        if let Some(pos) = inner.access_order.iter().position(|k| k == session) {
            inner.access_order.remove(pos);
        }
        inner.access_order.push(session.to_string());

        inner.entries.insert(
            session.to_string(),
            CacheEntry {
                value,
                created_at: Instant::now(),
                ttl: Duration::from_secs(self.config.ttl_secs),
            },
        );
        tracing::debug!(cache_size = inner.entries.len(), "Inserted session entry");
    }

    /// Cached value for a session, if present and not expired.
    #[tracing::instrument(skip(self), fields(session = %session))]
    pub async fn get(&self, session: &str) -> Option<V> {
        let mut inner = self.inner.lock().await;

        let expired = inner.entries.get(session)?.is_expired();
        if expired {
            tracing::debug!("Session entry expired, removing");
            inner.forget(session);
            return None;
        }

        inner.touch(session);
        let entry = inner.entries.get(session)?;
        tracing::debug!(time_remaining = ?entry.time_remaining(), "Cache hit");
        Some(entry.value.clone())
    }

    /// Drop one session's entry.
    pub async fn remove(&self, session: &str) -> Option<V> {
        let mut inner = self.inner.lock().await;
        let entry = inner.entries.get(session).map(|entry| entry.value.clone());
        inner.forget(session);
        entry
    }

    /// Remove expired entries now.
    pub async fn cleanup_expired(&self) -> usize {
        self.inner.lock().await.cleanup_expired()
    }

    /// Number of cached sessions, expired or not.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    /// Check if cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.entries.is_empty()
    }

    /// Whether the background sweeper is still running.
    pub fn sweeper_running(&self) -> bool {
        self.sweeper
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<V> Drop for SessionCache<V> {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.take() {
            handle.abort();
            tracing::debug!("Stopped session cache sweeper");
        }
    }
}

async fn sweep<V>(inner: Arc<Mutex<Inner<V>>>, every: Duration) {
    let mut interval = tokio::time::interval(every);
    interval.tick().await;
    loop {
        interval.tick().await;
        let removed = inner.lock().await.cleanup_expired();
        if removed > 0 {
            tracing::info!(removed, "Cleaned up expired session entries");
        }
    }
}
