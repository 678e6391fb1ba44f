//! Session-scoped caching with TTL support.
//!
//! Values are keyed by session id, expire after a fixed time-to-live, and
//! the least recently used entry is evicted once the cache is full. Each
//! cache owns its sweeper task; dropping the cache stops it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;

pub use cache::{CacheEntry, SessionCache, SessionCacheConfig, SessionCacheConfigBuilder};
