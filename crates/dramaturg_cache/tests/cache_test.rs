use dramaturg_cache::{SessionCache, SessionCacheConfig, SessionCacheConfigBuilder};
use std::time::Duration;

#[tokio::test]
async fn insert_then_get() {
    let cache = SessionCache::new(SessionCacheConfig::default());
    cache.insert("alpha", "five episodes".to_string()).await;
    assert_eq!(cache.get("alpha").await.as_deref(), Some("five episodes"));
    assert_eq!(cache.len().await, 1);
}

#[tokio::test(start_paused = true)]
async fn entries_expire_after_ttl() {
    let config = SessionCacheConfig::default().with_ttl_secs(10);
    let cache = SessionCache::new(config);
    cache.insert("alpha", 3u32).await;

    tokio::time::advance(Duration::from_secs(5)).await;
    assert_eq!(cache.get("alpha").await, Some(3));

    tokio::time::advance(Duration::from_secs(6)).await;
    assert_eq!(cache.get("alpha").await, None);
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn least_recently_used_is_evicted() {
    let config = SessionCacheConfigBuilder::default()
        .max_entries(2usize)
        .build()
        .unwrap();
    let cache = SessionCache::new(config);
    cache.insert("a", 1u32).await;
    cache.insert("b", 2u32).await;
    // touch "a" so "b" becomes the oldest
    assert_eq!(cache.get("a").await, Some(1));
    cache.insert("c", 3u32).await;

    assert_eq!(cache.get("b").await, None);
    assert_eq!(cache.get("a").await, Some(1));
    assert_eq!(cache.get("c").await, Some(3));
}

#[tokio::test(start_paused = true)]
async fn sweeper_drops_expired_entries() {
    let config = SessionCacheConfig::default()
        .with_ttl_secs(1)
        .with_sweep_interval_secs(2);
    let cache = SessionCache::new(config);
    cache.insert("a", 1u32).await;
    assert!(cache.sweeper_running());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(cache.len().await, 0);
}

#[test]
fn cache_without_runtime_has_no_sweeper() {
    let cache: SessionCache<u32> = SessionCache::new(SessionCacheConfig::default());
    assert!(!cache.sweeper_running());
}

#[test]
fn config_defaults_from_partial_json() -> anyhow::Result<()> {
    let config: SessionCacheConfig = serde_json::from_str(r#"{"ttl_secs": 60}"#)?;
    assert_eq!(*config.ttl_secs(), 60);
    assert_eq!(*config.max_entries(), 256);
    Ok(())
}
