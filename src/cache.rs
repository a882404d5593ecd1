use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;

type Entries<K, V> = Arc<RwLock<HashMap<K, (V, SystemTime)>>>;

/// Shared map whose entries expire `ttl` after insertion.
pub struct TtlCache<K, V> {
    entries: Entries<K, V>,
    ttl: Duration,
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            ttl: self.ttl,
        }
    }
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        self.get_with_remaining(key).await.map(|(value, _)| value)
    }

    /// A fresh value together with the time it has left to live.
    pub async fn get_with_remaining(&self, key: &K) -> Option<(V, Duration)> {
        let entries = self.entries.read().await;
        let (value, stored_at) = entries.get(key)?;
        let age = stored_at.elapsed().unwrap_or_default();
        self.ttl
            .checked_sub(age)
            .filter(|remaining| !remaining.is_zero())
            .map(|remaining| (value.clone(), remaining))
    }

    pub async fn insert(&self, key: K, value: V) {
        self.insert_stored_at(key, value, SystemTime::now()).await;
    }

    pub(crate) async fn insert_stored_at(&self, key: K, value: V, stored_at: SystemTime) {
        let mut entries = self.entries.write().await;
        entries.insert(key, (value, stored_at));
    }

    /// Drops expired entries and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let previous_count = entries.len();
        entries.retain(|_, (_, stored_at)| self.is_fresh(*stored_at));
        let removed = previous_count - entries.len();
        log::debug!("🧹 Cache cleaned: {} -> {} entries", previous_count, entries.len());
        removed
    }

    fn is_fresh(&self, stored_at: SystemTime) -> bool {
        stored_at.elapsed().unwrap_or_default() < self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_fresh_entries() {
        let cache = TtlCache::new(Duration::from_secs(3600));
        cache.insert("rules", vec![1, 2, 3]).await;
        assert_eq!(cache.get(&"rules").await, Some(vec![1, 2, 3]));
        assert_eq!(cache.get(&"focuses").await, None);
    }

    #[tokio::test]
    async fn expired_entries_are_invisible_and_purged() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("rules", 1).await;
        assert_eq!(cache.get(&"rules").await, None);
        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.purge_expired().await, 0);
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let other = cache.clone();
        other.insert(1u8, "value".to_string()).await;
        assert_eq!(cache.get(&1).await.as_deref(), Some("value"));
        assert_eq!(cache.purge_expired().await, 0);
    }

    #[tokio::test]
    async fn remaining_time_shrinks_with_age() {
        let cache = TtlCache::new(Duration::from_secs(3600));
        let stored_at = SystemTime::now() - Duration::from_secs(600);
        cache.insert_stored_at("rules", 1, stored_at).await;

        let (value, remaining) = cache.get_with_remaining(&"rules").await.unwrap();
        assert_eq!(value, 1);
        assert!(remaining <= Duration::from_secs(3000));
        assert!(remaining > Duration::from_secs(2990));

        let stale = SystemTime::now() - Duration::from_secs(3600);
        cache.insert_stored_at("rules", 2, stale).await;
        assert_eq!(cache.get_with_remaining(&"rules").await, None);
    }
}
