use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    cached_at: Instant,
}

/// Time-bounded map. An entry is served until `ttl` has elapsed since it was
/// stored; after that it is dropped on the next lookup.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().await;

        let expired = match entries.get(key) {
            Some(entry) if entry.cached_at.elapsed() < self.ttl => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.remove(key);
        }
        None
    }

    pub async fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key,
            CacheEntry {
                value,
                cached_at: Instant::now(),
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hit_within_ttl() {
        let cache: TtlCache<String, f64> = TtlCache::default();
        cache.insert("q".to_string(), 42.0).await;

        assert_eq!(cache.get(&"q".to_string()).await, Some(42.0));
        assert_eq!(cache.get(&"q".to_string()).await, Some(42.0));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_always_expires() {
        let cache: TtlCache<String, f64> = TtlCache::new(Duration::ZERO);
        cache.insert("q".to_string(), 1.0).await;

        assert_eq!(cache.get(&"q".to_string()).await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache: TtlCache<&'static str, u32> = TtlCache::new(Duration::from_millis(20));
        cache.insert("q", 7).await;
        assert_eq!(cache.get(&"q").await, Some(7));

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get(&"q").await, None);
    }

    #[test]
    fn test_keys_are_exact() {
        let cache: TtlCache<String, u32> = TtlCache::default();
        tokio_test::block_on(async {
            cache.insert("SELECT 1".to_string(), 1).await;
            assert_eq!(cache.get(&"SELECT 1 ".to_string()).await, None);
            cache.clear().await;
            assert!(cache.is_empty().await);
        });
    }
}
