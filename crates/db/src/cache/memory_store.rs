use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::{CacheError, CacheStore};

/// How often a write may sweep expired entries out of the map.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

type Entries = HashMap<String, (String, Instant)>;

#[derive(Debug)]
struct Inner {
    entries: Entries,
    last_sweep: Instant,
}

/// Process-local cache store.
///
/// Expired entries are dropped when read, and writes sweep the whole map at
/// most once per sweep interval, so keys that are never read again
/// (not-found placeholders) do not accumulate.
#[derive(Debug)]
pub struct MemoryCacheStore {
    inner: Mutex<Inner>,
    sweep_interval: Duration,
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::with_sweep_interval(DEFAULT_SWEEP_INTERVAL)
    }
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sweep_interval(sweep_interval: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                last_sweep: Instant::now(),
            }),
            sweep_interval,
        }
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.lock()
            .entries
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut inner = self.lock();
        let live = match inner.entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Some(value.clone()),
            Some(_) => None,
            None => return Ok(None),
        };
        if live.is_none() {
            inner.entries.remove(key);
        }
        Ok(live)
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut inner = self.lock();

        if now.duration_since(inner.last_sweep) >= self.sweep_interval {
            inner.entries.retain(|_, (_, expires_at)| *expires_at > now);
            inner.last_sweep = now;
        }

        inner
            .entries
            .insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> Result<(), CacheError> {
        let mut inner = self.lock();
        for key in keys {
            inner.entries.remove(key);
        }
        Ok(())
    }
}
