use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::db::enums::ContentRef;
use crate::error::Result;

struct CacheEntry {
    payload: String,
    expires_at: Instant,
}

/// Process-wide in-memory TTL cache. Values are stored as JSON strings;
/// every access sweeps expired entries before touching the map.
#[derive(Clone)]
pub struct CacheService {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
    default_ttl: Duration,
}

impl CacheService {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            default_ttl,
        }
    }

    /// Get a value from cache
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut entries = self.entries.lock().unwrap();
        Self::sweep(&mut entries);

        match entries.get(key) {
            Some(entry) => {
                let value: T = serde_json::from_str(&entry.payload)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a value in cache with TTL
    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()> {
        let payload = serde_json::to_string(value)?;
        let ttl = ttl.unwrap_or(self.default_ttl);

        let mut entries = self.entries.lock().unwrap();
        Self::sweep(&mut entries);
        entries.insert(
            key.to_string(),
            CacheEntry {
                payload,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    /// Delete a key from cache
    pub fn invalidate(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap();
        Self::sweep(&mut entries);
        entries.remove(key);
    }

    /// Check if a key exists (and has not expired)
    pub fn exists(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().unwrap();
        Self::sweep(&mut entries);
        entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        let mut entries = self.entries.lock().unwrap();
        Self::sweep(&mut entries);
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sweep(entries: &mut HashMap<String, CacheEntry>) {
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);
    }

    /// Cache key builders for consistent naming
    pub fn rating_summary_key(target: &ContentRef) -> String {
        format!("ratings:{}:{}", target.kind.as_str(), target.id)
    }
}
