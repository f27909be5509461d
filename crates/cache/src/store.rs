use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};

struct Entry {
    expires_at: Instant,
    data: Vec<u8>,
}

/// In-memory TTL store for idempotent scrape results.
///
/// Values are kept serialized so a cached read returns an independent object
/// graph. Writers for different keys never contend on anything but the map
/// lock; concurrent writers for the same key resolve last-writer-wins, which
/// is acceptable because cached values are re-derivations of the same scrape.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a value; an expired or missing entry is absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return None,
                Some(entry) if entry.expires_at > Instant::now() => {
                    return match serde_json::from_slice(&entry.data) {
                        Ok(value) => Some(value),
                        Err(e) => {
                            tracing::warn!(%key, error = %e, "cache entry failed to decode");
                            None
                        }
                    };
                }
                Some(_) => {}
            }
        }
        // Expired; drop it lazily.
        self.entries.write().remove(key);
        None
    }

    pub fn set<T: Serialize>(&self, key: impl Into<String>, value: &T, ttl: Duration) {
        let key = key.into();
        let data = match serde_json::to_vec(value) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(%key, error = %e, "cache entry failed to encode");
                return;
            }
        };
        self.entries.write().insert(
            key,
            Entry {
                expires_at: Instant::now() + ttl,
                data,
            },
        );
    }
}
