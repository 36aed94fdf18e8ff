//! In-memory key/value store with per-entry expiry.

use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Default time-to-live for cached values.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// A cached payload and the instant it stops being valid.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
  payload: V,
  expires_at: Instant,
}

/// Key/value cache where every entry carries its own expiry.
///
/// Expired entries are only removed when they are read; there is no
/// background sweep and no capacity bound. Uses `tokio::time::Instant`
/// so paused-clock tests can move past an entry's expiry.
#[derive(Debug, Clone)]
pub struct TtlCache<V> {
  entries: HashMap<String, CacheEntry<V>>,
  ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
  /// Create a cache whose `set` uses the given time-to-live.
  pub fn new(ttl: Duration) -> Self {
    Self {
      entries: HashMap::new(),
      ttl,
    }
  }

  /// Store a payload with the default TTL, replacing any existing entry.
  pub fn set(&mut self, key: impl Into<String>, payload: V) {
    let ttl = self.ttl;
    self.set_with_ttl(key, payload, ttl);
  }

  /// Store a payload that expires after `ttl`.
  pub fn set_with_ttl(&mut self, key: impl Into<String>, payload: V, ttl: Duration) {
    self.entries.insert(
      key.into(),
      CacheEntry {
        payload,
        expires_at: Instant::now() + ttl,
      },
    );
  }

  /// Get a payload if present and not yet expired.
  ///
  /// An expired entry is deleted as a side effect.
  pub fn get(&mut self, key: &str) -> Option<V> {
    let expired = match self.entries.get(key) {
      Some(entry) => Instant::now() >= entry.expires_at,
      None => return None,
    };

    if expired {
      self.entries.remove(key);
      return None;
    }

    self.entries.get(key).map(|entry| entry.payload.clone())
  }

  /// Drop every entry.
  pub fn clear(&mut self) {
    self.entries.clear();
  }

  #[cfg(test)]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[cfg(test)]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl<V: Clone> Default for TtlCache<V> {
  fn default() -> Self {
    Self::new(DEFAULT_TTL)
  }
}
