//! Bounded FIFO cache for query results, persisted write-through.

use serde::{de::DeserializeOwned, Serialize};
use std::collections::VecDeque;
use tracing::{debug, warn};

use super::snapshot::SnapshotStore;

/// Ordered map from query key to cached value, capped at a fixed capacity.
///
/// Eviction is FIFO by original insertion: overwriting an existing key keeps
/// its place in line, and reads never refresh it. Every `put` rewrites the
/// whole snapshot through the store.
pub struct BoundedCache<V> {
  entries: VecDeque<(String, V)>,
  capacity: usize,
  store: Box<dyn SnapshotStore>,
}

impl<V: Clone + Serialize + DeserializeOwned> BoundedCache<V> {
  /// Create a cache, hydrating from the store's snapshot when one parses.
  ///
  /// A missing or corrupt snapshot is not an error: an empty cache is always
  /// a safe fallback, so the failure is logged and swallowed.
  pub fn new(capacity: usize, store: Box<dyn SnapshotStore>) -> Self {
    let entries = match store.load() {
      Ok(Some(data)) => match serde_json::from_slice::<VecDeque<(String, V)>>(&data) {
        Ok(mut entries) => {
          entries.truncate(capacity);
          debug!(entries = entries.len(), "hydrated query cache from snapshot");
          entries
        }
        Err(e) => {
          debug!("query cache snapshot unreadable, starting empty: {e}");
          VecDeque::new()
        }
      },
      Ok(None) => VecDeque::new(),
      Err(e) => {
        debug!("query cache snapshot unavailable, starting empty: {e}");
        VecDeque::new()
      }
    };

    Self {
      entries,
      capacity,
      store,
    }
  }

  pub fn get(&self, key: &str) -> Option<&V> {
    self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
  }

  /// Insert or overwrite. When the insert pushes the cache past capacity,
  /// the oldest-inserted entry is evicted, then the snapshot is rewritten.
  pub fn put(&mut self, key: String, value: V) {
    if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
      slot.1 = value;
    } else {
      self.entries.push_back((key, value));
      if self.entries.len() > self.capacity {
        if let Some((evicted, _)) = self.entries.pop_front() {
          debug!(key = %evicted, "evicted oldest query cache entry");
        }
      }
    }

    self.persist();
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Drop every entry, including the persisted snapshot content.
  pub fn clear(&mut self) {
    self.entries.clear();
    self.persist();
  }

  fn persist(&self) {
    match serde_json::to_vec(&self.entries) {
      Ok(data) => {
        if let Err(e) = self.store.save(&data) {
          warn!("failed to persist query cache snapshot: {e}");
        }
      }
      Err(e) => warn!("failed to serialize query cache snapshot: {e}"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::snapshot::{MemorySnapshot, NoopSnapshot};

  fn cache(capacity: usize) -> BoundedCache<u32> {
    BoundedCache::new(capacity, Box::new(NoopSnapshot))
  }

  #[test]
  fn test_fifo_eviction_at_capacity() {
    let mut cache = cache(3);
    for (i, key) in ["a", "b", "c", "d"].iter().enumerate() {
      cache.put(key.to_string(), i as u32);
    }

    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get("a"), None, "first inserted key is evicted");
    assert_eq!(cache.get("b"), Some(&1));
    assert_eq!(cache.get("c"), Some(&2));
    assert_eq!(cache.get("d"), Some(&3));
  }

  #[test]
  fn test_overwrite_keeps_insertion_order() {
    let mut cache = cache(2);
    cache.put("a".to_string(), 1);
    cache.put("b".to_string(), 2);

    // Overwriting does not move "a" to the back of the line.
    cache.put("a".to_string(), 10);
    assert_eq!(cache.get("a"), Some(&10));
    assert_eq!(cache.len(), 2);

    cache.put("c".to_string(), 3);
    assert_eq!(cache.get("a"), None, "oldest original insertion goes first");
    assert_eq!(cache.get("b"), Some(&2));
    assert_eq!(cache.get("c"), Some(&3));
  }

  #[test]
  fn test_snapshot_round_trip() {
    let store = MemorySnapshot::default();

    let mut first = BoundedCache::<u32>::new(2, Box::new(store.clone()));
    first.put("a".to_string(), 1);
    first.put("b".to_string(), 2);

    let second = BoundedCache::<u32>::new(2, Box::new(store));
    assert_eq!(second.len(), 2);
    assert_eq!(second.get("a"), Some(&1));
    assert_eq!(second.get("b"), Some(&2));
  }

  #[test]
  fn test_corrupt_snapshot_starts_empty() {
    let store = MemorySnapshot::preloaded(b"not json at all".to_vec());
    let cache = BoundedCache::<u32>::new(2, Box::new(store));
    assert!(cache.is_empty());
  }

  #[test]
  fn test_hydration_respects_capacity() {
    let store = MemorySnapshot::default();
    let mut big = BoundedCache::<u32>::new(5, Box::new(store.clone()));
    for (i, key) in ["a", "b", "c", "d"].iter().enumerate() {
      big.put(key.to_string(), i as u32);
    }

    let small = BoundedCache::<u32>::new(2, Box::new(store));
    assert_eq!(small.len(), 2);
  }

  #[test]
  fn test_clear_persists() {
    let store = MemorySnapshot::default();
    let mut cache = BoundedCache::<u32>::new(2, Box::new(store.clone()));
    cache.put("a".to_string(), 1);
    cache.clear();

    let rehydrated = BoundedCache::<u32>::new(2, Box::new(store));
    assert!(rehydrated.is_empty());
  }
}
