//! Typed cache layer on top of a blob storage backend.

use std::future::Future;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};

use crate::error::Error;

use super::storage::CacheStorage;
use super::traits::{CacheResult, Cacheable};

/// Typed, fail-open access to cached collections.
///
/// Every failure (SQLite, serde) is logged and recovered here: reads degrade to
/// an empty collection and writes are skipped. Callers never see cache errors.
pub struct CacheStore<S: CacheStorage> {
  storage: Arc<S>,
}

impl<S: CacheStorage> CacheStore<S> {
  /// Create a new cache store with the given storage backend.
  pub fn new(storage: S) -> Self {
    Self {
      storage: Arc::new(storage),
    }
  }

  /// Serialize and store the whole collection, replacing the previous one.
  pub fn save_collection<T: Cacheable>(&self, items: &[T]) {
    let key = T::cache_key();
    let data = match encode(items) {
      Ok(data) => data,
      Err(e) => {
        error!(key, "{}", e);
        return;
      }
    };

    match self.storage.put(key, &data) {
      Ok(()) => debug!(key, count = items.len(), "Saved to cache"),
      Err(e) => error!(key, "Failed to save cache entry: {}", e),
    }
  }

  /// Load the cached collection, or an empty one if absent or undecodable.
  pub fn load_collection<T: Cacheable>(&self) -> Vec<T> {
    self
      .load_with_time::<T>()
      .map(|cached| cached.data)
      .unwrap_or_default()
  }

  /// Load the collection together with its write time.
  fn load_with_time<T: Cacheable>(&self) -> Option<CacheResult<Vec<T>>> {
    let key = T::cache_key();
    let blob = match self.storage.get(key) {
      Ok(Some(blob)) => blob,
      Ok(None) => {
        debug!(key, "No cached entry found");
        return None;
      }
      Err(e) => {
        error!(key, "Failed to read cache entry: {}", e);
        return None;
      }
    };

    match decode::<T>(&blob.data) {
      Ok(items) => Some(CacheResult::from_cache(items, blob.cached_at)),
      Err(e) => {
        warn!(key, "{}", e);
        None
      }
    }
  }

  /// Add one record at the end of its cached collection.
  pub fn append_item<T: Cacheable>(&self, item: T) {
    let mut items = self.load_collection::<T>();
    items.push(item);
    self.save_collection(&items);
  }

  /// Add one record at the front of its cached collection (newest first).
  pub fn prepend_item<T: Cacheable>(&self, item: T) {
    let mut items = self.load_collection::<T>();
    items.insert(0, item);
    self.save_collection(&items);
  }

  /// Remove every record whose identity matches `id`.
  pub fn remove_item<T: Cacheable>(&self, id: i64) {
    let mut items = self.load_collection::<T>();
    let before = items.len();
    items.retain(|item| item.identity() != id);

    if items.len() == before {
      debug!(key = T::cache_key(), id, "Nothing to remove from cache");
      return;
    }
    self.save_collection(&items);
  }

  /// Drop one slot. Clearing an absent slot is a no-op.
  pub fn clear(&self, key: &str) {
    self.clear_all(&[key]);
  }

  /// Drop several slots in a single transaction.
  pub fn clear_all(&self, keys: &[&str]) {
    match self.storage.remove(keys) {
      Ok(removed) => debug!(?keys, removed, "Cleared cache"),
      Err(e) => error!(?keys, "Failed to clear cache: {}", e),
    }
  }

  /// Read a setting, treating storage failures as "not set".
  pub fn setting(&self, name: &str) -> Option<String> {
    self.storage.setting(name).unwrap_or_else(|e| {
      error!(name, "Failed to read setting: {}", e);
      None
    })
  }

  /// Write a setting; failures are logged.
  pub fn set_setting(&self, name: &str, value: &str) {
    if let Err(e) = self.storage.set_setting(name, value) {
      error!(name, "Failed to write setting: {}", e);
    }
  }

  /// Fetch a list with cache-first strategy.
  ///
  /// 1. Check cache - if it holds a non-empty collection, return it
  /// 2. Otherwise run the fetcher
  /// 3. Store what the fetcher returned and hand it back
  ///
  /// Fetcher errors propagate untouched; nothing is written on failure.
  pub async fn fetch_list<T, E, F, Fut>(&self, fetcher: F) -> Result<CacheResult<Vec<T>>, E>
  where
    T: Cacheable,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
  {
    if let Some(cached) = self.load_with_time::<T>() {
      if !cached.data.is_empty() {
        debug!(key = T::cache_key(), count = cached.data.len(), "Cache hit");
        return Ok(cached);
      }
    }

    debug!(key = T::cache_key(), "Cache miss");
    let data = fetcher().await?;
    self.save_collection(&data);
    Ok(CacheResult::from_network(data))
  }
}

fn encode<T: Serialize>(items: &[T]) -> Result<Vec<u8>, Error> {
  serde_json::to_vec(items).map_err(|e| Error::CacheCodec(format!("encode: {}", e)))
}

fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<Vec<T>, Error> {
  serde_json::from_slice(data).map_err(|e| Error::CacheCodec(format!("decode: {}", e)))
}

impl<S: CacheStorage> Clone for CacheStore<S> {
  fn clone(&self) -> Self {
    Self {
      storage: Arc::clone(&self.storage),
    }
  }
}
