//! Core traits and types for the caching system.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// Trait for records that can be stored as a homogeneous cached collection.
///
/// Every implementor owns exactly one slot in the store, named by `cache_key`.
pub trait Cacheable: Clone + Send + Sync + Serialize + DeserializeOwned {
  /// Stable slot key for this record type (e.g. "posts_cache_key").
  fn cache_key() -> &'static str;

  /// Identity field used when removing a single record from its slot.
  fn identity(&self) -> i64;
}

/// Result from a cache-first lookup, including where the data came from.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
  /// When the data was cached (if from cache)
  pub cached_at: Option<DateTime<Utc>>,
}

impl<T> CacheResult<T> {
  /// Create a new cache result from freshly fetched data.
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
      cached_at: None,
    }
  }

  /// Create a new cache result from cached data.
  pub fn from_cache(data: T, cached_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: CacheSource::Cache,
      cached_at: Some(cached_at),
    }
  }
}

/// Indicates where data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fetched from the resource client (remote or fixtures)
  Network,
  /// Served from the persistent cache
  Cache,
}
