//! Generic caching layer for data persistence and offline support.
//!
//! This module provides a domain-agnostic caching mechanism that:
//! - Stores each record type as one serialized collection under a stable key
//! - Serves non-empty cached collections before touching the network
//! - Recovers every cache failure locally (reads degrade to empty, writes are skipped)
//! - Keeps a few string settings next to the cached data

mod layer;
mod storage;
mod traits;

pub use layer::CacheStore;
pub use storage::{CacheStorage, SqliteStorage, StoredBlob};
pub use traits::{CacheResult, CacheSource, Cacheable};
