//! Cache slots and launch-time cache rules for post data.

use tracing::info;

use crate::cache::{CacheStorage, CacheStore, Cacheable};
use crate::config::Environment;

use super::api_types::{CommentDto, PostDto, UserDto};
use super::types::DisplayPost;

// ============================================================================
// Slot keys
// ============================================================================

pub const POSTS_DTO_KEY: &str = "posts_dto_cache_key";
pub const COMMENTS_DTO_KEY: &str = "comments_dto_cache_key";
pub const USERS_DTO_KEY: &str = "users_dto_cache_key";
pub const POSTS_KEY: &str = "posts_cache_key";
pub const COMMENTS_KEY: &str = "comments_cache_key";

/// Every data slot, cleared together on environment change or explicit clear.
///
/// Display comments travel inside their post, so nothing writes
/// `COMMENTS_KEY`; it is only ever cleared.
pub const ALL_KEYS: [&str; 5] = [
  POSTS_DTO_KEY,
  COMMENTS_DTO_KEY,
  USERS_DTO_KEY,
  POSTS_KEY,
  COMMENTS_KEY,
];

const CLEAR_ON_LAUNCH_SETTING: &str = "clear_cache_on_launch_key";
const ENVIRONMENT_SETTING: &str = "app_environment";

// ============================================================================
// Cacheable implementations
// ============================================================================

impl Cacheable for PostDto {
  fn cache_key() -> &'static str {
    POSTS_DTO_KEY
  }

  fn identity(&self) -> i64 {
    self.id
  }
}

impl Cacheable for CommentDto {
  fn cache_key() -> &'static str {
    COMMENTS_DTO_KEY
  }

  fn identity(&self) -> i64 {
    self.id
  }
}

impl Cacheable for UserDto {
  fn cache_key() -> &'static str {
    USERS_DTO_KEY
  }

  fn identity(&self) -> i64 {
    self.id
  }
}

impl Cacheable for DisplayPost {
  fn cache_key() -> &'static str {
    POSTS_KEY
  }

  fn identity(&self) -> i64 {
    self.id
  }
}

// ============================================================================
// Launch-time rules
// ============================================================================

/// Drop every slot in one transaction.
pub fn clear_all_data<S: CacheStorage>(cache: &CacheStore<S>) {
  cache.clear_all(&ALL_KEYS);
  info!("All caches cleared");
}

/// Schedule a full clear for the next launch.
pub fn request_clear_on_launch<S: CacheStorage>(cache: &CacheStore<S>) {
  cache.set_setting(CLEAR_ON_LAUNCH_SETTING, "true");
}

/// Clear everything if a clear was requested, then reset the request.
///
/// Returns whether a clear happened.
pub fn clear_cache_at_launch_if_needed<S: CacheStorage>(cache: &CacheStore<S>) -> bool {
  let requested = cache.setting(CLEAR_ON_LAUNCH_SETTING).as_deref() == Some("true");
  if requested {
    clear_all_data(cache);
    cache.set_setting(CLEAR_ON_LAUNCH_SETTING, "false");
    info!("Cache cleared on launch as requested");
  }
  requested
}

/// Record the active environment, clearing all data if it changed since the last launch.
///
/// Returns whether a clear happened.
pub fn refresh_environment<S: CacheStorage>(cache: &CacheStore<S>, active: Environment) -> bool {
  let previous = cache.setting(ENVIRONMENT_SETTING);
  let changed = previous.as_deref() != Some(active.as_str());

  if changed {
    // A first launch has nothing cached, so clearing is harmless
    clear_all_data(cache);
    cache.set_setting(ENVIRONMENT_SETTING, active.as_str());
    info!(environment = active.as_str(), ?previous, "Environment changed");
  }
  changed
}
