//! Published post feed: the state the presentation layer renders.
//!
//! `PostFeed` owns the visible, ordered list of display posts and a small state
//! machine around loading it. Changes are published on a watch channel.
//!
//! # Example
//!
//! ```ignore
//! let feed = PostFeed::new(repository);
//! let mut updates = feed.subscribe();
//!
//! feed.load_posts().await;
//!
//! match feed.state() {
//!     FeedState::Loading => render_spinner(),
//!     FeedState::Loaded => render_posts(&feed.posts()),
//!     FeedState::Empty => render_empty(),
//!     FeedState::Error(message) => render_retry(&message),
//! }
//! ```

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Environment;
use crate::error::{Error, Result};
use crate::posts::cache::refresh_environment;
use crate::posts::{DisplayPost, PostRepository, ResourceClient};

/// The state of the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
  /// Nothing to show (initial, empty result, or everything deleted)
  Empty,
  /// A load is in flight
  Loading,
  /// Posts are available
  Loaded,
  /// The last load failed; retrying is up to the caller
  Error(String),
}

impl FeedState {
  pub fn is_loading(&self) -> bool {
    matches!(self, FeedState::Loading)
  }

  pub fn is_loaded(&self) -> bool {
    matches!(self, FeedState::Loaded)
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      FeedState::Error(e) => Some(e),
      _ => None,
    }
  }
}

/// Everything a renderer needs, published as one value.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
  pub state: FeedState,
  pub posts: Vec<DisplayPost>,
}

impl Default for FeedSnapshot {
  fn default() -> Self {
    Self {
      state: FeedState::Empty,
      posts: Vec::new(),
    }
  }
}

/// Owner of the visible post list.
///
/// Operations are serialized by the repository lock. `load_posts` never waits
/// for it: a load that arrives while another operation runs is dropped.
pub struct PostFeed {
  repository: Mutex<PostRepository>,
  tx: watch::Sender<FeedSnapshot>,
}

impl PostFeed {
  pub fn new(repository: PostRepository) -> Self {
    let (tx, _rx) = watch::channel(FeedSnapshot::default());
    Self {
      repository: Mutex::new(repository),
      tx,
    }
  }

  /// Current state.
  pub fn state(&self) -> FeedState {
    self.tx.borrow().state.clone()
  }

  /// Current ordered posts, newest first.
  pub fn posts(&self) -> Vec<DisplayPost> {
    self.tx.borrow().posts.clone()
  }

  pub fn snapshot(&self) -> FeedSnapshot {
    self.tx.borrow().clone()
  }

  /// Receive every published change.
  pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
    self.tx.subscribe()
  }

  /// Load posts, cache first.
  ///
  /// This is a no-op while another operation is running and once posts are
  /// loaded, so repeated calls never duplicate entries.
  pub async fn load_posts(&self) {
    let Ok(repository) = self.repository.try_lock() else {
      debug!("Feed busy, ignoring load");
      return;
    };

    if self.state().is_loaded() {
      debug!("Posts already loaded, ignoring load");
      return;
    }

    // Failures are already published as the error state
    let _ = self.resolve(&repository).await;
  }

  /// Fetch through the repository and publish the outcome.
  async fn resolve(&self, repository: &PostRepository) -> Result<()> {
    self.tx.send_modify(|snapshot| snapshot.state = FeedState::Loading);

    match repository.fetch_posts().await {
      Ok(result) => {
        info!(count = result.data.len(), source = ?result.source, "Posts loaded");
        self.tx.send_modify(|snapshot| {
          snapshot.state = if result.data.is_empty() {
            FeedState::Empty
          } else {
            FeedState::Loaded
          };
          snapshot.posts = result.data;
        });
        Ok(())
      }
      Err(e) => {
        warn!("Failed to load posts: {}", e);
        self
          .tx
          .send_modify(|snapshot| snapshot.state = FeedState::Error(e.to_string()));
        Err(e)
      }
    }
  }

  /// Validate and create a post, then show it first.
  ///
  /// An unloaded feed is loaded first, so the new post lands in front of the
  /// full collection. The new id is one more than the largest visible id. Use
  /// `Error::create_failure_message` for the text to show on failure.
  pub async fn create_post(&self, title: &str, content: &str) -> Result<DisplayPost> {
    let title = title.trim();
    let content = content.trim();
    if title.is_empty() || content.is_empty() {
      return Err(Error::Validation);
    }

    let repository = self.repository.lock().await;
    if !self.state().is_loaded() {
      self.resolve(&repository).await?;
    }
    let id = self.next_post_id();

    let post = repository.create_post(id, title, content).await?;
    self.tx.send_modify(|snapshot| {
      snapshot.posts.insert(0, post.clone());
      snapshot.state = FeedState::Loaded;
    });

    Ok(post)
  }

  fn next_post_id(&self) -> i64 {
    self
      .tx
      .borrow()
      .posts
      .iter()
      .map(|post| post.id)
      .max()
      .unwrap_or(0)
      + 1
  }

  /// Remove the post at `index` from the cache and the visible list.
  ///
  /// The remote delete is started but not awaited, and its outcome is never
  /// surfaced. Returns `None` when the index is out of range.
  pub async fn delete_post(&self, index: usize) -> Option<JoinHandle<()>> {
    let repository = self.repository.lock().await;

    let Some(id) = self.tx.borrow().posts.get(index).map(|post| post.id) else {
      warn!(index, "No post at index, nothing to delete");
      return None;
    };

    let handle = repository.delete_post(id);
    self.tx.send_modify(|snapshot| {
      snapshot.posts.remove(index);
      if snapshot.posts.is_empty() {
        snapshot.state = FeedState::Empty;
      }
    });

    Some(handle)
  }

  /// Point the feed at another environment, dropping every cached collection.
  pub async fn switch_environment(
    &self,
    environment: Environment,
    client: Arc<dyn ResourceClient>,
  ) {
    let mut repository = self.repository.lock().await;
    *repository = repository.with_client(client);
    repository.clear_all();
    refresh_environment(repository.cache(), environment);
    self.tx.send_replace(FeedSnapshot::default());
    info!(environment = environment.as_str(), "Switched environment");
  }

  /// Drop every cached collection and the visible list.
  pub async fn clear_cache(&self) {
    let repository = self.repository.lock().await;
    repository.clear_all();
    self.tx.send_replace(FeedSnapshot::default());
  }
}

impl std::fmt::Debug for PostFeed {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let snapshot = self.tx.borrow();
    f.debug_struct("PostFeed")
      .field("state", &snapshot.state)
      .field("posts", &snapshot.posts.len())
      .finish_non_exhaustive()
  }
}
