//! Post repository that wraps a resource client with transparent caching.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::ready;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheResult, CacheStore, SqliteStorage};
use crate::error::Result;

use super::aggregate::assemble;
use super::api_types::{CommentDto, PostDto, UserDto};
use super::cache::clear_all_data;
use super::client::ResourceClient;
use super::types::DisplayPost;

/// Cache-first access to display posts.
///
/// This wraps a `ResourceClient` and serves every collection from the cache
/// when present, falling back to the client and writing the result back.
#[derive(Clone)]
pub struct PostRepository {
  client: Arc<dyn ResourceClient>,
  cache: CacheStore<SqliteStorage>,
}

impl PostRepository {
  pub fn new(client: Arc<dyn ResourceClient>, cache: CacheStore<SqliteStorage>) -> Self {
    Self { client, cache }
  }

  /// Same cache, different client.
  pub fn with_client(&self, client: Arc<dyn ResourceClient>) -> Self {
    Self {
      client,
      cache: self.cache.clone(),
    }
  }

  pub fn cache(&self) -> &CacheStore<SqliteStorage> {
    &self.cache
  }

  /// Get display posts, joining and caching them on a miss.
  pub async fn fetch_posts(&self) -> Result<CacheResult<Vec<DisplayPost>>> {
    self
      .cache
      .fetch_list(|| async {
        let posts = self.fetch_post_dtos().await?;
        let (users, comments) =
          futures::try_join!(self.fetch_user_dtos(), self.fetch_comment_dtos())?;
        debug!(
          posts = posts.len(),
          users = users.len(),
          comments = comments.len(),
          "Joining posts"
        );

        let users: HashMap<i64, UserDto> = users.into_iter().map(|u| (u.id, u)).collect();
        let mut comments_by_post: HashMap<i64, Vec<CommentDto>> = HashMap::new();
        for comment in comments {
          comments_by_post.entry(comment.post_id).or_default().push(comment);
        }

        assemble(
          posts,
          |user_id| ready(Ok(users.get(&user_id).cloned())),
          |post_id| ready(Ok(comments_by_post.get(&post_id).cloned().unwrap_or_default())),
        )
        .await
      })
      .await
  }

  /// Raw posts, cache-first.
  pub async fn fetch_post_dtos(&self) -> Result<Vec<PostDto>> {
    let result = self
      .cache
      .fetch_list(|| self.client.fetch_posts())
      .await?;
    Ok(result.data)
  }

  /// Raw users, cache-first.
  pub async fn fetch_user_dtos(&self) -> Result<Vec<UserDto>> {
    let result = self
      .cache
      .fetch_list(|| self.client.fetch_users())
      .await?;
    Ok(result.data)
  }

  /// Raw comments, cache-first.
  pub async fn fetch_comment_dtos(&self) -> Result<Vec<CommentDto>> {
    let result = self
      .cache
      .fetch_list(|| self.client.fetch_comments())
      .await?;
    Ok(result.data)
  }

  /// Create a post at the source and put it at the front of the cached posts.
  pub async fn create_post(&self, id: i64, title: &str, body: &str) -> Result<DisplayPost> {
    let post = self.client.create_post(id, title, body).await?;
    self.cache.prepend_item(post.clone());
    info!(id, "Post created");
    Ok(post)
  }

  /// Drop a post from the cache and ask the source to delete it.
  ///
  /// Both the display and raw slots lose the record, so a rebuild from cached
  /// raw posts cannot bring it back. The remote outcome is never reported; see
  /// `ResourceClient::delete_post`.
  pub fn delete_post(&self, id: i64) -> JoinHandle<()> {
    self.cache.remove_item::<DisplayPost>(id);
    self.cache.remove_item::<PostDto>(id);
    info!(id, "Post removed from cache");
    self.client.delete_post(id)
  }

  /// Invalidate every cached collection at once.
  pub fn clear_all(&self) {
    clear_all_data(&self.cache);
  }
}
