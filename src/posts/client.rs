//! Resource client capability shared by the remote and fixture sources.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::ready;
use tokio::task::JoinHandle;

use crate::config::{Config, Environment};
use crate::connectivity::Connectivity;
use crate::error::{Error, Result};

use super::aggregate::assemble;
use super::api_types::{CommentDto, NewPost, PostDto, UserDto};
use super::fixture::FixtureClient;
use super::remote::RemoteClient;
use super::types::DisplayPost;

/// Source of raw post, user and comment records.
#[async_trait]
pub trait ResourceClient: Send + Sync {
  async fn fetch_posts(&self) -> Result<Vec<PostDto>>;

  async fn fetch_users(&self) -> Result<Vec<UserDto>>;

  async fn fetch_comments(&self) -> Result<Vec<CommentDto>>;

  /// A missing user is `Ok(None)`, not an error.
  async fn fetch_user_by_id(&self, id: i64) -> Result<Option<UserDto>>;

  /// An unknown post id yields an empty list.
  async fn fetch_comments_by_post_id(&self, post_id: i64) -> Result<Vec<CommentDto>>;

  /// Insert a post at the source and return what the source echoed back.
  async fn insert_post(&self, post: NewPost) -> Result<PostDto>;

  /// Delete a post without reporting the outcome.
  ///
  /// Returns immediately. Failures are logged by the spawned task; the handle
  /// only tells when the attempt finished and can be dropped to detach.
  fn delete_post(&self, id: i64) -> JoinHandle<()>;

  /// Author assigned to posts created through this client.
  fn default_author_id(&self) -> i64;

  /// Insert a post and resolve it into a display post.
  ///
  /// The given id, title and body win over anything the source echoes, and the
  /// result carries no comments.
  async fn create_post(&self, id: i64, title: &str, body: &str) -> Result<DisplayPost> {
    let echoed = self
      .insert_post(NewPost {
        id,
        author_id: self.default_author_id(),
        title: title.to_string(),
        body: body.to_string(),
      })
      .await?;

    let post = PostDto {
      id,
      author_id: echoed.author_id,
      title: title.to_string(),
      body: body.to_string(),
    };
    let author_id = post.author_id;

    let mut joined = assemble(
      vec![post],
      move |user_id| self.fetch_user_by_id(user_id),
      |_| ready(Ok(Vec::new())),
    )
    .await?;

    joined.pop().ok_or(Error::AuthorNotFound(author_id))
  }
}

/// Build the client for an environment.
pub fn make_client(
  environment: Environment,
  config: &Config,
  connectivity: Connectivity,
) -> Result<Arc<dyn ResourceClient>> {
  match environment {
    Environment::Mock => {
      let client = match &config.fixtures_dir {
        Some(dir) => FixtureClient::from_dir(dir.clone()),
        None => FixtureClient::bundled(),
      };
      Ok(Arc::new(client.with_default_author(config.api.default_author_id)))
    }
    Environment::Real => Ok(Arc::new(RemoteClient::new(
      &config.api.base_url,
      config.api.default_author_id,
      connectivity,
    )?)),
  }
}
