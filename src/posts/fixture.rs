//! Resource client backed by static fixture data.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::error::{Error, Result};

use super::api_types::{CommentDto, NewPost, PostDto, UserDto};
use super::client::ResourceClient;

const POSTS_FILE: &str = "posts.json";
const USERS_FILE: &str = "users.json";
const COMMENTS_FILE: &str = "comments.json";

const BUNDLED_POSTS: &str = include_str!("../../fixtures/posts.json");
const BUNDLED_USERS: &str = include_str!("../../fixtures/users.json");
const BUNDLED_COMMENTS: &str = include_str!("../../fixtures/comments.json");

#[derive(Debug, Clone)]
enum FixtureSource {
  /// Copies compiled into the binary
  Bundled,
  /// JSON files read from a directory on every fetch
  Directory(PathBuf),
}

/// Fixture-backed client. Never touches the network and ignores connectivity.
#[derive(Debug, Clone)]
pub struct FixtureClient {
  source: FixtureSource,
  default_author_id: i64,
}

impl FixtureClient {
  pub fn bundled() -> Self {
    Self {
      source: FixtureSource::Bundled,
      default_author_id: 1,
    }
  }

  pub fn from_dir(dir: PathBuf) -> Self {
    Self {
      source: FixtureSource::Directory(dir),
      default_author_id: 1,
    }
  }

  pub fn with_default_author(mut self, author_id: i64) -> Self {
    self.default_author_id = author_id;
    self
  }

  async fn load<T: DeserializeOwned>(&self, file: &str, bundled: &'static str) -> Result<Vec<T>> {
    let contents = match &self.source {
      FixtureSource::Bundled => bundled.to_string(),
      FixtureSource::Directory(dir) => {
        let path = dir.join(file);
        tokio::fs::read_to_string(&path).await.map_err(|e| {
          error!(path = %path.display(), "Cannot load fixture file: {}", e);
          Error::FixtureLoad(format!("{}: {}", path.display(), e))
        })?
      }
    };

    serde_json::from_str(&contents).map_err(|e| {
      error!(file, "Error decoding fixture file: {}", e);
      Error::FixtureLoad(format!("{}: {}", file, e))
    })
  }
}

#[async_trait]
impl ResourceClient for FixtureClient {
  async fn fetch_posts(&self) -> Result<Vec<PostDto>> {
    self.load(POSTS_FILE, BUNDLED_POSTS).await
  }

  async fn fetch_users(&self) -> Result<Vec<UserDto>> {
    self.load(USERS_FILE, BUNDLED_USERS).await
  }

  async fn fetch_comments(&self) -> Result<Vec<CommentDto>> {
    self.load(COMMENTS_FILE, BUNDLED_COMMENTS).await
  }

  async fn fetch_user_by_id(&self, id: i64) -> Result<Option<UserDto>> {
    let users = self.fetch_users().await?;
    Ok(users.into_iter().find(|user| user.id == id))
  }

  async fn fetch_comments_by_post_id(&self, post_id: i64) -> Result<Vec<CommentDto>> {
    let comments = self.fetch_comments().await?;
    Ok(
      comments
        .into_iter()
        .filter(|comment| comment.post_id == post_id)
        .collect(),
    )
  }

  async fn insert_post(&self, post: NewPost) -> Result<PostDto> {
    debug!(id = post.id, "Fixture insert (not persisted)");
    Ok(post.into_dto())
  }

  fn delete_post(&self, id: i64) -> JoinHandle<()> {
    tokio::spawn(async move {
      info!(id, "Fixture delete (not persisted)");
    })
  }

  fn default_author_id(&self) -> i64 {
    self.default_author_id
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_fetch_posts() {
    let posts = FixtureClient::bundled().fetch_posts().await.unwrap();

    assert_eq!(posts.len(), 100);
    assert_eq!(
      posts[0].title,
      "sunt aut facere repellat provident occaecati excepturi optio reprehenderit"
    );
    assert_eq!(
      posts[99].body,
      "cupiditate quo est a modi nesciunt soluta\nipsa voluptas error itaque dicta in\nautem qui minus magnam et distinctio eum\naccusamus ratione error aut"
    );
  }

  #[tokio::test]
  async fn test_fetch_comments() {
    let comments = FixtureClient::bundled().fetch_comments().await.unwrap();

    assert_eq!(comments.len(), 500);
    assert_eq!(comments[0].name, "id labore ex et quam laborum");
    assert_eq!(comments[499].author_email, "Emma@joanny.ca");
  }

  #[tokio::test]
  async fn test_fetch_users() {
    let users = FixtureClient::bundled().fetch_users().await.unwrap();

    assert_eq!(users.len(), 10);
    assert_eq!(users[0].address.city, "Gwenborough");
    assert_eq!(users[9].company.name, "Hoeger LLC");
  }

  #[tokio::test]
  async fn test_fetch_user_by_id() {
    let client = FixtureClient::bundled();

    assert!(client.fetch_user_by_id(-1).await.unwrap().is_none());

    let user = client.fetch_user_by_id(3).await.unwrap().unwrap();
    assert_eq!(user.email, "Nathan@yesenia.net");
    assert_eq!(user.website, "ramiro.info");
  }

  #[tokio::test]
  async fn test_fetch_comments_by_post_id() {
    let client = FixtureClient::bundled();

    assert!(client.fetch_comments_by_post_id(-1).await.unwrap().is_empty());

    let comments = client.fetch_comments_by_post_id(2).await.unwrap();
    assert_eq!(comments.len(), 5);
    assert_eq!(comments[0].id, 6);
    assert_eq!(
      comments.last().unwrap().name,
      "eaque et deleniti atque tenetur ut quo ut"
    );
  }

  #[tokio::test]
  async fn test_create_post() {
    let post = FixtureClient::bundled()
      .create_post(1, "Test Title", "Test Body")
      .await
      .unwrap();

    assert_eq!(post.id, 1);
    assert_eq!(post.title, "Test Title");
    assert_eq!(post.content, "Test Body");
    assert!(post.comments.is_empty());
    assert_eq!(post.author_email, "sincere@april.biz");
  }

  #[tokio::test]
  async fn test_create_post_with_unknown_author() {
    let result = FixtureClient::bundled()
      .with_default_author(404)
      .create_post(1, "Title", "Body")
      .await;

    assert_eq!(result.unwrap_err(), Error::AuthorNotFound(404));
  }

  #[tokio::test]
  async fn test_missing_fixture_directory() {
    let dir = tempfile::tempdir().unwrap();
    let client = FixtureClient::from_dir(dir.path().join("absent"));

    assert!(matches!(
      client.fetch_posts().await,
      Err(Error::FixtureLoad(_))
    ));
  }

  #[tokio::test]
  async fn test_malformed_fixture_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(USERS_FILE), "[{\"id\": \"one\"}]").unwrap();
    let client = FixtureClient::from_dir(dir.path().to_path_buf());

    let err = client.fetch_users().await.unwrap_err();
    assert!(matches!(err, Error::FixtureLoad(_)));
    assert_eq!(err.to_string().split(" (").next(), Some("Failed to load mock data."));
  }

  #[tokio::test]
  async fn test_directory_fixtures() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
      dir.path().join(POSTS_FILE),
      r#"[{"userId": 2, "id": 9, "title": "t", "body": "b"}]"#,
    )
    .unwrap();
    let client = FixtureClient::from_dir(dir.path().to_path_buf());

    let posts = client.fetch_posts().await.unwrap();
    assert_eq!(posts[0].author_id, 2);
  }

  #[tokio::test]
  async fn test_delete_post_completes() {
    FixtureClient::bundled().delete_post(5).await.unwrap();
  }
}
