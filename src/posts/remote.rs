//! Resource client for the remote HTTP API.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::connectivity::Connectivity;
use crate::error::{Error, Result};

use super::api_types::{CommentDto, NewPost, PostDto, UserDto};
use super::client::ResourceClient;

/// HTTP client for the posts/users/comments API.
///
/// Every call checks connectivity first and fails with `NoConnectivity`
/// without touching the network when offline.
#[derive(Debug, Clone)]
pub struct RemoteClient {
  http: reqwest::Client,
  base_url: Url,
  default_author_id: i64,
  connectivity: Connectivity,
}

impl RemoteClient {
  pub fn new(base_url: &str, default_author_id: i64, connectivity: Connectivity) -> Result<Self> {
    let mut base_url = Url::parse(base_url)
      .map_err(|e| Error::Remote(format!("Invalid API URL '{}': {}", base_url, e)))?;

    // Url::join drops the last path segment unless the base ends with a slash
    if !base_url.path().ends_with('/') {
      let path = format!("{}/", base_url.path());
      base_url.set_path(&path);
    }

    let http = reqwest::Client::builder()
      .user_agent(concat!("smposts/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| Error::Remote(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self {
      http,
      base_url,
      default_author_id,
      connectivity,
    })
  }

  fn endpoint(&self, path: &str) -> Result<Url> {
    self
      .base_url
      .join(path)
      .map_err(|e| Error::Remote(format!("Invalid endpoint '{}': {}", path, e)))
  }

  fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
    if !self.connectivity.has_connectivity() {
      return Err(Error::NoConnectivity);
    }
    Ok(self.http.request(method, self.endpoint(path)?))
  }

  /// Send a request and decode a JSON body.
  async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = request
      .send()
      .await
      .map_err(|e| Error::Remote(format!("Request failed: {}", e)))?;

    let status = response.status();
    let url = response.url().clone();
    if !status.is_success() {
      error!(%url, %status, "Bad server response");
      return Err(Error::Remote(format!("{} returned {}", url, status)));
    }

    let body = response
      .bytes()
      .await
      .map_err(|e| Error::Remote(format!("Failed to read response from {}: {}", url, e)))?;

    serde_json::from_slice(&body).map_err(|e| {
      error!(%url, "Failed to decode response: {}", e);
      Error::Remote(format!("Malformed payload from {}: {}", url, e))
    })
  }

  async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
    let request = self.request(Method::GET, path)?.query(query);
    debug!(path, ?query, "GET");
    Self::send_json(request).await
  }
}

#[async_trait]
impl ResourceClient for RemoteClient {
  async fn fetch_posts(&self) -> Result<Vec<PostDto>> {
    self.get("posts", &[]).await
  }

  async fn fetch_users(&self) -> Result<Vec<UserDto>> {
    self.get("users", &[]).await
  }

  async fn fetch_comments(&self) -> Result<Vec<CommentDto>> {
    self.get("comments", &[]).await
  }

  async fn fetch_user_by_id(&self, id: i64) -> Result<Option<UserDto>> {
    let users: Vec<UserDto> = self.get("users", &[("id", id.to_string())]).await?;
    // The filter is server-side; re-check in case the server ignores it
    Ok(users.into_iter().find(|user| user.id == id))
  }

  async fn fetch_comments_by_post_id(&self, post_id: i64) -> Result<Vec<CommentDto>> {
    let comments: Vec<CommentDto> = self
      .get("comments", &[("postId", post_id.to_string())])
      .await?;
    Ok(
      comments
        .into_iter()
        .filter(|comment| comment.post_id == post_id)
        .collect(),
    )
  }

  async fn insert_post(&self, post: NewPost) -> Result<PostDto> {
    let body = serde_json::to_vec(&post)
      .map_err(|e| Error::Remote(format!("Failed to encode post: {}", e)))?;
    let request = self
      .request(Method::POST, "posts")?
      .header(reqwest::header::CONTENT_TYPE, "application/json; charset=UTF-8")
      .body(body);

    info!(id = post.id, "Creating post");
    Self::send_json(request).await
  }

  fn delete_post(&self, id: i64) -> JoinHandle<()> {
    let request = self.request(Method::DELETE, &format!("posts/{}", id));

    tokio::spawn(async move {
      let request = match request {
        Ok(request) => request,
        Err(e) => {
          warn!(id, "Skipping remote delete: {}", e);
          return;
        }
      };

      match request.send().await {
        Ok(response) if response.status().is_success() => info!(id, "Post deleted"),
        Ok(response) => error!(id, status = %response.status(), "Failed to delete post"),
        Err(e) => error!(id, "Failed to delete post: {}", e),
      }
    })
  }

  fn default_author_id(&self) -> i64 {
    self.default_author_id
  }
}
