//! Fan-out join of posts with their authors and comments.

use std::future::Future;

use futures::future::try_join_all;
use tracing::warn;

use crate::error::{Error, Result};

use super::api_types::{CommentDto, PostDto, UserDto};
use super::types::{DisplayComment, DisplayPost};

/// Join every post with its author and comments.
///
/// Per post, the author and comment lookups run concurrently; across posts, all
/// joins run concurrently. The output keeps the input order no matter which join
/// finishes first. Posts whose author is missing (or has no email) are left out
/// with a warning, as are posts with a blank title or body. A resolver error
/// fails the whole assembly.
///
/// The repository resolves from collections already in memory, so its lookups
/// cannot fail. Only the author lookup of a freshly created post reaches the
/// client and can surface an error here.
pub async fn assemble<U, UFut, C, CFut>(
  posts: Vec<PostDto>,
  resolve_user: U,
  resolve_comments: C,
) -> Result<Vec<DisplayPost>>
where
  U: Fn(i64) -> UFut,
  UFut: Future<Output = Result<Option<UserDto>>>,
  C: Fn(i64) -> CFut,
  CFut: Future<Output = Result<Vec<CommentDto>>>,
{
  let joins = posts.into_iter().map(|post| {
    let user = resolve_user(post.author_id);
    let comments = resolve_comments(post.id);
    async move {
      let (user, comments) = futures::try_join!(user, comments)?;
      Ok::<_, Error>(join_post(post, user, comments))
    }
  });

  let joined = try_join_all(joins).await?;
  Ok(joined.into_iter().flatten().collect())
}

fn join_post(post: PostDto, user: Option<UserDto>, comments: Vec<CommentDto>) -> Option<DisplayPost> {
  if post.title.trim().is_empty() || post.body.trim().is_empty() {
    warn!(post_id = post.id, "Post has no title or body, dropping post");
    return None;
  }

  let user = match user {
    Some(user) if !user.email.trim().is_empty() => user,
    Some(_) => {
      warn!(post_id = post.id, user_id = post.author_id, "Author has no email, dropping post");
      return None;
    }
    None => {
      warn!(post_id = post.id, user_id = post.author_id, "Author not found, dropping post");
      return None;
    }
  };

  Some(DisplayPost::new(
    post.id,
    &post.title,
    &post.body,
    &user.email,
    comments.into_iter().map(DisplayComment::from).collect(),
  ))
}

#[cfg(test)]
mod tests {
  use super::*;
  use futures::future::ready;
  use std::time::Duration;

  fn post(id: i64, author_id: i64) -> PostDto {
    PostDto {
      id,
      author_id,
      title: format!("title {}", id),
      body: format!("body {}", id),
    }
  }

  fn user(id: i64, email: &str) -> UserDto {
    serde_json::from_value(serde_json::json!({ "id": id, "email": email })).unwrap()
  }

  fn comment(id: i64, post_id: i64) -> CommentDto {
    CommentDto {
      id,
      post_id,
      name: String::new(),
      author_email: format!("C{}@Example.com", id),
      body: "nice".to_string(),
    }
  }

  #[tokio::test]
  async fn test_joins_author_and_comments() {
    let posts = vec![post(1, 10)];

    let result = assemble(
      posts,
      |id| ready(Ok(Some(user(id, "Sincere@April.biz")))),
      |post_id| ready(Ok(vec![comment(1, post_id), comment(2, post_id)])),
    )
    .await
    .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].author_email, "sincere@april.biz");
    assert_eq!(result[0].title, "Title 1");
    assert_eq!(result[0].comments.len(), 2);
    assert_eq!(result[0].comments[1].author_email, "c2@example.com");
  }

  #[tokio::test]
  async fn test_unresolved_authors_are_excluded() {
    let posts = vec![post(1, 1), post(2, 99), post(3, 1), post(4, 2)];

    let result = assemble(
      posts,
      |id| {
        ready(Ok(match id {
          1 => Some(user(1, "one@example.com")),
          2 => Some(user(2, "   ")),
          _ => None,
        }))
      },
      |_| ready(Ok(Vec::new())),
    )
    .await
    .unwrap();

    let ids: Vec<i64> = result.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 3]);
  }

  #[tokio::test]
  async fn test_blank_title_or_body_is_excluded() {
    let mut untitled = post(2, 1);
    untitled.title = "  ".to_string();
    let mut empty = post(3, 1);
    empty.body = String::new();
    let posts = vec![post(1, 1), untitled, empty, post(4, 1)];

    let result = assemble(
      posts,
      |id| ready(Ok(Some(user(id, "a@b.c")))),
      |_| ready(Ok(Vec::new())),
    )
    .await
    .unwrap();

    let ids: Vec<i64> = result.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 4]);
  }

  #[tokio::test]
  async fn test_order_is_stable_under_shuffled_latencies() {
    let posts: Vec<PostDto> = (1..=30).map(|id| post(id, 1)).collect();

    let result = assemble(
      posts,
      |id| async move { Ok::<_, Error>(Some(user(id, "a@b.c"))) },
      |post_id| async move {
        // Later posts tend to finish first
        let delay = ((31 - post_id) * 7919 % 23) as u64;
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok::<_, Error>(vec![comment(post_id * 10, post_id)])
      },
    )
    .await
    .unwrap();

    let ids: Vec<i64> = result.iter().map(|p| p.id).collect();
    assert_eq!(ids, (1..=30).collect::<Vec<i64>>());
    assert!(result.iter().all(|p| p.comments[0].id == p.id * 10));
  }

  #[tokio::test]
  async fn test_resolver_error_fails_assembly() {
    let posts = vec![post(1, 1), post(2, 1)];

    let result = assemble(
      posts,
      |id| ready(Ok(Some(user(id, "a@b.c")))),
      |post_id| {
        ready(if post_id == 2 {
          Err(Error::NoConnectivity)
        } else {
          Ok(Vec::new())
        })
      },
    )
    .await;

    assert_eq!(result.unwrap_err(), Error::NoConnectivity);
  }

  #[tokio::test]
  async fn test_empty_input() {
    let result = assemble(
      Vec::new(),
      |_| ready(Ok(None)),
      |_| ready(Ok(Vec::new())),
    )
    .await
    .unwrap();
    assert!(result.is_empty());
  }
}
