use serde::{Deserialize, Serialize};

use super::api_types::CommentDto;

/// Seeded image endpoint; `{seed}/{width}/{height}` is appended.
pub const IMAGE_BASE_URL: &str = "https://picsum.photos/seed/";
const THUMBNAIL_SIZE: (u32, u32) = (280, 140);
const DETAIL_SIZE: (u32, u32) = (1024, 512);

/// Denormalized post, ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayPost {
  pub id: i64,
  pub title: String,
  pub content: String,
  pub author_email: String,
  pub comments: Vec<DisplayComment>,
  pub thumbnail_ref: String,
  pub detail_ref: String,
}

impl DisplayPost {
  /// Build a display post, normalizing text fields and deriving image refs from the id.
  pub fn new(
    id: i64,
    title: &str,
    content: &str,
    author_email: &str,
    comments: Vec<DisplayComment>,
  ) -> Self {
    Self {
      id,
      title: capitalize_first(title),
      content: capitalize_first(content),
      author_email: author_email.to_lowercase(),
      comments,
      thumbnail_ref: thumbnail_url(id),
      detail_ref: detail_url(id),
    }
  }
}

/// Comment as shown under a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayComment {
  pub id: i64,
  pub author_email: String,
  pub content: String,
}

impl From<CommentDto> for DisplayComment {
  fn from(comment: CommentDto) -> Self {
    Self {
      id: comment.id,
      author_email: comment.author_email.to_lowercase(),
      content: capitalize_first(&comment.body),
    }
  }
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize_first(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

pub fn thumbnail_url(seed: i64) -> String {
  image_url(seed, THUMBNAIL_SIZE)
}

pub fn detail_url(seed: i64) -> String {
  image_url(seed, DETAIL_SIZE)
}

fn image_url(seed: i64, (width, height): (u32, u32)) -> String {
  format!("{}{}/{}/{}", IMAGE_BASE_URL, seed, width, height)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_capitalize_first() {
    assert_eq!(capitalize_first("hello world"), "Hello world");
    assert_eq!(capitalize_first("Already"), "Already");
    assert_eq!(capitalize_first("élan"), "Élan");
    assert_eq!(capitalize_first(""), "");
  }

  #[test]
  fn test_display_post_normalizes_fields() {
    let post = DisplayPost::new(7, "title", "body text", "Sincere@April.biz", vec![]);

    assert_eq!(post.title, "Title");
    assert_eq!(post.content, "Body text");
    assert_eq!(post.author_email, "sincere@april.biz");
    assert_eq!(post.thumbnail_ref, "https://picsum.photos/seed/7/280/140");
    assert_eq!(post.detail_ref, "https://picsum.photos/seed/7/1024/512");
  }

  #[test]
  fn test_display_comment_from_dto() {
    let comment = DisplayComment::from(CommentDto {
      id: 500,
      post_id: 100,
      name: "ex eaque eum natus".to_string(),
      author_email: "Emma@joanny.ca".to_string(),
      body: "perspiciatis quis doloremque".to_string(),
    });

    assert_eq!(comment.author_email, "emma@joanny.ca");
    assert_eq!(comment.content, "Perspiciatis quis doloremque");
  }
}
