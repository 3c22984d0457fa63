//! Serde types matching the resource API payloads.
//!
//! These are the normalized records as received from the remote API or the
//! bundled fixtures, before any join.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDto {
  pub id: i64,
  #[serde(rename = "userId")]
  pub author_id: i64,
  pub title: String,
  pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentDto {
  pub id: i64,
  #[serde(rename = "postId")]
  pub post_id: i64,
  #[serde(default)]
  pub name: String,
  #[serde(rename = "email")]
  pub author_email: String,
  pub body: String,
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDto {
  pub id: i64,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub username: String,
  pub email: String,
  #[serde(default)]
  pub address: Address,
  #[serde(default)]
  pub phone: String,
  #[serde(default)]
  pub website: String,
  #[serde(default)]
  pub company: Company,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
  pub street: String,
  pub suite: String,
  pub city: String,
  pub zipcode: String,
  // The API sends coordinates as strings
  pub geo: Option<Geo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geo {
  pub lat: String,
  pub lng: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
  pub name: String,
  #[serde(rename = "catchPhrase")]
  pub catch_phrase: String,
  pub bs: String,
}

// ============================================================================
// Mutations
// ============================================================================

/// Body of a `POST posts` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPost {
  pub id: i64,
  #[serde(rename = "userId")]
  pub author_id: i64,
  pub title: String,
  pub body: String,
}

impl NewPost {
  /// The post as it would come back from the server.
  pub fn into_dto(self) -> PostDto {
    PostDto {
      id: self.id,
      author_id: self.author_id,
      title: self.title,
      body: self.body,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_decode_user_with_string_coordinates() {
    let json = r#"{
      "id": 3,
      "name": "Clementine Bauch",
      "username": "Samantha",
      "email": "Nathan@yesenia.net",
      "address": {
        "street": "Douglas Extension",
        "suite": "Suite 847",
        "city": "McKenziehaven",
        "zipcode": "59590-4157",
        "geo": { "lat": "-68.6102", "lng": "-47.0653" }
      },
      "phone": "1-463-123-4447",
      "website": "ramiro.info",
      "company": {
        "name": "Romaguera-Jacobson",
        "catchPhrase": "Face to face bifurcated interface",
        "bs": "e-enable strategic applications"
      }
    }"#;

    let user: UserDto = serde_json::from_str(json).unwrap();
    assert_eq!(user.website, "ramiro.info");
    assert_eq!(user.company.catch_phrase, "Face to face bifurcated interface");
    assert_eq!(user.address.geo.unwrap().lat, "-68.6102");
  }

  #[test]
  fn test_decode_minimal_user() {
    let user: UserDto = serde_json::from_str(r#"{"id": 1, "email": "a@b.c"}"#).unwrap();
    assert_eq!(user.address, Address::default());
  }

  #[test]
  fn test_decode_comment_field_names() {
    let json = r#"{"postId": 1, "id": 2, "name": "n", "email": "X@Y.z", "body": "b"}"#;
    let comment: CommentDto = serde_json::from_str(json).unwrap();
    assert_eq!(comment.post_id, 1);
    assert_eq!(comment.author_email, "X@Y.z");
  }

  #[test]
  fn test_new_post_wire_format() {
    let post = NewPost {
      id: 101,
      author_id: 1,
      title: "t".to_string(),
      body: "b".to_string(),
    };
    let value = serde_json::to_value(&post).unwrap();
    assert_eq!(value["userId"], 1);
    assert_eq!(value["title"], "t");
  }
}
