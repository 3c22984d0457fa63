//! Error taxonomy for the data layer.

/// Failure surfaced by resource fetching, aggregation and mutations.
///
/// Cache failures are represented by [`Error::CacheCodec`] but are recovered
/// inside the cache layer and only logged; callers never see them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
  /// The remote source was skipped because the network is unreachable.
  #[error("No internet connection, please try again later")]
  NoConnectivity,

  /// Bad status code, transport failure or malformed payload.
  #[error("Remote request failed: {0}")]
  Remote(String),

  /// A bundled or on-disk fixture could not be read or decoded.
  #[error("Failed to load mock data. ({0})")]
  FixtureLoad(String),

  /// A form field was empty after trimming.
  #[error("Please fill all fields.")]
  Validation,

  /// Local serialize/deserialize failure.
  #[error("Cache codec failure: {0}")]
  CacheCodec(String),

  /// A freshly created post referenced an author that does not exist.
  #[error("Author {0} could not be resolved")]
  AuthorNotFound(i64),
}

impl Error {
  /// Message shown to the user when creating a post fails.
  pub fn create_failure_message(&self) -> String {
    match self {
      Self::NoConnectivity | Self::Validation => self.to_string(),
      _ => "Failed to create a new post. Please try again later.".to_string(),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_create_failure_message_keeps_actionable_errors() {
    assert_eq!(
      Error::Validation.create_failure_message(),
      "Please fill all fields."
    );
    assert_eq!(
      Error::NoConnectivity.create_failure_message(),
      "No internet connection, please try again later"
    );
  }

  #[test]
  fn test_create_failure_message_hides_transport_details() {
    let message = Error::Remote("HTTP 500".to_string()).create_failure_message();
    assert_eq!(
      message,
      "Failed to create a new post. Please try again later."
    );
  }
}
