//! Error types for `herald-core`.

use thiserror::Error;

use crate::id::{TopicId, UserId};

#[derive(Debug, Error)]
pub enum Error {
  /// A topic with this key already exists in the caller's tenant scope.
  /// Raised both by the pre-insert lookup and by a storage-level uniqueness
  /// rejection, so callers see one error for either race branch.
  #[error("there is already a topic with the key {key} for user {user_id}")]
  Conflict { key: String, user_id: UserId },

  #[error("topic not found: {0}")]
  TopicNotFound(TopicId),

  #[error("no topic with the key {0}")]
  TopicKeyNotFound(String),

  #[error("invalid {kind}: {reason}")]
  InvalidId { kind: &'static str, reason: String },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error. Used as `.map_err(Error::store)`.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
