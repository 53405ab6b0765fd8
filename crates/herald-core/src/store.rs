//! The `TopicStore` trait — the persistence contract the services depend on.
//!
//! The trait is implemented by storage backends (e.g. `herald-store-sqlite`).
//! Higher layers reach storage only through [`crate::service`], never through
//! a concrete backend.

use std::future::Future;

use crate::{
  id::{SubscriberRecordId, TopicId},
  scope::TenantScope,
  subscriber::{
    NewAssociation, NewSubscriber, Subscriber, SubscriberAssociation,
    SubscriberId,
  },
  topic::{NewTopic, Topic},
};

// ─── Insert outcome ──────────────────────────────────────────────────────────

/// Result of an insert guarded by a storage-level uniqueness constraint.
///
/// Backends must report a rejected duplicate as [`Inserted::Duplicate`]
/// rather than as an error; other failures remain errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inserted<T> {
  Created(T),
  Duplicate,
}

impl<T> Inserted<T> {
  pub fn is_duplicate(&self) -> bool { matches!(self, Self::Duplicate) }

  pub fn created(self) -> Option<T> {
    match self {
      Self::Created(v) => Some(v),
      Self::Duplicate => None,
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Herald storage backend.
///
/// Topics, subscribers and associations are append-only. The backend owns
/// the uniqueness invariants: `(key, organization, environment, user)` for
/// topics, `(subscriber_id, organization, environment)` for subscribers, and
/// `(topic, subscriber)` for associations. A lookup followed by an insert is
/// not atomic; the constraint is what makes concurrent callers safe.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait TopicStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Topics ────────────────────────────────────────────────────────────

  /// Find the topic with `key` owned by exactly this scope (all three ids).
  fn find_topic_by_key(
    &self,
    key: String,
    scope: TenantScope,
  ) -> impl Future<Output = Result<Option<Topic>, Self::Error>> + Send + '_;

  /// Retrieve a topic by id, visible only to the scope that owns it.
  /// Returns `None` if not found.
  fn get_topic(
    &self,
    topic_id: TopicId,
    scope: TenantScope,
  ) -> impl Future<Output = Result<Option<Topic>, Self::Error>> + Send + '_;

  /// Persist a new topic. The store assigns `topic_id` and `created_at`.
  fn create_topic(
    &self,
    input: NewTopic,
  ) -> impl Future<Output = Result<Inserted<Topic>, Self::Error>> + Send + '_;

  // ── Subscribers ───────────────────────────────────────────────────────

  /// Persist a new subscriber in an organization and environment.
  fn create_subscriber(
    &self,
    input: NewSubscriber,
  ) -> impl Future<Output = Result<Inserted<Subscriber>, Self::Error>> + Send + '_;

  /// Resolve a caller-facing subscriber id within the scope's organization
  /// and environment.
  fn find_subscriber(
    &self,
    subscriber_id: SubscriberId,
    scope: TenantScope,
  ) -> impl Future<Output = Result<Option<Subscriber>, Self::Error>> + Send + '_;

  // ── Associations ──────────────────────────────────────────────────────

  fn find_association(
    &self,
    topic_id: TopicId,
    subscriber_record_id: SubscriberRecordId,
  ) -> impl Future<Output = Result<Option<SubscriberAssociation>, Self::Error>>
  + Send
  + '_;

  /// Persist an association. A second insert for the same
  /// `(topic, subscriber)` pair yields [`Inserted::Duplicate`].
  fn create_association(
    &self,
    input: NewAssociation,
  ) -> impl Future<Output = Result<Inserted<SubscriberAssociation>, Self::Error>>
  + Send
  + '_;

  /// All associations of a topic, oldest first.
  fn list_associations(
    &self,
    topic_id: TopicId,
  ) -> impl Future<Output = Result<Vec<SubscriberAssociation>, Self::Error>>
  + Send
  + '_;
}
