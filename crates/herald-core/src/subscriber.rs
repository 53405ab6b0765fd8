//! Subscribers and their associations with topics.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  id::{
    AssociationId, EnvironmentId, OrganizationId, SubscriberRecordId, TopicId,
  },
  scope::TenantScope,
};

/// The caller-facing identifier of a subscriber.
///
/// Free-form and chosen by the caller (e.g. their own user id), so unlike the
/// UUID-backed ids it is kept as a string end to end.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SubscriberId(String);

impl SubscriberId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }

  pub fn into_string(self) -> String { self.0 }

  pub fn is_empty(&self) -> bool { self.0.trim().is_empty() }
}

impl fmt::Display for SubscriberId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl AsRef<str> for SubscriberId {
  fn as_ref(&self) -> &str { &self.0 }
}

impl From<&str> for SubscriberId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl From<String> for SubscriberId {
  fn from(s: String) -> Self { Self(s) }
}

// ─── Subscriber ──────────────────────────────────────────────────────────────

/// A subscriber registered within an organization and environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
  pub subscriber_record_id: SubscriberRecordId,
  pub subscriber_id:        SubscriberId,
  pub organization_id:      OrganizationId,
  pub environment_id:       EnvironmentId,
  pub created_at:           DateTime<Utc>,
}

/// Input to [`crate::store::TopicStore::create_subscriber`].
#[derive(Debug, Clone)]
pub struct NewSubscriber {
  pub subscriber_id:   SubscriberId,
  pub organization_id: OrganizationId,
  pub environment_id:  EnvironmentId,
}

impl NewSubscriber {
  pub fn in_scope(subscriber_id: SubscriberId, scope: TenantScope) -> Self {
    Self {
      subscriber_id,
      organization_id: scope.organization_id,
      environment_id: scope.environment_id,
    }
  }
}

// ─── Association ─────────────────────────────────────────────────────────────

/// Links one subscriber to one topic. At most one row exists per
/// `(topic_id, subscriber_record_id)`; rows are never updated or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberAssociation {
  pub association_id:       AssociationId,
  pub topic_id:             TopicId,
  pub subscriber_record_id: SubscriberRecordId,
  /// Denormalised caller-facing id, so listing a topic needs no join.
  pub subscriber_id:        SubscriberId,
  pub organization_id:      OrganizationId,
  pub environment_id:       EnvironmentId,
  pub created_at:           DateTime<Utc>,
}

/// Input to [`crate::store::TopicStore::create_association`].
#[derive(Debug, Clone)]
pub struct NewAssociation {
  pub topic_id:             TopicId,
  pub subscriber_record_id: SubscriberRecordId,
  pub subscriber_id:        SubscriberId,
  pub organization_id:      OrganizationId,
  pub environment_id:       EnvironmentId,
}

impl NewAssociation {
  pub fn new(topic_id: TopicId, subscriber: &Subscriber) -> Self {
    Self {
      topic_id,
      subscriber_record_id: subscriber.subscriber_record_id,
      subscriber_id: subscriber.subscriber_id.clone(),
      organization_id: subscriber.organization_id,
      environment_id: subscriber.environment_id,
    }
  }
}
