//! Topics — uniquely-keyed groupings that subscribers are associated with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  id::{EnvironmentId, OrganizationId, TopicId, UserId},
  scope::TenantScope,
  subscriber::SubscriberId,
};

/// A persisted topic. No field changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
  pub topic_id:        TopicId,
  /// Caller-supplied key, unique within the owning [`TenantScope`].
  pub key:             String,
  /// Display label; not unique.
  pub name:            String,
  pub organization_id: OrganizationId,
  pub environment_id:  EnvironmentId,
  pub user_id:         UserId,
  /// Server-assigned timestamp.
  pub created_at:      DateTime<Utc>,
}

impl Topic {
  /// The tenant scope that owns this topic.
  pub fn scope(&self) -> TenantScope {
    TenantScope::new(self.organization_id, self.environment_id, self.user_id)
  }
}

/// Input to [`crate::store::TopicStore::create_topic`].
/// `topic_id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewTopic {
  pub key:   String,
  pub name:  String,
  pub scope: TenantScope,
}

/// A topic together with the subscribers associated with it at the time of
/// the call, oldest association first. Assembled on read; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicWithSubscribers {
  #[serde(flatten)]
  pub topic:       Topic,
  pub subscribers: Vec<SubscriberId>,
}
