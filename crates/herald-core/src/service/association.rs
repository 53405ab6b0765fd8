//! [`SubscriberAssociations`] — idempotent batch association of subscribers
//! with a topic.

use std::{collections::HashSet, sync::Arc};

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
  Error, Result,
  id::TopicId,
  scope::TenantScope,
  store::TopicStore,
  subscriber::{NewAssociation, Subscriber, SubscriberId},
  topic::{Topic, TopicWithSubscribers},
};

/// What an [`SubscriberAssociations::associate`] call left in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationOutcome {
  pub topic_id:    TopicId,
  /// Every subscriber now associated with the topic, oldest first, including
  /// those associated before this call.
  pub subscribers: Vec<SubscriberId>,
  /// Requested ids whose association this call created.
  pub added:       Vec<SubscriberId>,
  /// Requested ids that do not resolve in the scope; skipped, not fatal.
  pub not_found:   Vec<SubscriberId>,
}

pub struct SubscriberAssociations<S> {
  store: Arc<S>,
}

impl<S> Clone for SubscriberAssociations<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: TopicStore> SubscriberAssociations<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Associate `subscriber_ids` with a topic visible from `scope`.
  ///
  /// Repeated ids are collapsed and existing associations are left alone, so
  /// calling this again with the same input changes nothing and does not
  /// fail. Only a missing topic is an error.
  pub async fn associate(
    &self,
    topic_id: TopicId,
    scope: TenantScope,
    subscriber_ids: Vec<SubscriberId>,
  ) -> Result<AssociationOutcome> {
    self.require_topic(topic_id, scope).await?;

    let requested = dedup(subscriber_ids);
    let resolved =
      try_join_all(requested.into_iter().map(|id| self.resolve(id, scope)))
        .await?;

    let mut not_found = Vec::new();
    let mut added = Vec::new();
    for (id, subscriber) in resolved {
      let Some(subscriber) = subscriber else {
        debug!(topic_id = %topic_id, subscriber_id = %id, "subscriber not in scope; skipping");
        not_found.push(id);
        continue;
      };
      if self.link(topic_id, &subscriber).await? {
        added.push(id);
      }
    }

    let subscribers = self.associated_ids(topic_id).await?;
    info!(
      topic_id = %topic_id,
      added = added.len(),
      total = subscribers.len(),
      skipped = not_found.len(),
      "associated subscribers"
    );

    Ok(AssociationOutcome { topic_id, subscribers, added, not_found })
  }

  /// The topic together with its current subscribers.
  pub async fn list(
    &self,
    topic_id: TopicId,
    scope: TenantScope,
  ) -> Result<TopicWithSubscribers> {
    let topic = self.require_topic(topic_id, scope).await?;
    self.with_subscribers(topic).await
  }

  /// Attach the current subscriber list to an already-fetched topic.
  pub async fn with_subscribers(&self, topic: Topic) -> Result<TopicWithSubscribers> {
    let subscribers = self.associated_ids(topic.topic_id).await?;
    Ok(TopicWithSubscribers { topic, subscribers })
  }

  /// Caller-facing ids of every subscriber associated with `topic_id`.
  pub async fn associated_ids(&self, topic_id: TopicId) -> Result<Vec<SubscriberId>> {
    let associations = self
      .store
      .list_associations(topic_id)
      .await
      .map_err(Error::store)?;
    Ok(associations.into_iter().map(|a| a.subscriber_id).collect())
  }

  async fn require_topic(&self, topic_id: TopicId, scope: TenantScope) -> Result<Topic> {
    self
      .store
      .get_topic(topic_id, scope)
      .await
      .map_err(Error::store)?
      .ok_or(Error::TopicNotFound(topic_id))
  }

  async fn resolve(
    &self,
    id: SubscriberId,
    scope: TenantScope,
  ) -> Result<(SubscriberId, Option<Subscriber>)> {
    let found = self
      .store
      .find_subscriber(id.clone(), scope)
      .await
      .map_err(Error::store)?;
    Ok((id, found))
  }

  /// Returns `true` if this call created the association.
  async fn link(&self, topic_id: TopicId, subscriber: &Subscriber) -> Result<bool> {
    let existing = self
      .store
      .find_association(topic_id, subscriber.subscriber_record_id)
      .await
      .map_err(Error::store)?;
    if existing.is_some() {
      return Ok(false);
    }

    // A concurrent caller may insert the pair after our lookup; the store
    // reports that as a duplicate, which is the state we wanted anyway.
    let inserted = self
      .store
      .create_association(NewAssociation::new(topic_id, subscriber))
      .await
      .map_err(Error::store)?;
    Ok(!inserted.is_duplicate())
  }
}

/// Drop repeated ids, keeping first-occurrence order.
fn dedup(ids: Vec<SubscriberId>) -> Vec<SubscriberId> {
  let mut seen = HashSet::with_capacity(ids.len());
  ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
