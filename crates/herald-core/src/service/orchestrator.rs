//! [`TopicCreator`] — "create a topic with subscribers" as one operation.
//!
//! The two steps are not transactional. Topic creation runs first and is the
//! durable step; subscriber association runs second and is the retryable one.
//! If association fails the topic stays, and the returned [`TopicCreation`]
//! says so instead of pretending nothing happened.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
  Result,
  scope::TenantScope,
  service::{SubscriberAssociations, TopicRegistry},
  store::TopicStore,
  subscriber::SubscriberId,
  topic::Topic,
};

/// The persisted state after [`TopicCreator::create_topic_with_subscribers`].
///
/// Returned only when the topic was created; a topic that could not be
/// created is an error and nothing was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCreation {
  #[serde(flatten)]
  pub topic:                  Topic,
  /// Subscribers associated with the new topic when the call returned.
  /// `None` if association failed and the list could not be read back.
  pub subscribers:            Option<Vec<SubscriberId>>,
  /// Requested ids that did not resolve in the scope. `None` if association
  /// failed before every id was checked.
  pub not_found:              Option<Vec<SubscriberId>>,
  /// `false` when association failed part way; retry through the
  /// add-subscribers path.
  pub subscribers_associated: bool,
  pub association_error:      Option<String>,
}

pub struct TopicCreator<S> {
  registry:     TopicRegistry<S>,
  associations: SubscriberAssociations<S>,
}

impl<S> Clone for TopicCreator<S> {
  fn clone(&self) -> Self {
    Self {
      registry:     self.registry.clone(),
      associations: self.associations.clone(),
    }
  }
}

impl<S: TopicStore> TopicCreator<S> {
  pub fn new(
    registry: TopicRegistry<S>,
    associations: SubscriberAssociations<S>,
  ) -> Self {
    Self { registry, associations }
  }

  /// Create a topic, then associate `subscriber_ids` with it.
  ///
  /// A key conflict fails before any subscriber is touched.
  pub async fn create_topic_with_subscribers(
    &self,
    key: String,
    name: String,
    scope: TenantScope,
    subscriber_ids: Vec<SubscriberId>,
  ) -> Result<TopicCreation> {
    let topic = self.registry.create(key, name, scope).await?;

    match self
      .associations
      .associate(topic.topic_id, scope, subscriber_ids)
      .await
    {
      Ok(outcome) => Ok(TopicCreation {
        topic,
        subscribers: Some(outcome.subscribers),
        not_found: Some(outcome.not_found),
        subscribers_associated: true,
        association_error: None,
      }),
      Err(err) => {
        warn!(
          topic_id = %topic.topic_id,
          key = %topic.key,
          error = %err,
          "topic created but subscriber association failed"
        );
        // Report whatever did get written before the failure.
        let subscribers = match self.associations.associated_ids(topic.topic_id).await {
          Ok(ids) => Some(ids),
          Err(read_err) => {
            warn!(topic_id = %topic.topic_id, error = %read_err, "could not read back subscribers");
            None
          }
        };
        Ok(TopicCreation {
          topic,
          subscribers,
          not_found: None,
          subscribers_associated: false,
          association_error: Some(err.to_string()),
        })
      }
    }
  }
}
