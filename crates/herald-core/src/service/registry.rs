//! [`TopicRegistry`] — creates topics and enforces per-scope key uniqueness.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  id::TopicId,
  scope::TenantScope,
  store::{Inserted, TopicStore},
  topic::{NewTopic, Topic},
};

pub struct TopicRegistry<S> {
  store: Arc<S>,
}

impl<S> Clone for TopicRegistry<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: TopicStore> TopicRegistry<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Create a topic keyed `key` in `scope`.
  ///
  /// Fails with [`Error::Conflict`] if the scope already owns a topic with
  /// this key, whatever its name. A duplicate rejected by the store after the
  /// lookup passed (two concurrent creators) surfaces as the same error.
  pub async fn create(
    &self,
    key: String,
    name: String,
    scope: TenantScope,
  ) -> Result<Topic> {
    let existing = self
      .store
      .find_topic_by_key(key.clone(), scope)
      .await
      .map_err(Error::store)?;

    if existing.is_some() {
      debug!(key = %key, user_id = %scope.user_id, "topic key already taken");
      return Err(Error::Conflict { key, user_id: scope.user_id });
    }

    let input = NewTopic { key: key.clone(), name, scope };
    match self.store.create_topic(input).await.map_err(Error::store)? {
      Inserted::Created(topic) => {
        info!(
          topic_id = %topic.topic_id,
          key = %topic.key,
          organization_id = %topic.organization_id,
          environment_id = %topic.environment_id,
          "created topic"
        );
        Ok(topic)
      }
      Inserted::Duplicate => {
        warn!(
          key = %key,
          user_id = %scope.user_id,
          "topic key claimed between lookup and insert"
        );
        Err(Error::Conflict { key, user_id: scope.user_id })
      }
    }
  }

  /// Fetch a topic visible from `scope`.
  pub async fn get(&self, topic_id: TopicId, scope: TenantScope) -> Result<Topic> {
    self
      .store
      .get_topic(topic_id, scope)
      .await
      .map_err(Error::store)?
      .ok_or(Error::TopicNotFound(topic_id))
  }

  /// Fetch the topic `scope` owns under `key`.
  pub async fn find_by_key(&self, key: String, scope: TenantScope) -> Result<Topic> {
    self
      .store
      .find_topic_by_key(key.clone(), scope)
      .await
      .map_err(Error::store)?
      .ok_or(Error::TopicKeyNotFound(key))
  }
}
