//! [`SubscriberDirectory`] — registers the subscribers that topic
//! associations resolve against.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
  Error, Result,
  scope::TenantScope,
  store::{Inserted, TopicStore},
  subscriber::{NewSubscriber, Subscriber, SubscriberId},
};

/// A subscriber and whether this call created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
  #[serde(flatten)]
  pub subscriber: Subscriber,
  pub created:    bool,
}

pub struct SubscriberDirectory<S> {
  store: Arc<S>,
}

impl<S> Clone for SubscriberDirectory<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: TopicStore> SubscriberDirectory<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Register `subscriber_id` in the scope's organization and environment,
  /// or return the existing registration.
  pub async fn register(
    &self,
    subscriber_id: SubscriberId,
    scope: TenantScope,
  ) -> Result<Registration> {
    if let Some(subscriber) = self.find(subscriber_id.clone(), scope).await? {
      return Ok(Registration { subscriber, created: false });
    }

    let input = NewSubscriber::in_scope(subscriber_id.clone(), scope);
    match self.store.create_subscriber(input).await.map_err(Error::store)? {
      Inserted::Created(subscriber) => {
        info!(
          subscriber_id = %subscriber.subscriber_id,
          organization_id = %subscriber.organization_id,
          environment_id = %subscriber.environment_id,
          "registered subscriber"
        );
        Ok(Registration { subscriber, created: true })
      }
      // Registered concurrently; the row is there now.
      Inserted::Duplicate => {
        let subscriber = self.find(subscriber_id.clone(), scope).await?.ok_or_else(|| {
          Error::Store(
            format!("subscriber {subscriber_id} rejected as duplicate but not found").into(),
          )
        })?;
        Ok(Registration { subscriber, created: false })
      }
    }
  }

  pub async fn find(
    &self,
    subscriber_id: SubscriberId,
    scope: TenantScope,
  ) -> Result<Option<Subscriber>> {
    self
      .store
      .find_subscriber(subscriber_id, scope)
      .await
      .map_err(Error::store)
  }
}
