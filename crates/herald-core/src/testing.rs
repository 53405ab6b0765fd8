//! In-memory [`TopicStore`] used by the service tests.
//!
//! Enforces the same uniqueness constraints as a real backend. Two switches
//! let tests reach the failure branches: `blind_lookups` hides existing topics
//! from `find_topic_by_key` and `blind_association_lookups` hides existing
//! associations from `find_association` (the lookup/insert races),
//! `fail_associations` makes association inserts fail and `fail_listing`
//! makes `list_associations` fail.

use std::sync::{
  Mutex,
  atomic::{AtomicBool, Ordering},
};

use chrono::Utc;

use crate::{
  id::{AssociationId, SubscriberRecordId, TopicId},
  scope::TenantScope,
  store::{Inserted, TopicStore},
  subscriber::{
    NewAssociation, NewSubscriber, Subscriber, SubscriberAssociation,
    SubscriberId,
  },
  topic::{NewTopic, Topic},
};

#[derive(Debug, thiserror::Error)]
#[error("memory store failure: {0}")]
pub struct MemoryError(&'static str);

#[derive(Default)]
struct Tables {
  topics:       Vec<Topic>,
  subscribers:  Vec<Subscriber>,
  associations: Vec<SubscriberAssociation>,
}

#[derive(Default)]
pub struct MemoryStore {
  tables:                    Mutex<Tables>,
  blind_lookups:             AtomicBool,
  blind_association_lookups: AtomicBool,
  fail_associations:         AtomicBool,
  fail_listing:              AtomicBool,
}

impl MemoryStore {
  pub fn blind_lookups(&self, on: bool) {
    self.blind_lookups.store(on, Ordering::SeqCst);
  }

  pub fn blind_association_lookups(&self, on: bool) {
    self.blind_association_lookups.store(on, Ordering::SeqCst);
  }

  pub fn fail_associations(&self, on: bool) {
    self.fail_associations.store(on, Ordering::SeqCst);
  }

  pub fn fail_listing(&self, on: bool) {
    self.fail_listing.store(on, Ordering::SeqCst);
  }

  pub fn topic_count(&self) -> usize { self.tables.lock().unwrap().topics.len() }

  pub fn association_count(&self) -> usize {
    self.tables.lock().unwrap().associations.len()
  }

  /// Register subscribers directly, bypassing the services.
  pub fn seed_subscribers(&self, scope: TenantScope, ids: &[&str]) {
    let mut tables = self.tables.lock().unwrap();
    for id in ids {
      tables.subscribers.push(Subscriber {
        subscriber_record_id: SubscriberRecordId::generate(),
        subscriber_id:        SubscriberId::from(*id),
        organization_id:      scope.organization_id,
        environment_id:       scope.environment_id,
        created_at:           Utc::now(),
      });
    }
  }
}

impl TopicStore for MemoryStore {
  type Error = MemoryError;

  async fn find_topic_by_key(
    &self,
    key: String,
    scope: TenantScope,
  ) -> Result<Option<Topic>, MemoryError> {
    if self.blind_lookups.load(Ordering::SeqCst) {
      return Ok(None);
    }
    let tables = self.tables.lock().unwrap();
    Ok(
      tables
        .topics
        .iter()
        .find(|t| t.key == key && t.scope() == scope)
        .cloned(),
    )
  }

  async fn get_topic(
    &self,
    topic_id: TopicId,
    scope: TenantScope,
  ) -> Result<Option<Topic>, MemoryError> {
    let tables = self.tables.lock().unwrap();
    Ok(
      tables
        .topics
        .iter()
        .find(|t| t.topic_id == topic_id && t.scope() == scope)
        .cloned(),
    )
  }

  async fn create_topic(
    &self,
    input: NewTopic,
  ) -> Result<Inserted<Topic>, MemoryError> {
    let mut tables = self.tables.lock().unwrap();
    if tables
      .topics
      .iter()
      .any(|t| t.key == input.key && t.scope() == input.scope)
    {
      return Ok(Inserted::Duplicate);
    }
    let topic = Topic {
      topic_id:        TopicId::generate(),
      key:             input.key,
      name:            input.name,
      organization_id: input.scope.organization_id,
      environment_id:  input.scope.environment_id,
      user_id:         input.scope.user_id,
      created_at:      Utc::now(),
    };
    tables.topics.push(topic.clone());
    Ok(Inserted::Created(topic))
  }

  async fn create_subscriber(
    &self,
    input: NewSubscriber,
  ) -> Result<Inserted<Subscriber>, MemoryError> {
    let mut tables = self.tables.lock().unwrap();
    if tables.subscribers.iter().any(|s| {
      s.subscriber_id == input.subscriber_id
        && s.organization_id == input.organization_id
        && s.environment_id == input.environment_id
    }) {
      return Ok(Inserted::Duplicate);
    }
    let subscriber = Subscriber {
      subscriber_record_id: SubscriberRecordId::generate(),
      subscriber_id:        input.subscriber_id,
      organization_id:      input.organization_id,
      environment_id:       input.environment_id,
      created_at:           Utc::now(),
    };
    tables.subscribers.push(subscriber.clone());
    Ok(Inserted::Created(subscriber))
  }

  async fn find_subscriber(
    &self,
    subscriber_id: SubscriberId,
    scope: TenantScope,
  ) -> Result<Option<Subscriber>, MemoryError> {
    let tables = self.tables.lock().unwrap();
    Ok(
      tables
        .subscribers
        .iter()
        .find(|s| {
          s.subscriber_id == subscriber_id
            && scope.covers(s.organization_id, s.environment_id)
        })
        .cloned(),
    )
  }

  async fn find_association(
    &self,
    topic_id: TopicId,
    subscriber_record_id: SubscriberRecordId,
  ) -> Result<Option<SubscriberAssociation>, MemoryError> {
    if self.blind_association_lookups.load(Ordering::SeqCst) {
      return Ok(None);
    }
    let tables = self.tables.lock().unwrap();
    Ok(
      tables
        .associations
        .iter()
        .find(|a| {
          a.topic_id == topic_id
            && a.subscriber_record_id == subscriber_record_id
        })
        .cloned(),
    )
  }

  async fn create_association(
    &self,
    input: NewAssociation,
  ) -> Result<Inserted<SubscriberAssociation>, MemoryError> {
    if self.fail_associations.load(Ordering::SeqCst) {
      return Err(MemoryError("association insert rejected"));
    }
    let mut tables = self.tables.lock().unwrap();
    if tables.associations.iter().any(|a| {
      a.topic_id == input.topic_id
        && a.subscriber_record_id == input.subscriber_record_id
    }) {
      return Ok(Inserted::Duplicate);
    }
    let association = SubscriberAssociation {
      association_id:       AssociationId::generate(),
      topic_id:             input.topic_id,
      subscriber_record_id: input.subscriber_record_id,
      subscriber_id:        input.subscriber_id,
      organization_id:      input.organization_id,
      environment_id:       input.environment_id,
      created_at:           Utc::now(),
    };
    tables.associations.push(association.clone());
    Ok(Inserted::Created(association))
  }

  async fn list_associations(
    &self,
    topic_id: TopicId,
  ) -> Result<Vec<SubscriberAssociation>, MemoryError> {
    if self.fail_listing.load(Ordering::SeqCst) {
      return Err(MemoryError("association listing rejected"));
    }
    let tables = self.tables.lock().unwrap();
    Ok(
      tables
        .associations
        .iter()
        .filter(|a| a.topic_id == topic_id)
        .cloned()
        .collect(),
    )
  }
}
