//! Integration tests for `SqliteStore` against an in-memory database.

use std::sync::Arc;

use herald_core::{
  Error as CoreError,
  id::{EnvironmentId, OrganizationId, SubscriberRecordId, TopicId, UserId},
  scope::TenantScope,
  service::{SubscriberAssociations, SubscriberDirectory, TopicCreator, TopicRegistry},
  store::{Inserted, TopicStore},
  subscriber::{NewAssociation, NewSubscriber, Subscriber, SubscriberId},
  topic::NewTopic,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn scope() -> TenantScope {
  TenantScope::new(
    OrganizationId::generate(),
    EnvironmentId::generate(),
    UserId::generate(),
  )
}

fn new_topic(key: &str, scope: TenantScope) -> NewTopic {
  NewTopic { key: key.into(), name: format!("{key} topic"), scope }
}

async fn subscriber(s: &SqliteStore, id: &str, scope: TenantScope) -> Subscriber {
  s.create_subscriber(NewSubscriber::in_scope(id.into(), scope))
    .await
    .unwrap()
    .created()
    .expect("fresh subscriber")
}

fn ids(raw: &[&str]) -> Vec<SubscriberId> {
  raw.iter().map(|s| SubscriberId::from(*s)).collect()
}

// ─── Topics ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_find_topic() {
  let s = store().await;
  let scope = scope();

  let topic = s
    .create_topic(new_topic("promo", scope))
    .await
    .unwrap()
    .created()
    .unwrap();

  let by_key = s.find_topic_by_key("promo".into(), scope).await.unwrap();
  assert_eq!(by_key.as_ref(), Some(&topic));

  let by_id = s.get_topic(topic.topic_id, scope).await.unwrap();
  assert_eq!(by_id, Some(topic));
}

#[tokio::test]
async fn find_topic_by_key_requires_full_scope() {
  let s = store().await;
  let scope = scope();
  s.create_topic(new_topic("promo", scope)).await.unwrap();

  let other_user = scope.with_user(UserId::generate());
  assert!(s.find_topic_by_key("promo".into(), other_user).await.unwrap().is_none());
  assert!(s.find_topic_by_key("other".into(), scope).await.unwrap().is_none());
}

#[tokio::test]
async fn get_topic_outside_owning_scope_returns_none() {
  let s = store().await;
  let scope = scope();
  let topic = s
    .create_topic(new_topic("promo", scope))
    .await
    .unwrap()
    .created()
    .unwrap();

  let elsewhere = TenantScope { organization_id: OrganizationId::generate(), ..scope };
  assert!(s.get_topic(topic.topic_id, elsewhere).await.unwrap().is_none());
  let other_user = scope.with_user(UserId::generate());
  assert!(s.get_topic(topic.topic_id, other_user).await.unwrap().is_none());
  assert!(s.get_topic(TopicId::generate(), scope).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_topic_insert_is_reported_not_raised() {
  let s = store().await;
  let scope = scope();

  s.create_topic(new_topic("promo", scope)).await.unwrap();
  let second = s.create_topic(new_topic("promo", scope)).await.unwrap();

  assert!(second.is_duplicate());
  assert_eq!(s.count_topics().await.unwrap(), 1);
}

#[tokio::test]
async fn same_key_different_user_both_insert() {
  let s = store().await;
  let first = scope();
  let second = first.with_user(UserId::generate());

  assert!(!s.create_topic(new_topic("promo", first)).await.unwrap().is_duplicate());
  assert!(!s.create_topic(new_topic("promo", second)).await.unwrap().is_duplicate());
  assert_eq!(s.count_topics().await.unwrap(), 2);
}

// ─── Subscribers ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn subscriber_unique_per_environment() {
  let s = store().await;
  let scope = scope();

  let created = subscriber(&s, "s1", scope).await;
  let again = s
    .create_subscriber(NewSubscriber::in_scope("s1".into(), scope))
    .await
    .unwrap();
  assert_eq!(again, Inserted::Duplicate);

  let found = s.find_subscriber("s1".into(), scope).await.unwrap();
  assert_eq!(found, Some(created));

  let elsewhere = TenantScope { environment_id: EnvironmentId::generate(), ..scope };
  assert!(s.find_subscriber("s1".into(), elsewhere).await.unwrap().is_none());
}

// ─── Associations ────────────────────────────────────────────────────────────

#[tokio::test]
async fn association_pair_is_unique() {
  let s = store().await;
  let scope = scope();
  let topic = s
    .create_topic(new_topic("promo", scope))
    .await
    .unwrap()
    .created()
    .unwrap();
  let sub = subscriber(&s, "s1", scope).await;

  let first = s
    .create_association(NewAssociation::new(topic.topic_id, &sub))
    .await
    .unwrap();
  let second = s
    .create_association(NewAssociation::new(topic.topic_id, &sub))
    .await
    .unwrap();

  assert!(!first.is_duplicate());
  assert!(second.is_duplicate());

  let found = s
    .find_association(topic.topic_id, sub.subscriber_record_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.subscriber_id.as_str(), "s1");
  assert!(
    s.find_association(topic.topic_id, SubscriberRecordId::generate())
      .await
      .unwrap()
      .is_none()
  );
  assert_eq!(s.list_associations(topic.topic_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn associations_list_in_insertion_order() {
  let s = store().await;
  let scope = scope();
  let topic = s
    .create_topic(new_topic("promo", scope))
    .await
    .unwrap()
    .created()
    .unwrap();

  for id in ["c", "a", "b"] {
    let sub = subscriber(&s, id, scope).await;
    s.create_association(NewAssociation::new(topic.topic_id, &sub))
      .await
      .unwrap();
  }

  let listed: Vec<_> = s
    .list_associations(topic.topic_id)
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.subscriber_id)
    .collect();
  assert_eq!(listed, ids(&["c", "a", "b"]));
}

#[tokio::test]
async fn association_with_unknown_topic_fails_foreign_key() {
  let s = store().await;
  let sub = subscriber(&s, "s1", scope()).await;

  let result = s
    .create_association(NewAssociation::new(TopicId::generate(), &sub))
    .await;
  assert!(matches!(result, Err(crate::Error::Database(_))));
}

// ─── Services over SQLite ────────────────────────────────────────────────────

#[tokio::test]
async fn concurrent_creates_yield_one_topic() {
  let store = Arc::new(store().await);
  let scope = scope();
  let a = TopicRegistry::new(store.clone());
  let b = TopicRegistry::new(store.clone());

  let (ra, rb) = tokio::join!(
    a.create("promo".into(), "A".into(), scope),
    b.create("promo".into(), "B".into(), scope),
  );

  let outcomes = [ra, rb];
  let ok = outcomes.iter().filter(|r| r.is_ok()).count();
  let conflicts = outcomes
    .iter()
    .filter(|r| matches!(r, Err(CoreError::Conflict { .. })))
    .count();
  assert_eq!((ok, conflicts), (1, 1));
  assert_eq!(store.count_topics().await.unwrap(), 1);
}

#[tokio::test]
async fn concurrent_creates_from_spawned_tasks() {
  let store = Arc::new(store().await);
  let scope = scope();

  let handles: Vec<_> = (0..8)
    .map(|i| {
      let registry = TopicRegistry::new(store.clone());
      tokio::spawn(async move {
        registry.create("promo".into(), format!("attempt {i}"), scope).await
      })
    })
    .collect();

  let mut ok = 0;
  for handle in handles {
    match handle.await.unwrap() {
      Ok(_) => ok += 1,
      Err(CoreError::Conflict { .. }) => {}
      Err(other) => panic!("unexpected error: {other}"),
    }
  }
  assert_eq!(ok, 1);
  assert_eq!(store.count_topics().await.unwrap(), 1);
}

#[tokio::test]
async fn concurrent_associations_yield_one_row() {
  let store = Arc::new(store().await);
  let scope = scope();
  subscriber(&store, "s1", scope).await;
  let topic_id = TopicRegistry::new(store.clone())
    .create("promo".into(), "Promotions".into(), scope)
    .await
    .unwrap()
    .topic_id;

  let handles: Vec<_> = (0..8)
    .map(|_| {
      let associations = SubscriberAssociations::new(store.clone());
      tokio::spawn(async move {
        associations
          .associate(topic_id, scope, ids(&["s1", "s1"]))
          .await
      })
    })
    .collect();

  let mut added = 0;
  for handle in handles {
    let outcome = handle.await.unwrap().unwrap();
    assert_eq!(outcome.subscribers, ids(&["s1"]));
    added += outcome.added.len();
  }
  assert_eq!(added, 1);
  assert_eq!(store.list_associations(topic_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn create_with_subscribers_end_to_end() {
  let store = Arc::new(store().await);
  let scope = scope();
  let directory = SubscriberDirectory::new(store.clone());
  for id in ["s1", "s2"] {
    directory.register(id.into(), scope).await.unwrap();
  }

  let associations = SubscriberAssociations::new(store.clone());
  let creator = TopicCreator::new(TopicRegistry::new(store.clone()), associations.clone());

  let created = creator
    .create_topic_with_subscribers(
      "promo".into(),
      "Promotions".into(),
      scope,
      ids(&["s1", "s1", "s2", "ghost"]),
    )
    .await
    .unwrap();
  assert_eq!(created.subscribers, Some(ids(&["s1", "s2"])));
  assert_eq!(created.not_found, Some(ids(&["ghost"])));

  let again = associations
    .associate(created.topic.topic_id, scope, ids(&["s2", "s1"]))
    .await
    .unwrap();
  assert_eq!(again.subscribers, ids(&["s1", "s2"]));

  let err = creator
    .create_topic_with_subscribers("promo".into(), "Again".into(), scope, ids(&["s1"]))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Conflict { .. }));

  let view = associations.list(created.topic.topic_id, scope).await.unwrap();
  assert_eq!(view.subscribers, ids(&["s1", "s2"]));
}
