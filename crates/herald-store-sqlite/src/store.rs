//! [`SqliteStore`] — the SQLite implementation of [`TopicStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use herald_core::{
  id::{AssociationId, SubscriberRecordId, TopicId},
  scope::TenantScope,
  store::{Inserted, TopicStore},
  subscriber::{
    NewAssociation, NewSubscriber, Subscriber, SubscriberAssociation,
    SubscriberId,
  },
  topic::{NewTopic, Topic},
};

use crate::{
  Result,
  encode::{
    ASSOCIATION_COLUMNS, RawAssociation, RawSubscriber, RawTopic,
    SUBSCRIBER_COLUMNS, TOPIC_COLUMNS, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Herald topic store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of topic rows across all tenants.
  pub async fn count_topics(&self) -> Result<usize> {
    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM topics", [], |r| r.get(0))?))
      .await?;
    Ok(n as usize)
  }
}

// ─── TopicStore impl ─────────────────────────────────────────────────────────

impl TopicStore for SqliteStore {
  type Error = crate::Error;

  // ── Topics ────────────────────────────────────────────────────────────────

  async fn find_topic_by_key(
    &self,
    key: String,
    scope: TenantScope,
  ) -> Result<Option<Topic>> {
    let org_str  = encode_uuid(scope.organization_id);
    let env_str  = encode_uuid(scope.environment_id);
    let user_str = encode_uuid(scope.user_id);

    let raw: Option<RawTopic> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {TOPIC_COLUMNS} FROM topics
               WHERE topic_key = ?1
                 AND user_id = ?2
                 AND organization_id = ?3
                 AND environment_id = ?4"
            ),
            rusqlite::params![key, user_str, org_str, env_str],
            RawTopic::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawTopic::into_topic).transpose()
  }

  async fn get_topic(
    &self,
    topic_id: TopicId,
    scope: TenantScope,
  ) -> Result<Option<Topic>> {
    let id_str   = encode_uuid(topic_id);
    let org_str  = encode_uuid(scope.organization_id);
    let env_str  = encode_uuid(scope.environment_id);
    let user_str = encode_uuid(scope.user_id);

    let raw: Option<RawTopic> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {TOPIC_COLUMNS} FROM topics
               WHERE topic_id = ?1
                 AND user_id = ?2
                 AND organization_id = ?3
                 AND environment_id = ?4"
            ),
            rusqlite::params![id_str, user_str, org_str, env_str],
            RawTopic::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawTopic::into_topic).transpose()
  }

  async fn create_topic(&self, input: NewTopic) -> Result<Inserted<Topic>> {
    let topic = Topic {
      topic_id:        TopicId::generate(),
      key:             input.key,
      name:            input.name,
      organization_id: input.scope.organization_id,
      environment_id:  input.scope.environment_id,
      user_id:         input.scope.user_id,
      created_at:      Utc::now(),
    };

    let id_str   = encode_uuid(topic.topic_id);
    let key      = topic.key.clone();
    let name     = topic.name.clone();
    let org_str  = encode_uuid(topic.organization_id);
    let env_str  = encode_uuid(topic.environment_id);
    let user_str = encode_uuid(topic.user_id);
    let at_str   = encode_dt(topic.created_at);

    // The UNIQUE constraint settles concurrent creators: the loser inserts
    // nothing and is reported as a duplicate.
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO topics (
             topic_id, topic_key, name, organization_id, environment_id,
             user_id, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT (topic_key, organization_id, environment_id, user_id)
           DO NOTHING",
          rusqlite::params![id_str, key, name, org_str, env_str, user_str, at_str],
        )?)
      })
      .await?;

    Ok(if changed == 0 { Inserted::Duplicate } else { Inserted::Created(topic) })
  }

  // ── Subscribers ───────────────────────────────────────────────────────────

  async fn create_subscriber(
    &self,
    input: NewSubscriber,
  ) -> Result<Inserted<Subscriber>> {
    let subscriber = Subscriber {
      subscriber_record_id: SubscriberRecordId::generate(),
      subscriber_id:        input.subscriber_id,
      organization_id:      input.organization_id,
      environment_id:       input.environment_id,
      created_at:           Utc::now(),
    };

    let id_str  = encode_uuid(subscriber.subscriber_record_id);
    let ext_id  = subscriber.subscriber_id.as_str().to_owned();
    let org_str = encode_uuid(subscriber.organization_id);
    let env_str = encode_uuid(subscriber.environment_id);
    let at_str  = encode_dt(subscriber.created_at);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO subscribers (
             subscriber_record_id, subscriber_id, organization_id,
             environment_id, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (subscriber_id, organization_id, environment_id)
           DO NOTHING",
          rusqlite::params![id_str, ext_id, org_str, env_str, at_str],
        )?)
      })
      .await?;

    Ok(if changed == 0 { Inserted::Duplicate } else { Inserted::Created(subscriber) })
  }

  async fn find_subscriber(
    &self,
    subscriber_id: SubscriberId,
    scope: TenantScope,
  ) -> Result<Option<Subscriber>> {
    let ext_id  = subscriber_id.into_string();
    let org_str = encode_uuid(scope.organization_id);
    let env_str = encode_uuid(scope.environment_id);

    let raw: Option<RawSubscriber> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {SUBSCRIBER_COLUMNS} FROM subscribers
               WHERE subscriber_id = ?1
                 AND organization_id = ?2
                 AND environment_id = ?3"
            ),
            rusqlite::params![ext_id, org_str, env_str],
            RawSubscriber::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSubscriber::into_subscriber).transpose()
  }

  // ── Associations ──────────────────────────────────────────────────────────

  async fn find_association(
    &self,
    topic_id: TopicId,
    subscriber_record_id: SubscriberRecordId,
  ) -> Result<Option<SubscriberAssociation>> {
    let topic_str = encode_uuid(topic_id);
    let sub_str   = encode_uuid(subscriber_record_id);

    let raw: Option<RawAssociation> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {ASSOCIATION_COLUMNS} FROM topic_subscribers
               WHERE topic_id = ?1 AND subscriber_record_id = ?2"
            ),
            rusqlite::params![topic_str, sub_str],
            RawAssociation::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAssociation::into_association).transpose()
  }

  async fn create_association(
    &self,
    input: NewAssociation,
  ) -> Result<Inserted<SubscriberAssociation>> {
    let association = SubscriberAssociation {
      association_id:       AssociationId::generate(),
      topic_id:             input.topic_id,
      subscriber_record_id: input.subscriber_record_id,
      subscriber_id:        input.subscriber_id,
      organization_id:      input.organization_id,
      environment_id:       input.environment_id,
      created_at:           Utc::now(),
    };

    let id_str    = encode_uuid(association.association_id);
    let topic_str = encode_uuid(association.topic_id);
    let sub_str   = encode_uuid(association.subscriber_record_id);
    let ext_id    = association.subscriber_id.as_str().to_owned();
    let org_str   = encode_uuid(association.organization_id);
    let env_str   = encode_uuid(association.environment_id);
    let at_str    = encode_dt(association.created_at);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO topic_subscribers (
             association_id, topic_id, subscriber_record_id, subscriber_id,
             organization_id, environment_id, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT (topic_id, subscriber_record_id) DO NOTHING",
          rusqlite::params![
            id_str, topic_str, sub_str, ext_id, org_str, env_str, at_str,
          ],
        )?)
      })
      .await?;

    Ok(if changed == 0 { Inserted::Duplicate } else { Inserted::Created(association) })
  }

  async fn list_associations(
    &self,
    topic_id: TopicId,
  ) -> Result<Vec<SubscriberAssociation>> {
    let topic_str = encode_uuid(topic_id);

    let raws: Vec<RawAssociation> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ASSOCIATION_COLUMNS} FROM topic_subscribers
           WHERE topic_id = ?1
           ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![topic_str], RawAssociation::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAssociation::into_association).collect()
  }
}
