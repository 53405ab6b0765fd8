//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and UUIDs as hyphenated
//! lowercase strings, so every stored identifier decodes back to the exact
//! value that was written.

use chrono::{DateTime, Utc};
use herald_core::{
  subscriber::{Subscriber, SubscriberAssociation, SubscriberId},
  topic::Topic,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: impl Into<Uuid>) -> String {
  id.into().hyphenated().to_string()
}

pub fn decode_uuid<T: From<Uuid>>(s: &str) -> Result<T> {
  Ok(Uuid::parse_str(s)?.into())
}

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const TOPIC_COLUMNS: &str = "topic_id, topic_key, name, organization_id, \
                                 environment_id, user_id, created_at";

/// Raw strings read directly from a `topics` row.
pub struct RawTopic {
  pub topic_id:        String,
  pub key:             String,
  pub name:            String,
  pub organization_id: String,
  pub environment_id:  String,
  pub user_id:         String,
  pub created_at:      String,
}

impl RawTopic {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      topic_id:        row.get(0)?,
      key:             row.get(1)?,
      name:            row.get(2)?,
      organization_id: row.get(3)?,
      environment_id:  row.get(4)?,
      user_id:         row.get(5)?,
      created_at:      row.get(6)?,
    })
  }

  pub fn into_topic(self) -> Result<Topic> {
    Ok(Topic {
      topic_id:        decode_uuid(&self.topic_id)?,
      key:             self.key,
      name:            self.name,
      organization_id: decode_uuid(&self.organization_id)?,
      environment_id:  decode_uuid(&self.environment_id)?,
      user_id:         decode_uuid(&self.user_id)?,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

pub const SUBSCRIBER_COLUMNS: &str =
  "subscriber_record_id, subscriber_id, organization_id, environment_id, created_at";

/// Raw strings read directly from a `subscribers` row.
pub struct RawSubscriber {
  pub subscriber_record_id: String,
  pub subscriber_id:        String,
  pub organization_id:      String,
  pub environment_id:       String,
  pub created_at:           String,
}

impl RawSubscriber {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      subscriber_record_id: row.get(0)?,
      subscriber_id:        row.get(1)?,
      organization_id:      row.get(2)?,
      environment_id:       row.get(3)?,
      created_at:           row.get(4)?,
    })
  }

  pub fn into_subscriber(self) -> Result<Subscriber> {
    Ok(Subscriber {
      subscriber_record_id: decode_uuid(&self.subscriber_record_id)?,
      subscriber_id:        SubscriberId::new(self.subscriber_id),
      organization_id:      decode_uuid(&self.organization_id)?,
      environment_id:       decode_uuid(&self.environment_id)?,
      created_at:           decode_dt(&self.created_at)?,
    })
  }
}

pub const ASSOCIATION_COLUMNS: &str = "association_id, topic_id, subscriber_record_id, \
                                       subscriber_id, organization_id, environment_id, \
                                       created_at";

/// Raw strings read directly from a `topic_subscribers` row.
pub struct RawAssociation {
  pub association_id:       String,
  pub topic_id:             String,
  pub subscriber_record_id: String,
  pub subscriber_id:        String,
  pub organization_id:      String,
  pub environment_id:       String,
  pub created_at:           String,
}

impl RawAssociation {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      association_id:       row.get(0)?,
      topic_id:             row.get(1)?,
      subscriber_record_id: row.get(2)?,
      subscriber_id:        row.get(3)?,
      organization_id:      row.get(4)?,
      environment_id:       row.get(5)?,
      created_at:           row.get(6)?,
    })
  }

  pub fn into_association(self) -> Result<SubscriberAssociation> {
    Ok(SubscriberAssociation {
      association_id:       decode_uuid(&self.association_id)?,
      topic_id:             decode_uuid(&self.topic_id)?,
      subscriber_record_id: decode_uuid(&self.subscriber_record_id)?,
      subscriber_id:        SubscriberId::new(self.subscriber_id),
      organization_id:      decode_uuid(&self.organization_id)?,
      environment_id:       decode_uuid(&self.environment_id)?,
      created_at:           decode_dt(&self.created_at)?,
    })
  }
}
