//! Typed identifiers.
//!
//! Every identifier is a [`Uuid`] in storage and a lowercase hyphenated
//! string at the service boundary. [`FromStr`] and [`fmt::Display`] are the
//! conversion pair: for every id, `id.to_string().parse() == Ok(id)`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

macro_rules! uuid_id {
  ($(#[$meta:meta])* $name:ident, $kind:literal) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
      Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(Uuid);

    impl $name {
      /// A fresh random identifier.
      pub fn generate() -> Self { Self(Uuid::new_v4()) }

      pub const fn from_uuid(id: Uuid) -> Self { Self(id) }

      pub const fn as_uuid(&self) -> Uuid { self.0 }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
      }
    }

    impl FromStr for $name {
      type Err = Error;

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self).map_err(|e| Error::InvalidId {
          kind:   $kind,
          reason: e.to_string(),
        })
      }
    }

    impl From<Uuid> for $name {
      fn from(id: Uuid) -> Self { Self(id) }
    }

    impl From<$name> for Uuid {
      fn from(id: $name) -> Self { id.0 }
    }
  };
}

uuid_id!(
  /// Identifier of a topic, assigned by the store at creation.
  TopicId,
  "topic id"
);
uuid_id!(OrganizationId, "organization id");
uuid_id!(EnvironmentId, "environment id");
uuid_id!(UserId, "user id");
uuid_id!(
  /// Internal identifier of a subscriber row. Never exposed to callers, who
  /// address subscribers by their [`SubscriberId`](crate::subscriber::SubscriberId).
  SubscriberRecordId,
  "subscriber record id"
);
uuid_id!(AssociationId, "association id");
