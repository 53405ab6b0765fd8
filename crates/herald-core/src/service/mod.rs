//! Topic services, generic over any [`TopicStore`](crate::store::TopicStore).
//!
//! Each service receives its dependencies at construction; the
//! [`TopicCreator`] orchestrator is built from a [`TopicRegistry`] and a
//! [`SubscriberAssociations`] rather than from the store directly.

mod association;
mod directory;
mod orchestrator;
mod registry;

pub use association::{AssociationOutcome, SubscriberAssociations};
pub use directory::{Registration, SubscriberDirectory};
pub use orchestrator::{TopicCreation, TopicCreator};
pub use registry::TopicRegistry;
