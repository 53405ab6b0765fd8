//! JSON REST API for Herald.
//!
//! Exposes an axum [`Router`] backed by any
//! [`herald_core::store::TopicStore`]. Auth, TLS, and transport concerns are
//! the caller's responsibility; the tenant scope arrives in headers (see
//! [`scope`]).
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", herald_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod scope;
pub mod subscribers;
pub mod topics;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use herald_core::{
  service::{SubscriberAssociations, SubscriberDirectory, TopicCreator, TopicRegistry},
  store::TopicStore,
};

pub use error::ApiError;

/// The services every handler draws on, wired to one store.
pub struct ApiState<S> {
  pub registry:     TopicRegistry<S>,
  pub associations: SubscriberAssociations<S>,
  pub creator:      TopicCreator<S>,
  pub directory:    SubscriberDirectory<S>,
}

impl<S: TopicStore> ApiState<S> {
  pub fn new(store: Arc<S>) -> Self {
    let registry = TopicRegistry::new(store.clone());
    let associations = SubscriberAssociations::new(store.clone());
    Self {
      creator: TopicCreator::new(registry.clone(), associations.clone()),
      directory: SubscriberDirectory::new(store),
      registry,
      associations,
    }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: TopicStore + 'static,
{
  let state = Arc::new(ApiState::new(store));
  Router::new()
    // Topics
    .route("/topics", post(topics::create::<S>))
    .route("/topics/{id}", get(topics::get_one::<S>))
    .route("/topics/keys/{key}", get(topics::get_by_key::<S>))
    .route("/topics/{id}/subscribers", post(topics::add_subscribers::<S>))
    // Subscribers
    .route("/subscribers", post(subscribers::register::<S>))
    .with_state(state)
}
