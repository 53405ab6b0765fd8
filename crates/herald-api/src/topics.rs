//! Handlers for `/topics` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/topics` | Body: [`CreateTopicBody`]; 201 + [`TopicCreation`], 409 on a taken key |
//! | `GET`  | `/topics/:id` | Topic with its subscribers; 404 if not found |
//! | `GET`  | `/topics/keys/:key` | Same, looked up by key in the caller's scope |
//! | `POST` | `/topics/:id/subscribers` | Body: [`AddSubscribersBody`]; idempotent |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use herald_core::{
  id::TopicId,
  service::{AssociationOutcome, TopicCreation},
  store::TopicStore,
  subscriber::SubscriberId,
  topic::TopicWithSubscribers,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError, scope::Scope};

// ─── Validation ──────────────────────────────────────────────────────────────

fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
  if value.trim().is_empty() {
    return Err(ApiError::BadRequest(format!("{field} must not be empty")));
  }
  Ok(())
}

pub(crate) fn require_subscriber_ids(ids: &[SubscriberId]) -> Result<(), ApiError> {
  if ids.iter().any(SubscriberId::is_empty) {
    return Err(ApiError::BadRequest(
      "subscriber identifiers must not be empty".into(),
    ));
  }
  if ids.iter().any(|id| id.as_str().trim() != id.as_str()) {
    return Err(ApiError::BadRequest(
      "subscriber identifiers must not have surrounding whitespace".into(),
    ));
  }
  Ok(())
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /topics`. `subscribers` is required but may be
/// empty.
#[derive(Debug, Deserialize)]
pub struct CreateTopicBody {
  pub key:         String,
  pub name:        String,
  pub subscribers: Vec<SubscriberId>,
}

/// `POST /topics` — returns 201 + the [`TopicCreation`].
///
/// When the topic was created but association failed, the response is still
/// 201 with `subscribers_associated: false`.
pub async fn create<S>(
  State(state): State<Arc<ApiState<S>>>,
  Scope(scope): Scope,
  Json(body): Json<CreateTopicBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TopicStore + 'static,
{
  require_text("key", &body.key)?;
  require_text("name", &body.name)?;
  require_subscriber_ids(&body.subscribers)?;

  let created: TopicCreation = state
    .creator
    .create_topic_with_subscribers(body.key, body.name, scope, body.subscribers)
    .await?;
  Ok((StatusCode::CREATED, Json(created)))
}

// ─── Get ─────────────────────────────────────────────────────────────────────

/// `GET /topics/:id`
pub async fn get_one<S>(
  State(state): State<Arc<ApiState<S>>>,
  Scope(scope): Scope,
  Path(id): Path<String>,
) -> Result<Json<TopicWithSubscribers>, ApiError>
where
  S: TopicStore + 'static,
{
  let topic_id: TopicId = id.parse()?;
  let view = state.associations.list(topic_id, scope).await?;
  Ok(Json(view))
}

/// `GET /topics/keys/:key`
pub async fn get_by_key<S>(
  State(state): State<Arc<ApiState<S>>>,
  Scope(scope): Scope,
  Path(key): Path<String>,
) -> Result<Json<TopicWithSubscribers>, ApiError>
where
  S: TopicStore + 'static,
{
  let topic = state.registry.find_by_key(key, scope).await?;
  let view = state.associations.with_subscribers(topic).await?;
  Ok(Json(view))
}

// ─── Add subscribers ─────────────────────────────────────────────────────────

/// JSON body accepted by `POST /topics/:id/subscribers`.
#[derive(Debug, Deserialize)]
pub struct AddSubscribersBody {
  /// Subscriber identifiers to associate with the topic.
  pub subscribers: Vec<SubscriberId>,
}

/// `POST /topics/:id/subscribers`
pub async fn add_subscribers<S>(
  State(state): State<Arc<ApiState<S>>>,
  Scope(scope): Scope,
  Path(id): Path<String>,
  Json(body): Json<AddSubscribersBody>,
) -> Result<Json<AssociationOutcome>, ApiError>
where
  S: TopicStore + 'static,
{
  let topic_id: TopicId = id.parse()?;
  require_subscriber_ids(&body.subscribers)?;

  let outcome = state
    .associations
    .associate(topic_id, scope, body.subscribers)
    .await?;
  Ok(Json(outcome))
}
