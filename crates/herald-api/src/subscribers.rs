//! Handler for `POST /subscribers` — register a subscriber in the caller's
//! organization and environment. 201 when new, 200 when already registered.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use herald_core::{store::TopicStore, subscriber::SubscriberId};
use serde::Deserialize;

use crate::{ApiState, error::ApiError, scope::Scope, topics::require_subscriber_ids};

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub subscriber_id: SubscriberId,
}

/// `POST /subscribers` — body: `{"subscriber_id":"..."}`
pub async fn register<S>(
  State(state): State<Arc<ApiState<S>>>,
  Scope(scope): Scope,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TopicStore + 'static,
{
  require_subscriber_ids(std::slice::from_ref(&body.subscriber_id))?;

  let registration = state.directory.register(body.subscriber_id, scope).await?;
  let status = if registration.created { StatusCode::CREATED } else { StatusCode::OK };
  Ok((status, Json(registration)))
}
