//! Tenant-scope extractor.
//!
//! The scope is read from three headers set by whatever authenticated the
//! request upstream. This crate does not authenticate.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use herald_core::TenantScope;

use crate::error::ApiError;

pub const ORGANIZATION_HEADER: &str = "x-organization-id";
pub const ENVIRONMENT_HEADER: &str = "x-environment-id";
pub const USER_HEADER: &str = "x-user-id";

/// The [`TenantScope`] a request acts within.
#[derive(Debug, Clone, Copy)]
pub struct Scope(pub TenantScope);

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, ApiError> {
  headers
    .get(name)
    .and_then(|v| v.to_str().ok())
    .ok_or_else(|| ApiError::BadRequest(format!("missing {name} header")))
}

impl<St> FromRequestParts<St> for Scope
where
  St: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &St,
  ) -> Result<Self, Self::Rejection> {
    let scope = TenantScope::parse(
      header(&parts.headers, ORGANIZATION_HEADER)?,
      header(&parts.headers, ENVIRONMENT_HEADER)?,
      header(&parts.headers, USER_HEADER)?,
    )?;
    Ok(Scope(scope))
  }
}
