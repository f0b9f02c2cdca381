//! Bearer-token extractors.
//!
//! `Admin` rejects with 401 unless the request carries a valid token;
//! `MaybeAdmin` never rejects and is used by the endpoints whose behaviour
//! differs between anonymous applicants and authenticated reviewers.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use poisk_auth::{AuthGate, Claims};
use poisk_core::store::CaseStore;

use crate::{AppState, error::ApiError};

/// Pull the token out of an `Authorization: Bearer …` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
}

fn verify(headers: &HeaderMap, gate: &AuthGate) -> Result<Claims, ApiError> {
  let token = bearer_token(headers).ok_or(ApiError::Unauthorized)?;
  gate.verify(token).map_err(|e| {
    tracing::warn!(error = %e, "token verification failed");
    ApiError::Unauthorized
  })
}

/// Present in a handler's arguments means the request was authenticated.
pub struct Admin(pub Claims);

impl<S> FromRequestParts<AppState<S>> for Admin
where
  S: CaseStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify(&parts.headers, &state.auth).map(Admin)
  }
}

/// `Some(claims)` when a valid token was presented, `None` otherwise.
/// An invalid token is still a hard 401 — silently downgrading a reviewer
/// to anonymous would mask expired sessions.
pub struct MaybeAdmin(pub Option<Claims>);

impl<S> FromRequestParts<AppState<S>> for MaybeAdmin
where
  S: CaseStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    if bearer_token(&parts.headers).is_none() {
      return Ok(MaybeAdmin(None));
    }
    verify(&parts.headers, &state.auth).map(|c| MaybeAdmin(Some(c)))
  }
}
