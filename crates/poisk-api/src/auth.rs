//! Handler for `POST /auth` — credential exchange.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use poisk_core::store::CaseStore;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub username: String,
  pub password: String,
}

/// `POST /auth` — body: `{"username": …, "password": …}`.
///
/// Returns `{"success": true, "token": …}` or a uniform 401; unknown
/// usernames and wrong passwords are indistinguishable from outside.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<Value>, ApiError>
where
  S: CaseStore + Clone + Send + Sync + 'static,
{
  let token = state.auth.login(&body.username, &body.password).map_err(|e| {
    tracing::warn!(username = %body.username, error = %e, "login rejected");
    ApiError::Unauthorized
  })?;

  tracing::info!(username = %body.username, "admin logged in");
  Ok(Json(json!({ "success": true, "token": token })))
}
