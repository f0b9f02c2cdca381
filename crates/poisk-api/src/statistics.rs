//! Handler for `GET /statistics` — the on-demand aggregation report.

use axum::{Json, extract::State};
use serde_json::Value;

use poisk_core::store::CaseStore;

use crate::{AppState, error::ApiError, extract::Admin, ok};

/// `GET /statistics` — reviewers only.
///
/// Recomputed from the store on every call; there is no cache to go stale.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Admin(_): Admin,
) -> Result<Json<Value>, ApiError>
where
  S: CaseStore + Clone + Send + Sync + 'static,
{
  let stats = state
    .store
    .statistics()
    .await
    .map_err(ApiError::from_store)?;
  Ok(ok(stats))
}
