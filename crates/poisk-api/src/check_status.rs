//! Handler for `POST /check-status` — the public status page backend.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use poisk_core::{case::PublicCaseView, store::CaseStore};

use crate::{AppState, error::ApiError, ok};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStatusBody {
  pub request_number: Option<String>,
}

/// `POST /check-status` — body: `{"requestNumber": …}`.
///
/// Anonymous by design; possession of the case number is the only gate,
/// and the response is the redacted public projection.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CheckStatusBody>,
) -> Result<Json<Value>, ApiError>
where
  S: CaseStore + Clone + Send + Sync + 'static,
{
  let raw = body
    .request_number
    .ok_or_else(|| ApiError::BadRequest("request number missing".to_string()))?;
  let id = Uuid::parse_str(&raw)
    .map_err(|_| ApiError::BadRequest(format!("malformed case id: {raw:?}")))?;

  let record = state
    .store
    .get_case(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("case not found: {id}")))?;

  Ok(ok(PublicCaseView::from(record)))
}
