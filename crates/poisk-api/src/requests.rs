//! Handlers for the `/requests` endpoints.
//!
//! | Method   | Path             | Caller     | Result |
//! |----------|------------------|------------|--------|
//! | `GET`    | `/requests`      | admin      | all records |
//! | `GET`    | `/requests?id=`  | anonymous  | public projection |
//! | `GET`    | `/requests?id=`  | admin      | full record |
//! | `POST`   | `/requests`      | anonymous  | 201 + stored record |
//! | `PUT`    | `/requests`      | both       | partial merge; review fields need a token |
//! | `DELETE` | `/requests?id=`  | admin      | permanent removal |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use poisk_core::{
  case::{CaseRecord, PublicCaseView},
  draft::CaseDraft,
  patch::CasePatch,
  store::CaseStore,
};

use crate::{
  AppState, ok,
  error::ApiError,
  extract::{Admin, MaybeAdmin},
};

#[derive(Debug, Deserialize)]
pub struct IdParam {
  pub id: Option<String>,
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw)
    .map_err(|_| ApiError::BadRequest(format!("malformed case id: {raw:?}")))
}

async fn fetch<S>(state: &AppState<S>, id: Uuid) -> Result<CaseRecord, ApiError>
where
  S: CaseStore,
{
  state
    .store
    .get_case(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("case not found: {id}")))
}

// ─── Get / list ───────────────────────────────────────────────────────────────

/// `GET /requests[?id=<id>]`
///
/// With `id`: the full record for authenticated reviewers, the redacted
/// public projection for anyone else. Without `id`: the full directory,
/// reviewers only.
pub async fn get<S>(
  State(state): State<AppState<S>>,
  caller: MaybeAdmin,
  Query(params): Query<IdParam>,
) -> Result<Response, ApiError>
where
  S: CaseStore + Clone + Send + Sync + 'static,
{
  match params.id {
    Some(raw) => {
      let record = fetch(&state, parse_id(&raw)?).await?;
      match caller.0 {
        Some(_) => Ok(ok(record).into_response()),
        None => Ok(ok(PublicCaseView::from(record)).into_response()),
      }
    }
    None => {
      if caller.0.is_none() {
        return Err(ApiError::Unauthorized);
      }
      let all = state
        .store
        .list_cases()
        .await
        .map_err(ApiError::from_store)?;
      Ok(ok(all).into_response())
    }
  }
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /requests` — the public submission endpoint.
///
/// Validates the draft, persists it with a fresh id and the initial
/// status, and returns the stored record so the applicant can keep the id.
/// Deliberately not idempotent: a retry after a failed response creates a
/// second record.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(draft): Json<CaseDraft>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CaseStore + Clone + Send + Sync + 'static,
{
  draft.validate()?;

  let record = state
    .store
    .create_case(draft)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(case_id = %record.id, "case submitted");
  Ok((StatusCode::CREATED, ok(record)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub id: Option<String>,
  #[serde(flatten)]
  pub patch: CasePatch,
}

/// `PUT /requests` — body: `{"id": …, …fields}`.
///
/// Partial merge: provided keys overwrite, omitted keys keep their stored
/// value. Reviewers may touch anything and get the full record back; the
/// applicant's token-less self-verify pass may not set `status` or
/// `adminComment`, and sees only the public projection in the response —
/// same redaction as anonymous GET.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  caller: MaybeAdmin,
  Json(body): Json<UpdateBody>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: CaseStore + Clone + Send + Sync + 'static,
{
  let raw = body
    .id
    .ok_or_else(|| ApiError::BadRequest("case id missing".to_string()))?;
  let id = parse_id(&raw)?;

  if caller.0.is_none() && body.patch.touches_review_fields() {
    tracing::warn!(case_id = %id, "anonymous update touched review fields");
    return Err(ApiError::Unauthorized);
  }

  let updated = state
    .store
    .update_case(id, body.patch)
    .await
    .map_err(ApiError::from_store)?;

  match caller.0 {
    Some(_) => Ok(ok(updated)),
    None => Ok(ok(PublicCaseView::from(updated))),
  }
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /requests?id=<id>` — reviewers only. Permanent; no undo.
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Admin(claims): Admin,
  Query(params): Query<IdParam>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: CaseStore + Clone + Send + Sync + 'static,
{
  let raw = params
    .id
    .ok_or_else(|| ApiError::BadRequest("case id missing".to_string()))?;
  let id = parse_id(&raw)?;

  state
    .store
    .delete_case(id)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(case_id = %id, admin = %claims.sub, "case deleted");
  Ok(Json(json!({ "success": true, "message": "case deleted" })))
}
