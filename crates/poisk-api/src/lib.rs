//! JSON REST API for Poisk.
//!
//! Exposes an axum [`Router`] backed by any [`poisk_core::store::CaseStore`]
//! plus a [`poisk_auth::AuthGate`]. Endpoint behaviour follows the public
//! intake / admin review split: submission and status lookup are anonymous,
//! everything else wants a bearer token.

pub mod auth;
pub mod check_status;
pub mod error;
pub mod extract;
pub mod requests;
pub mod statistics;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json, Router,
  routing::{get, post},
};
use poisk_auth::AuthGate;
use poisk_core::store::CaseStore;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// One administrator roster entry as configured.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminEntry {
  pub username:      String,
  /// argon2 PHC string; generate with `server --hash-password`.
  pub password_hash: String,
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `POISK_`-prefixed environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// HS256 signing secret. Startup fails without it.
  pub jwt_secret: String,
  pub admins:     Vec<AdminEntry>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: CaseStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthGate>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the Poisk API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CaseStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/auth", post(auth::login::<S>))
    .route(
      "/requests",
      get(requests::get::<S>)
        .post(requests::create::<S>)
        .put(requests::update::<S>)
        .delete(requests::delete_one::<S>),
    )
    .route("/statistics", get(statistics::handler::<S>))
    .route("/check-status", post(check_status::handler::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// The success envelope every data-bearing endpoint answers with.
pub(crate) fn ok<T: Serialize>(data: T) -> Json<Value> {
  Json(json!({ "success": true, "data": data }))
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use poisk_auth::{AdminCredential, FixedRoster};
  use poisk_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use tower::ServiceExt as _;

  const SECRET: &str = "test-secret";

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let salt  = SaltString::generate(&mut OsRng);
    let hash  = Argon2::default()
      .hash_password(b"admin123", &salt)
      .unwrap()
      .to_string();

    let roster = FixedRoster::new(vec![AdminCredential {
      username:      "admin1".into(),
      password_hash: hash,
    }]);

    AppState {
      store: Arc::new(store),
      auth:  Arc::new(AuthGate::new(roster, SECRET)),
    }
  }

  async fn oneshot_json(
    state: AppState<SqliteStore>,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn login(state: &AppState<SqliteStore>) -> String {
    let (status, body) = oneshot_json(
      state.clone(),
      "POST",
      "/auth",
      None,
      Some(json!({ "username": "admin1", "password": "admin123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
  }

  fn bek_payload() -> Value {
    json!({
      "lastName": "Bek",
      "firstName": "Arman",
      "birthPlaceCity": "Almaty",
      "searcherFullName": "Aigerim Bek",
      "phoneNumber": "+77011234567",
      "email": "a@b.kz",
      "heardAboutUs": "friends",
      "applicationRegion": "Almaty Region",
      "applicationCountry": "Kazakhstan",
    })
  }

  async fn submit(state: &AppState<SqliteStore>, payload: Value) -> Value {
    let (status, body) =
      oneshot_json(state.clone(), "POST", "/requests", None, Some(payload))
        .await;
    assert_eq!(status, StatusCode::CREATED, "submit failed: {body}");
    body["data"].clone()
  }

  // ── Auth ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn login_returns_a_verifiable_token() {
    let state = make_state().await;
    let token = login(&state).await;
    assert!(state.auth.verify(&token).is_ok());
  }

  #[tokio::test]
  async fn unknown_user_and_wrong_password_get_the_same_response() {
    let state = make_state().await;

    let (s1, b1) = oneshot_json(
      state.clone(),
      "POST",
      "/auth",
      None,
      Some(json!({ "username": "nobody", "password": "admin123" })),
    )
    .await;
    let (s2, b2) = oneshot_json(
      state,
      "POST",
      "/auth",
      None,
      Some(json!({ "username": "admin1", "password": "wrong" })),
    )
    .await;

    assert_eq!(s1, StatusCode::UNAUTHORIZED);
    assert_eq!(s2, StatusCode::UNAUTHORIZED);
    assert_eq!(b1, b2);
  }

  #[tokio::test]
  async fn expired_token_is_rejected_on_admin_routes() {
    let state = make_state().await;
    let salt  = SaltString::generate(&mut OsRng);
    let hash  = Argon2::default()
      .hash_password(b"admin123", &salt)
      .unwrap()
      .to_string();
    let expired_state = AppState {
      store: state.store.clone(),
      auth:  Arc::new(
        AuthGate::new(
          FixedRoster::new(vec![AdminCredential {
            username:      "admin1".into(),
            password_hash: hash,
          }]),
          SECRET,
        )
        .with_token_ttl(-10),
      ),
    };

    let (status, body) = oneshot_json(
      expired_state.clone(),
      "POST",
      "/auth",
      None,
      Some(json!({ "username": "admin1", "password": "admin123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let stale = body["token"].as_str().unwrap().to_string();

    let (status, _) = oneshot_json(
      expired_state,
      "GET",
      "/requests",
      Some(&stale),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  // ── Submission ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn submit_assigns_id_and_initial_status() {
    let state = make_state().await;
    let data = submit(&state, bek_payload()).await;

    assert_eq!(data["status"], "received");
    assert_eq!(data["adminComment"], "");
    assert!(!data["id"].as_str().unwrap().is_empty());
  }

  #[tokio::test]
  async fn submit_twice_creates_two_records() {
    let state = make_state().await;
    let first  = submit(&state, bek_payload()).await;
    let second = submit(&state, bek_payload()).await;
    assert_ne!(first["id"], second["id"]);
  }

  #[tokio::test]
  async fn submit_missing_required_field_is_400() {
    // "Missing" means both an empty value and an absent key; each gets
    // the envelope naming the field, never a bare deserialization error.
    let state = make_state().await;

    let mut empty = bek_payload();
    empty["lastName"] = json!("");

    let mut absent = bek_payload();
    absent.as_object_mut().unwrap().remove("lastName");

    for payload in [empty, absent] {
      let (status, body) =
        oneshot_json(state.clone(), "POST", "/requests", None, Some(payload))
          .await;
      assert_eq!(status, StatusCode::BAD_REQUEST);
      assert_eq!(body["success"], false);
      assert!(body["message"].as_str().unwrap().contains("lastName"));
    }
  }

  #[tokio::test]
  async fn submit_malformed_email_is_400() {
    let state = make_state().await;
    let mut payload = bek_payload();
    payload["email"] = json!("not-an-email");

    let (status, _) =
      oneshot_json(state, "POST", "/requests", None, Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  // ── Lookup ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn admin_lookup_round_trips_submitted_fields() {
    let state = make_state().await;
    let token = login(&state).await;
    let created = submit(&state, bek_payload()).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = oneshot_json(
      state,
      "GET",
      &format!("/requests?id={id}"),
      Some(&token),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["lastName"], "Bek");
    assert_eq!(data["firstName"], "Arman");
    assert_eq!(data["birthPlaceCity"], "Almaty");
    assert_eq!(data["searcherFullName"], "Aigerim Bek");
    assert_eq!(data["phoneNumber"], "+77011234567");
    assert_eq!(data["email"], "a@b.kz");
    assert_eq!(data["heardAboutUs"], "friends");
  }

  #[tokio::test]
  async fn anonymous_lookup_is_redacted() {
    let state = make_state().await;
    let created = submit(&state, bek_payload()).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = oneshot_json(
      state,
      "GET",
      &format!("/requests?id={id}"),
      None,
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["lastName"], "Bek");
    assert_eq!(data["status"], "received");
    assert!(data.get("phoneNumber").is_none());
    assert!(data.get("email").is_none());
    assert!(data.get("searcherFullName").is_none());
    // The reviewer's comment stays visible to the applicant.
    assert!(data.get("adminComment").is_some());
  }

  #[tokio::test]
  async fn lookup_unknown_id_is_404() {
    let state = make_state().await;
    let (status, _) = oneshot_json(
      state,
      "GET",
      &format!("/requests?id={}", uuid::Uuid::new_v4()),
      None,
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn lookup_malformed_id_is_400() {
    let state = make_state().await;
    let (status, _) =
      oneshot_json(state, "GET", "/requests?id=not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn listing_without_token_is_401() {
    let state = make_state().await;
    let (status, _) = oneshot_json(state, "GET", "/requests", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn listing_with_token_returns_all_records() {
    let state = make_state().await;
    let token = login(&state).await;
    submit(&state, bek_payload()).await;
    submit(&state, bek_payload()).await;

    let (status, body) =
      oneshot_json(state, "GET", "/requests", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
  }

  // ── Update ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn status_only_update_preserves_other_fields() {
    let state = make_state().await;
    let token = login(&state).await;
    let created = submit(&state, bek_payload()).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = oneshot_json(
      state,
      "PUT",
      "/requests",
      Some(&token),
      Some(json!({ "id": id, "status": "found" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["status"], "found");
    assert_eq!(data["phoneNumber"], "+77011234567");
    assert_eq!(data["lastName"], "Bek");
    assert_eq!(data["createdAt"], created["createdAt"]);
  }

  #[tokio::test]
  async fn anonymous_self_verify_may_fix_ordinary_fields() {
    let state = make_state().await;
    let created = submit(&state, bek_payload()).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = oneshot_json(
      state,
      "PUT",
      "/requests",
      None,
      Some(json!({ "id": id, "middleName": "Serikuly" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["middleName"], "Serikuly");
    assert_eq!(body["data"]["status"], "received");
  }

  #[tokio::test]
  async fn anonymous_update_response_is_redacted() {
    // An empty patch is a valid no-op update; without a token it must not
    // become a way to read back the contact block that anonymous GET hides.
    let state = make_state().await;
    let created = submit(&state, bek_payload()).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = oneshot_json(
      state,
      "PUT",
      "/requests",
      None,
      Some(json!({ "id": id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert!(data.get("phoneNumber").is_none());
    assert!(data.get("email").is_none());
    assert!(data.get("searcherFullName").is_none());
    assert!(data.get("homeAddress").is_none());
    assert_eq!(data["lastName"], "Bek");
    assert_eq!(data["status"], "received");
  }

  #[tokio::test]
  async fn anonymous_update_touching_review_fields_is_401() {
    let state = make_state().await;
    let created = submit(&state, bek_payload()).await;
    let id = created["id"].as_str().unwrap();

    for patch in [
      json!({ "id": id, "status": "found" }),
      json!({ "id": id, "adminComment": "self-promotion" }),
    ] {
      let (status, _) =
        oneshot_json(state.clone(), "PUT", "/requests", None, Some(patch))
          .await;
      assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    // And the record is untouched.
    let (_, body) = oneshot_json(
      state,
      "GET",
      &format!("/requests?id={id}"),
      None,
      None,
    )
    .await;
    assert_eq!(body["data"]["status"], "received");
    assert_eq!(body["data"]["adminComment"], "");
  }

  #[tokio::test]
  async fn update_without_id_is_400() {
    let state = make_state().await;
    let token = login(&state).await;
    let (status, _) = oneshot_json(
      state,
      "PUT",
      "/requests",
      Some(&token),
      Some(json!({ "status": "found" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn update_unknown_id_is_404() {
    let state = make_state().await;
    let token = login(&state).await;
    let (status, _) = oneshot_json(
      state,
      "PUT",
      "/requests",
      Some(&token),
      Some(json!({ "id": uuid::Uuid::new_v4().to_string(), "status": "found" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Delete ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_requires_a_token() {
    let state = make_state().await;
    let created = submit(&state, bek_payload()).await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = oneshot_json(
      state,
      "DELETE",
      &format!("/requests?id={id}"),
      None,
      None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn delete_then_lookup_is_404() {
    let state = make_state().await;
    let token = login(&state).await;
    let created = submit(&state, bek_payload()).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = oneshot_json(
      state.clone(),
      "DELETE",
      &format!("/requests?id={id}"),
      Some(&token),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = oneshot_json(
      state,
      "GET",
      &format!("/requests?id={id}"),
      Some(&token),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_unknown_id_is_404() {
    let state = make_state().await;
    let token = login(&state).await;
    let (status, _) = oneshot_json(
      state,
      "DELETE",
      &format!("/requests?id={}", uuid::Uuid::new_v4()),
      Some(&token),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Statistics ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn statistics_requires_a_token() {
    let state = make_state().await;
    let (status, _) = oneshot_json(state, "GET", "/statistics", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn statistics_reports_totals_and_buckets() {
    let state = make_state().await;
    let token = login(&state).await;

    let in_region = |region: &str| {
      let mut payload = bek_payload();
      payload["applicationRegion"] = json!(region);
      payload
    };
    let a1 = submit(&state, in_region("A")).await;
    let a2 = submit(&state, in_region("A")).await;
    let b  = submit(&state, in_region("B")).await;

    for (record, status) in
      [(&a1, "found"), (&a2, "searching"), (&b, "found")]
    {
      let id = record["id"].as_str().unwrap();
      let (code, _) = oneshot_json(
        state.clone(),
        "PUT",
        "/requests",
        Some(&token),
        Some(json!({ "id": id, "status": status })),
      )
      .await;
      assert_eq!(code, StatusCode::OK);
    }

    let (status, body) =
      oneshot_json(state, "GET", "/statistics", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["totalApplications"], 3);
    assert_eq!(data["foundPeople"], 2);

    let regions = data["regions"].as_array().unwrap();
    let bucket = |key: &str| {
      regions.iter().find(|g| g["_id"] == key).unwrap().clone()
    };
    assert_eq!(bucket("A")["total"], 2);
    assert_eq!(bucket("A")["found"], 1);
    assert_eq!(bucket("B")["total"], 1);
    assert_eq!(bucket("B")["found"], 1);
  }

  // ── Check-status ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn check_status_returns_the_public_view() {
    let state = make_state().await;
    let created = submit(&state, bek_payload()).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = oneshot_json(
      state,
      "POST",
      "/check-status",
      None,
      Some(json!({ "requestNumber": id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "received");
    assert!(body["data"].get("phoneNumber").is_none());
  }

  #[tokio::test]
  async fn check_status_unknown_number_is_404() {
    let state = make_state().await;
    let (status, _) = oneshot_json(
      state,
      "POST",
      "/check-status",
      None,
      Some(json!({ "requestNumber": uuid::Uuid::new_v4().to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn check_status_missing_number_is_400() {
    let state = make_state().await;
    let (status, _) =
      oneshot_json(state, "POST", "/check-status", None, Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }
}
