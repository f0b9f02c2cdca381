//! The case record — the sole persisted entity — and its projections.
//!
//! The record carries three field blocks: who is asking (applicant), who is
//! being searched for (subject), and free-text context for the archive
//! search. On the wire everything is flat camelCase JSON; the blocks are
//! `#[serde(flatten)]`-ed so the Rust side keeps its structure without
//! changing the historical wire shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::CaseStatus;

/// Schema revision written into every new record. The service went through
/// three incompatible record shapes; this is the canonical third one.
pub const SCHEMA_VERSION: i64 = 3;

// ─── Field blocks ────────────────────────────────────────────────────────────

/// Contact data for the person filing the case.
///
/// Container-level `default` so an absent key deserializes to an empty
/// value; required-field absence is then reported by draft validation with
/// the field's wire name instead of failing inside the JSON extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicantInfo {
  pub searcher_full_name:  String,
  pub phone_number:        String,
  pub email:               String,
  pub home_address:        Option<String>,
  pub application_region:  Option<String>,
  pub application_country: Option<String>,
  pub heard_about_us:      Option<String>,
  /// Free-text fallback when `heard_about_us` is "other".
  pub heard_about_us_other: Option<String>,
}

/// Everything known about the missing person. Container-level `default`
/// for the same reason as [`ApplicantInfo`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubjectInfo {
  pub looking_for:        Option<String>,
  pub returned_from_war:  Option<String>,
  pub last_name:          String,
  pub first_name:         String,
  pub middle_name:        Option<String>,
  pub birth_date:         Option<String>,
  pub birth_country:      Option<String>,
  pub birth_region:       Option<String>,
  pub birth_place_city:   String,
  pub conscription_date:  Option<String>,
  pub conscription_place: Option<String>,
  pub marital_status:     Option<String>,
  pub children_names:     Option<String>,
  pub relatives_listed:   Option<String>,
  pub prisoner:           bool,
  /// Meaningful only when `prisoner` is true; the form shows the field
  /// conditionally but the invariant is not enforced here.
  pub prisoner_info:      Option<String>,
}

/// Optional free-text context for the archive search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchContext {
  pub search_goal:     Option<String>,
  pub archive_search:  Option<String>,
  pub archive_details: Option<String>,
  pub additional_info: Option<String>,
  /// External link to uploaded files; the service never stores binaries.
  pub files_link:      Option<String>,
}

// ─── CaseRecord ──────────────────────────────────────────────────────────────

/// One search request, as persisted.
///
/// `id` is assigned once at creation, never reassigned, never reused; it
/// doubles as the applicant's lookup token. `created_at` is server-assigned
/// and immutable. `status` changes only through the store's `set_status`
/// path or an authenticated update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
  pub id:             Uuid,
  #[serde(flatten)]
  pub applicant:      ApplicantInfo,
  #[serde(flatten)]
  pub subject:        SubjectInfo,
  #[serde(flatten)]
  pub context:        SearchContext,
  pub status:         CaseStatus,
  /// Written by reviewers; shown read-only to the applicant.
  pub admin_comment:  String,
  pub created_at:     DateTime<Utc>,
  pub schema_version: i64,
}

// ─── Public projection ───────────────────────────────────────────────────────

/// What an anonymous caller holding only a case id gets back.
///
/// The case id is a guessable-format token, so the applicant contact block
/// is redacted; the subject block, search context, status, and the
/// reviewer's comment remain visible (the applicant is expected to read
/// the comment on the public status page).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCaseView {
  pub id:            Uuid,
  #[serde(flatten)]
  pub subject:       SubjectInfo,
  #[serde(flatten)]
  pub context:       SearchContext,
  pub status:        CaseStatus,
  pub admin_comment: String,
  pub created_at:    DateTime<Utc>,
}

impl From<CaseRecord> for PublicCaseView {
  fn from(record: CaseRecord) -> Self {
    Self {
      id:            record.id,
      subject:       record.subject,
      context:       record.context,
      status:        record.status,
      admin_comment: record.admin_comment,
      created_at:    record.created_at,
    }
  }
}
