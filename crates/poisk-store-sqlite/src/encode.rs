//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings, the status as its snake_case wire spelling, and the prisoner
//! flag as 0/1.

use chrono::{DateTime, Utc};
use poisk_core::{
  case::{ApplicantInfo, CaseRecord, SearchContext, SubjectInfo},
  status::CaseStatus,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── CaseStatus ──────────────────────────────────────────────────────────────

pub fn encode_status(status: CaseStatus) -> String { status.to_string() }

pub fn decode_status(s: &str) -> Result<CaseStatus> {
  Ok(CaseStatus::parse(s)?)
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// The `cases` column list in the order [`raw_case_from_row`] expects.
/// Shared by every SELECT so the two can never drift apart.
pub const CASE_COLUMNS: &str = "\
  case_id, \
  searcher_full_name, phone_number, email, home_address, \
  application_region, application_country, heard_about_us, heard_about_us_other, \
  looking_for, returned_from_war, last_name, first_name, middle_name, \
  birth_date, birth_country, birth_region, birth_place_city, \
  conscription_date, conscription_place, marital_status, children_names, \
  relatives_listed, prisoner, prisoner_info, \
  search_goal, archive_search, archive_details, additional_info, files_link, \
  status, admin_comment, created_at, schema_version";

/// Raw values read directly from a `cases` row.
pub struct RawCase {
  pub case_id:              String,
  pub searcher_full_name:   String,
  pub phone_number:         String,
  pub email:                String,
  pub home_address:         Option<String>,
  pub application_region:   Option<String>,
  pub application_country:  Option<String>,
  pub heard_about_us:       Option<String>,
  pub heard_about_us_other: Option<String>,
  pub looking_for:          Option<String>,
  pub returned_from_war:    Option<String>,
  pub last_name:            String,
  pub first_name:           String,
  pub middle_name:          Option<String>,
  pub birth_date:           Option<String>,
  pub birth_country:        Option<String>,
  pub birth_region:         Option<String>,
  pub birth_place_city:     String,
  pub conscription_date:    Option<String>,
  pub conscription_place:   Option<String>,
  pub marital_status:       Option<String>,
  pub children_names:       Option<String>,
  pub relatives_listed:     Option<String>,
  pub prisoner:             bool,
  pub prisoner_info:        Option<String>,
  pub search_goal:          Option<String>,
  pub archive_search:       Option<String>,
  pub archive_details:      Option<String>,
  pub additional_info:      Option<String>,
  pub files_link:           Option<String>,
  pub status:               String,
  pub admin_comment:        String,
  pub created_at:           String,
  pub schema_version:       i64,
}

/// Read a [`RawCase`] from a row selected with [`CASE_COLUMNS`].
pub fn raw_case_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawCase> {
  Ok(RawCase {
    case_id:              row.get(0)?,
    searcher_full_name:   row.get(1)?,
    phone_number:         row.get(2)?,
    email:                row.get(3)?,
    home_address:         row.get(4)?,
    application_region:   row.get(5)?,
    application_country:  row.get(6)?,
    heard_about_us:       row.get(7)?,
    heard_about_us_other: row.get(8)?,
    looking_for:          row.get(9)?,
    returned_from_war:    row.get(10)?,
    last_name:            row.get(11)?,
    first_name:           row.get(12)?,
    middle_name:          row.get(13)?,
    birth_date:           row.get(14)?,
    birth_country:        row.get(15)?,
    birth_region:         row.get(16)?,
    birth_place_city:     row.get(17)?,
    conscription_date:    row.get(18)?,
    conscription_place:   row.get(19)?,
    marital_status:       row.get(20)?,
    children_names:       row.get(21)?,
    relatives_listed:     row.get(22)?,
    prisoner:             row.get(23)?,
    prisoner_info:        row.get(24)?,
    search_goal:          row.get(25)?,
    archive_search:       row.get(26)?,
    archive_details:      row.get(27)?,
    additional_info:      row.get(28)?,
    files_link:           row.get(29)?,
    status:               row.get(30)?,
    admin_comment:        row.get(31)?,
    created_at:           row.get(32)?,
    schema_version:       row.get(33)?,
  })
}

impl RawCase {
  pub fn into_case(self) -> Result<CaseRecord> {
    Ok(CaseRecord {
      id: decode_uuid(&self.case_id)?,
      applicant: ApplicantInfo {
        searcher_full_name:   self.searcher_full_name,
        phone_number:         self.phone_number,
        email:                self.email,
        home_address:         self.home_address,
        application_region:   self.application_region,
        application_country:  self.application_country,
        heard_about_us:       self.heard_about_us,
        heard_about_us_other: self.heard_about_us_other,
      },
      subject: SubjectInfo {
        looking_for:        self.looking_for,
        returned_from_war:  self.returned_from_war,
        last_name:          self.last_name,
        first_name:         self.first_name,
        middle_name:        self.middle_name,
        birth_date:         self.birth_date,
        birth_country:      self.birth_country,
        birth_region:       self.birth_region,
        birth_place_city:   self.birth_place_city,
        conscription_date:  self.conscription_date,
        conscription_place: self.conscription_place,
        marital_status:     self.marital_status,
        children_names:     self.children_names,
        relatives_listed:   self.relatives_listed,
        prisoner:           self.prisoner,
        prisoner_info:      self.prisoner_info,
      },
      context: SearchContext {
        search_goal:     self.search_goal,
        archive_search:  self.archive_search,
        archive_details: self.archive_details,
        additional_info: self.additional_info,
        files_link:      self.files_link,
      },
      status:         decode_status(&self.status)?,
      admin_comment:  self.admin_comment,
      created_at:     decode_dt(&self.created_at)?,
      schema_version: self.schema_version,
    })
  }
}
