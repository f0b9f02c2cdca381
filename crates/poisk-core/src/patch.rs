//! Partial-merge updates.
//!
//! A patch carries only the fields the caller wants to change; omitted keys
//! retain their stored value. The merge itself is applied by the store
//! inside a single connection call, so two concurrent patches to the same
//! record serialize instead of overwriting each other wholesale.

use serde::{Deserialize, Serialize};

use crate::{case::CaseRecord, status::CaseStatus};

/// A shallow partial update of a [`CaseRecord`]. Flat camelCase on the
/// wire, like the record itself. `None` means "leave unchanged"; to clear
/// an optional text field, send an empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CasePatch {
  // Applicant block.
  pub searcher_full_name:   Option<String>,
  pub phone_number:         Option<String>,
  pub email:                Option<String>,
  pub home_address:         Option<String>,
  pub application_region:   Option<String>,
  pub application_country:  Option<String>,
  pub heard_about_us:       Option<String>,
  pub heard_about_us_other: Option<String>,

  // Subject block.
  pub looking_for:        Option<String>,
  pub returned_from_war:  Option<String>,
  pub last_name:          Option<String>,
  pub first_name:         Option<String>,
  pub middle_name:        Option<String>,
  pub birth_date:         Option<String>,
  pub birth_country:      Option<String>,
  pub birth_region:       Option<String>,
  pub birth_place_city:   Option<String>,
  pub conscription_date:  Option<String>,
  pub conscription_place: Option<String>,
  pub marital_status:     Option<String>,
  pub children_names:     Option<String>,
  pub relatives_listed:   Option<String>,
  pub prisoner:           Option<bool>,
  pub prisoner_info:      Option<String>,

  // Search context.
  pub search_goal:     Option<String>,
  pub archive_search:  Option<String>,
  pub archive_details: Option<String>,
  pub additional_info: Option<String>,
  pub files_link:      Option<String>,

  // Review-only fields; an unauthenticated caller may not set these.
  pub status:        Option<CaseStatus>,
  pub admin_comment: Option<String>,
}

impl CasePatch {
  /// Whether the patch touches fields reserved for authenticated reviewers.
  pub fn touches_review_fields(&self) -> bool {
    self.status.is_some() || self.admin_comment.is_some()
  }

  /// Merge this patch into `record`, field by field.
  pub fn apply(&self, record: &mut CaseRecord) {
    fn set<T: Clone>(target: &mut T, source: &Option<T>) {
      if let Some(value) = source {
        *target = value.clone();
      }
    }
    fn set_opt(target: &mut Option<String>, source: &Option<String>) {
      if let Some(value) = source {
        *target = Some(value.clone());
      }
    }

    let a = &mut record.applicant;
    set(&mut a.searcher_full_name, &self.searcher_full_name);
    set(&mut a.phone_number, &self.phone_number);
    set(&mut a.email, &self.email);
    set_opt(&mut a.home_address, &self.home_address);
    set_opt(&mut a.application_region, &self.application_region);
    set_opt(&mut a.application_country, &self.application_country);
    set_opt(&mut a.heard_about_us, &self.heard_about_us);
    set_opt(&mut a.heard_about_us_other, &self.heard_about_us_other);

    let s = &mut record.subject;
    set_opt(&mut s.looking_for, &self.looking_for);
    set_opt(&mut s.returned_from_war, &self.returned_from_war);
    set(&mut s.last_name, &self.last_name);
    set(&mut s.first_name, &self.first_name);
    set_opt(&mut s.middle_name, &self.middle_name);
    set_opt(&mut s.birth_date, &self.birth_date);
    set_opt(&mut s.birth_country, &self.birth_country);
    set_opt(&mut s.birth_region, &self.birth_region);
    set(&mut s.birth_place_city, &self.birth_place_city);
    set_opt(&mut s.conscription_date, &self.conscription_date);
    set_opt(&mut s.conscription_place, &self.conscription_place);
    set_opt(&mut s.marital_status, &self.marital_status);
    set_opt(&mut s.children_names, &self.children_names);
    set_opt(&mut s.relatives_listed, &self.relatives_listed);
    set(&mut s.prisoner, &self.prisoner);
    set_opt(&mut s.prisoner_info, &self.prisoner_info);

    let c = &mut record.context;
    set_opt(&mut c.search_goal, &self.search_goal);
    set_opt(&mut c.archive_search, &self.archive_search);
    set_opt(&mut c.archive_details, &self.archive_details);
    set_opt(&mut c.additional_info, &self.additional_info);
    set_opt(&mut c.files_link, &self.files_link);

    set(&mut record.status, &self.status);
    set(&mut record.admin_comment, &self.admin_comment);
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::case::{
    ApplicantInfo, SearchContext, SubjectInfo, SCHEMA_VERSION,
  };

  fn stored_record() -> CaseRecord {
    CaseRecord {
      id: Uuid::new_v4(),
      applicant: ApplicantInfo {
        searcher_full_name: "Aigerim Bek".into(),
        phone_number:       "+77011234567".into(),
        email:              "a@b.kz".into(),
        home_address:       Some("Abay Ave 1".into()),
        ..Default::default()
      },
      subject: SubjectInfo {
        last_name:        "Bek".into(),
        first_name:       "Arman".into(),
        birth_place_city: "Almaty".into(),
        ..Default::default()
      },
      context:        SearchContext::default(),
      status:         CaseStatus::Received,
      admin_comment:  String::new(),
      created_at:     Utc::now(),
      schema_version: SCHEMA_VERSION,
    }
  }

  #[test]
  fn status_only_patch_leaves_other_fields() {
    let mut record = stored_record();
    let before = record.clone();

    let patch = CasePatch {
      status: Some(CaseStatus::Found),
      ..Default::default()
    };
    patch.apply(&mut record);

    assert_eq!(record.status, CaseStatus::Found);
    assert_eq!(record.applicant, before.applicant);
    assert_eq!(record.subject, before.subject);
    assert_eq!(record.context, before.context);
    assert_eq!(record.admin_comment, before.admin_comment);
    assert_eq!(record.created_at, before.created_at);
  }

  #[test]
  fn provided_keys_overwrite() {
    let mut record = stored_record();
    let patch = CasePatch {
      phone_number:  Some("+77770000000".into()),
      admin_comment: Some("called the applicant".into()),
      ..Default::default()
    };
    patch.apply(&mut record);

    assert_eq!(record.applicant.phone_number, "+77770000000");
    assert_eq!(record.admin_comment, "called the applicant");
    // Untouched optional stays.
    assert_eq!(record.applicant.home_address.as_deref(), Some("Abay Ave 1"));
  }

  #[test]
  fn empty_patch_is_a_no_op() {
    let mut record = stored_record();
    let before = record.clone();
    CasePatch::default().apply(&mut record);
    assert_eq!(record, before);
  }

  #[test]
  fn review_field_detection() {
    assert!(!CasePatch::default().touches_review_fields());
    assert!(
      CasePatch { status: Some(CaseStatus::Searching), ..Default::default() }
        .touches_review_fields()
    );
    assert!(
      CasePatch { admin_comment: Some(String::new()), ..Default::default() }
        .touches_review_fields()
    );
  }

  #[test]
  fn unknown_status_in_patch_fails_to_deserialize() {
    let err = serde_json::from_value::<CasePatch>(serde_json::json!({
      "status": "approved"
    }));
    assert!(err.is_err());
  }
}
