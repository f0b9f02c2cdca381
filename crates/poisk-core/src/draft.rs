//! The submission payload and its validation rules.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
  case::{ApplicantInfo, SearchContext, SubjectInfo},
  error::{Error, Result},
};

/// Loose syntactic check: something before the `@`, a domain with at least
/// one dot after it, no whitespace. Deliverability is not our problem.
static EMAIL_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// A candidate case as submitted by the applicant, before the store assigns
/// id, status, and timestamps. Same flat camelCase wire shape as
/// [`CaseRecord`](crate::case::CaseRecord).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseDraft {
  #[serde(flatten)]
  pub applicant: ApplicantInfo,
  #[serde(flatten)]
  pub subject:   SubjectInfo,
  #[serde(flatten)]
  pub context:   SearchContext,
}

impl CaseDraft {
  /// Check the required-field and email-syntax rules.
  ///
  /// Required: the subject's last name, first name, and birth city, plus
  /// the applicant's full name, phone number, and email. Everything else
  /// may be empty or absent.
  pub fn validate(&self) -> Result<()> {
    let required: [(&'static str, &str); 6] = [
      ("lastName", &self.subject.last_name),
      ("firstName", &self.subject.first_name),
      ("birthPlaceCity", &self.subject.birth_place_city),
      ("searcherFullName", &self.applicant.searcher_full_name),
      ("phoneNumber", &self.applicant.phone_number),
      ("email", &self.applicant.email),
    ];

    for (field, value) in required {
      if value.trim().is_empty() {
        return Err(Error::missing(field));
      }
    }

    if !EMAIL_RE.is_match(&self.applicant.email) {
      return Err(Error::Validation {
        field:   "email",
        message: format!("not a valid email address: {:?}", self.applicant.email),
      });
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn valid_draft() -> CaseDraft {
    CaseDraft {
      applicant: ApplicantInfo {
        searcher_full_name: "Aigerim Bek".into(),
        phone_number:       "+77011234567".into(),
        email:              "a@b.kz".into(),
        ..Default::default()
      },
      subject: SubjectInfo {
        last_name:        "Bek".into(),
        first_name:       "Arman".into(),
        birth_place_city: "Almaty".into(),
        ..Default::default()
      },
      context: SearchContext::default(),
    }
  }

  #[test]
  fn valid_draft_passes() {
    valid_draft().validate().unwrap();
  }

  #[test]
  fn each_required_field_is_checked() {
    let mutations: [(&str, fn(&mut CaseDraft)); 6] = [
      ("lastName", |d| d.subject.last_name.clear()),
      ("firstName", |d| d.subject.first_name.clear()),
      ("birthPlaceCity", |d| d.subject.birth_place_city.clear()),
      ("searcherFullName", |d| d.applicant.searcher_full_name.clear()),
      ("phoneNumber", |d| d.applicant.phone_number.clear()),
      ("email", |d| d.applicant.email.clear()),
    ];

    for (expected, mutate) in mutations {
      let mut draft = valid_draft();
      mutate(&mut draft);
      let err = draft.validate().unwrap_err();
      assert!(
        matches!(err, Error::Validation { field, .. } if field == expected),
        "expected failure on {expected}"
      );
    }
  }

  #[test]
  fn whitespace_only_counts_as_empty() {
    let mut draft = valid_draft();
    draft.subject.last_name = "   ".into();
    assert!(draft.validate().is_err());
  }

  #[test]
  fn malformed_email_is_rejected() {
    for bad in ["not-an-email", "a@b", "a b@c.kz", "@b.kz", "a@"] {
      let mut draft = valid_draft();
      draft.applicant.email = bad.into();
      let err = draft.validate().unwrap_err();
      assert!(
        matches!(err, Error::Validation { field: "email", .. }),
        "expected email failure for {bad:?}"
      );
    }
  }

  #[test]
  fn absent_required_key_fails_validation_not_deserialization() {
    // A payload that never mentions `lastName` must still deserialize;
    // the absence is a validation error naming the field, not a parse
    // failure inside the JSON layer.
    let json = serde_json::json!({
      "firstName": "Arman",
      "birthPlaceCity": "Almaty",
      "searcherFullName": "Aigerim Bek",
      "phoneNumber": "+77011234567",
      "email": "a@b.kz",
    });
    let draft: CaseDraft = serde_json::from_value(json).unwrap();
    let err = draft.validate().unwrap_err();
    assert!(matches!(err, Error::Validation { field: "lastName", .. }));
  }

  #[test]
  fn optional_fields_may_be_absent() {
    // A draft containing only the six required fields deserializes and
    // validates; the form sends nothing else when left blank.
    let json = serde_json::json!({
      "lastName": "Bek",
      "firstName": "Arman",
      "birthPlaceCity": "Almaty",
      "searcherFullName": "Aigerim Bek",
      "phoneNumber": "+77011234567",
      "email": "a@b.kz",
    });
    let draft: CaseDraft = serde_json::from_value(json).unwrap();
    draft.validate().unwrap();
    assert!(!draft.subject.prisoner);
  }
}
