//! Error types for `poisk-core`.

use thiserror::Error;

use crate::status::CaseStatus;

#[derive(Debug, Error)]
pub enum Error {
  /// A required field was missing or empty, or a field failed a syntax
  /// check. The message names the offending field in its wire spelling.
  #[error("validation failed: {field}: {message}")]
  Validation { field: &'static str, message: String },

  #[error("unknown case status: {0:?}")]
  InvalidStatus(String),

  /// The requested status change is not an edge of the transition table.
  #[error("transition not permitted: {from} -> {to}")]
  ForbiddenTransition { from: CaseStatus, to: CaseStatus },
}

impl Error {
  pub fn missing(field: &'static str) -> Self {
    Self::Validation {
      field,
      message: "required field is missing or empty".to_string(),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
