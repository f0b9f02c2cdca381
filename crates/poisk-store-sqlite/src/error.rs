//! Error type for `poisk-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] poisk_core::Error),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Lookup, update, set-status, or delete against an id that does not
  /// resolve.
  #[error("case not found: {0}")]
  CaseNotFound(uuid::Uuid),
}

impl poisk_core::store::StoreError for Error {
  fn is_not_found(&self) -> bool {
    matches!(self, Self::CaseNotFound(_))
  }
}

/// Domain errors cross the `conn.call` boundary boxed inside
/// [`tokio_rusqlite::Error::Other`]; unwrap them back into themselves so
/// callers see e.g. a transition error, not a database error.
impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::Other(inner) => match inner.downcast::<Error>() {
        Ok(domain) => *domain,
        Err(inner) => Error::Database(tokio_rusqlite::Error::Other(inner)),
      },
      e => Error::Database(e),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
