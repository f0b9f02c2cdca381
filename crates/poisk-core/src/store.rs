//! The `CaseStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `poisk-store-sqlite`).
//! Higher layers (`poisk-api`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  case::CaseRecord, draft::CaseDraft, patch::CasePatch,
  stats::CaseStatistics, status::CaseStatus,
};

/// Implemented by backend error types so callers can tell "the id did not
/// resolve" apart from a real storage failure without naming the backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_not_found(&self) -> bool;
}

/// Abstraction over a Poisk case store backend.
///
/// Writes are last-write-wins at record granularity, except `update_case`,
/// which must apply its partial merge atomically with respect to other
/// calls on the same store (read-merge-write with no interleaving).
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CaseStore: Send + Sync {
  type Error: StoreError;

  /// Persist a new case from a validated draft.
  ///
  /// The store assigns the id, the initial `Received` status, an empty
  /// admin comment, and the creation timestamp. Submission is NOT
  /// idempotent: identical drafts produce distinct records.
  fn create_case(
    &self,
    draft: CaseDraft,
  ) -> impl Future<Output = Result<CaseRecord, Self::Error>> + Send + '_;

  /// Retrieve a case by id. Returns `None` if not found.
  fn get_case(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<CaseRecord>, Self::Error>> + Send + '_;

  /// List all cases, newest first.
  fn list_cases(
    &self,
  ) -> impl Future<Output = Result<Vec<CaseRecord>, Self::Error>> + Send + '_;

  /// Merge `patch` into the stored record and return the updated record.
  /// Fails if `id` does not resolve.
  fn update_case(
    &self,
    id: Uuid,
    patch: CasePatch,
  ) -> impl Future<Output = Result<CaseRecord, Self::Error>> + Send + '_;

  /// Set the status — the narrow, single-purpose mutation path. Fails if
  /// `id` does not resolve; any member of the enumeration is accepted
  /// (the permitted-transition set currently has all-to-all edges).
  fn set_status(
    &self,
    id: Uuid,
    status: CaseStatus,
  ) -> impl Future<Output = Result<CaseRecord, Self::Error>> + Send + '_;

  /// Permanently remove a case. No undo. Fails if `id` does not resolve.
  fn delete_case(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Recompute the aggregation report from the current store contents.
  fn statistics(
    &self,
  ) -> impl Future<Output = Result<CaseStatistics, Self::Error>> + Send + '_;
}
