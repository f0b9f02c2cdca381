//! The case status enumeration and the transition policy.
//!
//! The enumeration is closed: no other value is ever persisted. The
//! transition relation is carried as explicit data so that tightening it
//! later is a data change, not a code change — today every pair is
//! permitted, because case officers need the discretion to move a case
//! backward (e.g. from `Found` to `DataInsufficient` on review).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::{Error, Result};

/// Where a case stands in the review lifecycle.
///
/// Intended progression (not enforced):
/// `Received` → `DataInsufficient` | `Searching` → `PartiallyFound`,
/// `Found`, `NotFoundInArchive` → `PendingApplicantReply`,
/// `TransferredToArchive`, `ReferForCommemoration`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
  Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CaseStatus {
  /// Initial state of every newly submitted case.
  #[default]
  Received,
  DataInsufficient,
  Searching,
  PartiallyFound,
  Found,
  NotFoundInArchive,
  PendingApplicantReply,
  TransferredToArchive,
  ReferForCommemoration,
}

type TransitionTable = &'static [(CaseStatus, &'static [CaseStatus])];

const EVERY_STATUS: &[CaseStatus] = &[
  CaseStatus::Received,
  CaseStatus::DataInsufficient,
  CaseStatus::Searching,
  CaseStatus::PartiallyFound,
  CaseStatus::Found,
  CaseStatus::NotFoundInArchive,
  CaseStatus::PendingApplicantReply,
  CaseStatus::TransferredToArchive,
  CaseStatus::ReferForCommemoration,
];

/// The permitted-transition relation. Every pair is an edge today
/// (self-loops included): the progression order above is advice to the
/// reviewer, not a constraint. Tightening the lifecycle means editing
/// this table.
const TRANSITIONS: TransitionTable = &[
  (CaseStatus::Received, EVERY_STATUS),
  (CaseStatus::DataInsufficient, EVERY_STATUS),
  (CaseStatus::Searching, EVERY_STATUS),
  (CaseStatus::PartiallyFound, EVERY_STATUS),
  (CaseStatus::Found, EVERY_STATUS),
  (CaseStatus::NotFoundInArchive, EVERY_STATUS),
  (CaseStatus::PendingApplicantReply, EVERY_STATUS),
  (CaseStatus::TransferredToArchive, EVERY_STATUS),
  (CaseStatus::ReferForCommemoration, EVERY_STATUS),
];

fn targets(table: TransitionTable, from: CaseStatus) -> &'static [CaseStatus] {
  table
    .iter()
    .find(|(f, _)| *f == from)
    .map(|(_, to)| *to)
    .unwrap_or(&[])
}

impl CaseStatus {
  /// Parse the wire spelling of a status. Fails with
  /// [`Error::InvalidStatus`] for anything outside the enumeration.
  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::InvalidStatus(s.to_string()))
  }

  /// All members of the enumeration, in intended progression order.
  pub fn all() -> impl Iterator<Item = Self> {
    Self::iter()
  }

  /// The statuses this one may transition to, per the transition table.
  pub fn permitted_transitions(self) -> impl Iterator<Item = Self> {
    targets(TRANSITIONS, self).iter().copied()
  }

  /// Whether a transition from `self` to `to` is in the permitted set.
  pub fn permits(self, to: Self) -> bool {
    targets(TRANSITIONS, self).contains(&to)
  }

  /// Check a transition against the table; the store consults this before
  /// persisting any status change.
  pub fn ensure_permits(self, to: Self) -> Result<()> {
    if self.permits(to) {
      Ok(())
    } else {
      Err(Error::ForbiddenTransition { from: self, to })
    }
  }
}
