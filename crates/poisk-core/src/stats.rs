//! On-demand aggregation report types.

use serde::{Deserialize, Serialize};

/// One group-by bucket: a region or country, its case total, and how many
/// of those cases reached `Found`. A `None` key is the "not specified"
/// bucket (records where the grouping field was never filled in), kept as
/// JSON `null` to match the historical wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStat {
  #[serde(rename = "_id")]
  pub key:   Option<String>,
  pub total: i64,
  pub found: i64,
}

/// The full statistics document, recomputed from scratch on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStatistics {
  pub total_applications: i64,
  /// Cases whose status is `Found`.
  pub found_people:       i64,
  /// Buckets by `applicationRegion`, ordered by total descending.
  pub regions:            Vec<GroupStat>,
  /// Buckets by `applicationCountry`, ordered by total descending.
  pub countries:          Vec<GroupStat>,
}
