//! [`SqliteStore`] — the SQLite implementation of [`CaseStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{types::Value, OptionalExtension as _};
use uuid::Uuid;

use poisk_core::{
  case::{CaseRecord, SCHEMA_VERSION},
  draft::CaseDraft,
  patch::CasePatch,
  stats::{CaseStatistics, GroupStat},
  status::CaseStatus,
  store::CaseStore,
};

use crate::{
  encode::{
    encode_dt, encode_status, encode_uuid, raw_case_from_row, RawCase,
    CASE_COLUMNS,
  },
  schema::SCHEMA,
  Error, Result,
};

/// Wrap a domain-level decode error so it can cross the
/// `tokio_rusqlite::call` boundary.
fn other(e: Error) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(e))
}

/// Bind parameters for a full `cases` row, in [`CASE_COLUMNS`] order.
fn case_params(record: &CaseRecord) -> Vec<Value> {
  fn text(s: &str) -> Value {
    Value::Text(s.to_owned())
  }
  fn opt(s: &Option<String>) -> Value {
    s.as_ref().map_or(Value::Null, |s| text(s))
  }

  let a = &record.applicant;
  let s = &record.subject;
  let c = &record.context;
  vec![
    text(&encode_uuid(record.id)),
    text(&a.searcher_full_name),
    text(&a.phone_number),
    text(&a.email),
    opt(&a.home_address),
    opt(&a.application_region),
    opt(&a.application_country),
    opt(&a.heard_about_us),
    opt(&a.heard_about_us_other),
    opt(&s.looking_for),
    opt(&s.returned_from_war),
    text(&s.last_name),
    text(&s.first_name),
    opt(&s.middle_name),
    opt(&s.birth_date),
    opt(&s.birth_country),
    opt(&s.birth_region),
    text(&s.birth_place_city),
    opt(&s.conscription_date),
    opt(&s.conscription_place),
    opt(&s.marital_status),
    opt(&s.children_names),
    opt(&s.relatives_listed),
    Value::Integer(s.prisoner.into()),
    opt(&s.prisoner_info),
    opt(&c.search_goal),
    opt(&c.archive_search),
    opt(&c.archive_details),
    opt(&c.additional_info),
    opt(&c.files_link),
    text(&encode_status(record.status)),
    text(&record.admin_comment),
    text(&encode_dt(record.created_at)),
    Value::Integer(record.schema_version),
  ]
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Poisk case store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// serialize on one dedicated database thread, which is what makes the
/// read-merge-write in [`update_case`](CaseStore::update_case) atomic.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CaseStore impl ──────────────────────────────────────────────────────────

impl CaseStore for SqliteStore {
  type Error = Error;

  async fn create_case(&self, draft: CaseDraft) -> Result<CaseRecord> {
    let record = CaseRecord {
      id:             Uuid::new_v4(),
      applicant:      draft.applicant,
      subject:        draft.subject,
      context:        draft.context,
      status:         CaseStatus::default(),
      admin_comment:  String::new(),
      created_at:     Utc::now(),
      schema_version: SCHEMA_VERSION,
    };

    let params = case_params(&record);
    self
      .conn
      .call(move |conn| {
        let placeholders = (1..=params.len())
          .map(|i| format!("?{i}"))
          .collect::<Vec<_>>()
          .join(", ");
        conn.execute(
          &format!("INSERT INTO cases ({CASE_COLUMNS}) VALUES ({placeholders})"),
          rusqlite::params_from_iter(params.iter()),
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn get_case(&self, id: Uuid) -> Result<Option<CaseRecord>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCase> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {CASE_COLUMNS} FROM cases WHERE case_id = ?1"),
              rusqlite::params![id_str],
              raw_case_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCase::into_case).transpose()
  }

  async fn list_cases(&self) -> Result<Vec<CaseRecord>> {
    let raws: Vec<RawCase> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CASE_COLUMNS} FROM cases ORDER BY created_at DESC"
        ))?;
        let rows = stmt
          .query_map([], raw_case_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCase::into_case).collect()
  }

  async fn update_case(&self, id: Uuid, patch: CasePatch) -> Result<CaseRecord> {
    let id_str = encode_uuid(id);

    // Read, merge, and write back inside one call so no other operation
    // can interleave between the read and the write.
    let updated: Option<CaseRecord> = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!("SELECT {CASE_COLUMNS} FROM cases WHERE case_id = ?1"),
            rusqlite::params![id_str],
            raw_case_from_row,
          )
          .optional()?;

        let Some(raw) = raw else {
          return Ok(None);
        };

        let mut record = raw.into_case().map_err(other)?;
        if let Some(to) = patch.status {
          record
            .status
            .ensure_permits(to)
            .map_err(|e| other(Error::Core(e)))?;
        }
        patch.apply(&mut record);

        let params = case_params(&record);
        let assignments = CASE_COLUMNS
          .split(", ")
          .enumerate()
          .map(|(i, col)| format!("{} = ?{}", col.trim(), i + 1))
          .collect::<Vec<_>>()
          .join(", ");
        conn.execute(
          &format!(
            "UPDATE cases SET {assignments} WHERE case_id = ?{}",
            params.len() + 1
          ),
          rusqlite::params_from_iter(
            params
              .iter()
              .cloned()
              .chain([Value::Text(encode_uuid(id))]),
          ),
        )?;

        Ok(Some(record))
      })
      .await?;

    updated.ok_or(Error::CaseNotFound(id))
  }

  async fn set_status(&self, id: Uuid, status: CaseStatus) -> Result<CaseRecord> {
    let id_str = encode_uuid(id);

    // Load first: the transition check needs the current status, and the
    // dedicated DB thread keeps the check-then-write atomic.
    let updated: Option<CaseRecord> = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!("SELECT {CASE_COLUMNS} FROM cases WHERE case_id = ?1"),
            rusqlite::params![id_str],
            raw_case_from_row,
          )
          .optional()?;

        let Some(raw) = raw else {
          return Ok(None);
        };

        let mut record = raw.into_case().map_err(other)?;
        record
          .status
          .ensure_permits(status)
          .map_err(|e| other(Error::Core(e)))?;

        conn.execute(
          "UPDATE cases SET status = ?1 WHERE case_id = ?2",
          rusqlite::params![encode_status(status), id_str],
        )?;
        record.status = status;

        Ok(Some(record))
      })
      .await?;

    updated.ok_or(Error::CaseNotFound(id))
  }

  async fn delete_case(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM cases WHERE case_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::CaseNotFound(id));
    }
    Ok(())
  }

  async fn statistics(&self) -> Result<CaseStatistics> {
    let found = encode_status(CaseStatus::Found);

    self
      .conn
      .call(move |conn| {
        let (total_applications, found_people): (i64, i64) = conn.query_row(
          "SELECT COUNT(*),
                  COALESCE(SUM(status = ?1), 0)
           FROM cases",
          rusqlite::params![found],
          |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let group_by = |column: &str| -> rusqlite::Result<Vec<GroupStat>> {
          let mut stmt = conn.prepare(&format!(
            "SELECT {column},
                    COUNT(*) AS total,
                    COALESCE(SUM(status = ?1), 0) AS found
             FROM cases
             GROUP BY {column}
             ORDER BY total DESC"
          ))?;
          stmt
            .query_map(rusqlite::params![found], |row| {
              Ok(GroupStat {
                key:   row.get(0)?,
                total: row.get(1)?,
                found: row.get(2)?,
              })
            })?
            .collect()
        };

        let regions   = group_by("application_region")?;
        let countries = group_by("application_country")?;

        Ok(CaseStatistics {
          total_applications,
          found_people,
          regions,
          countries,
        })
      })
      .await
      .map_err(Error::from)
  }
}
