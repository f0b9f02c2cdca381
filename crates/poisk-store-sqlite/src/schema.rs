//! SQL schema for the Poisk SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`; the per-row `schema_version` column records which
//! revision of the case shape a row was written under.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS cases (
    case_id              TEXT PRIMARY KEY,

    -- Applicant block.
    searcher_full_name   TEXT NOT NULL,
    phone_number         TEXT NOT NULL,
    email                TEXT NOT NULL,
    home_address         TEXT,
    application_region   TEXT,
    application_country  TEXT,
    heard_about_us       TEXT,
    heard_about_us_other TEXT,

    -- Subject (missing person) block.
    looking_for          TEXT,
    returned_from_war    TEXT,
    last_name            TEXT NOT NULL,
    first_name           TEXT NOT NULL,
    middle_name          TEXT,
    birth_date           TEXT,
    birth_country        TEXT,
    birth_region         TEXT,
    birth_place_city     TEXT NOT NULL,
    conscription_date    TEXT,
    conscription_place   TEXT,
    marital_status       TEXT,
    children_names       TEXT,
    relatives_listed     TEXT,
    prisoner             INTEGER NOT NULL DEFAULT 0,
    prisoner_info        TEXT,

    -- Search context.
    search_goal          TEXT,
    archive_search       TEXT,
    archive_details      TEXT,
    additional_info      TEXT,
    files_link           TEXT,

    status               TEXT NOT NULL DEFAULT 'received',
    admin_comment        TEXT NOT NULL DEFAULT '',
    created_at           TEXT NOT NULL,   -- RFC 3339 UTC; server-assigned
    schema_version       INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS cases_created_idx ON cases(created_at);
CREATE INDEX IF NOT EXISTS cases_region_idx  ON cases(application_region);
CREATE INDEX IF NOT EXISTS cases_country_idx ON cases(application_country);

PRAGMA user_version = 1;
";
