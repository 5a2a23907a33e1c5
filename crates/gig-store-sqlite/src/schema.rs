//! SQL schema for the gig SQLite store.
//!
//! Executed once at connection startup. Upgrades of older files are gated on
//! `PRAGMA user_version`.

/// Current value written to `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 2;

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS freelancers (
    id              TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    email           TEXT NOT NULL UNIQUE,  -- trimmed, lower-cased
    country         TEXT NOT NULL,
    skill           TEXT NOT NULL,
    gender          TEXT NOT NULL,         -- 'Male' | 'Female' | 'Other'
    age             INTEGER NOT NULL,
    projects_worked INTEGER NOT NULL DEFAULT 0,
    rating          REAL NOT NULL DEFAULT 3.0,
    last_active     TEXT NOT NULL,         -- fixed-width RFC 3339 UTC
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL,
    search_key      TEXT NOT NULL DEFAULT ''  -- Unicode-lowercased name and email
);

CREATE INDEX IF NOT EXISTS freelancers_country_skill_idx ON freelancers(country, skill);
CREATE INDEX IF NOT EXISTS freelancers_last_active_idx   ON freelancers(last_active);
";

/// Version 1 files predate `search_key`; the column is backfilled afterwards.
pub const ADD_SEARCH_KEY: &str = "
ALTER TABLE freelancers ADD COLUMN search_key TEXT NOT NULL DEFAULT '';
";
