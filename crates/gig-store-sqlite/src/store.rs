//! [`SqliteStore`], the SQLite implementation of [`FreelancerStore`].

use std::path::Path;

use chrono::{SubsecRound as _, Utc};
use gig_core::{
  freelancer::{Freelancer, FreelancerPatch, NewFreelancer},
  store::{DistinctField, FreelancerQuery, FreelancerStore},
};
use rusqlite::{OptionalExtension as _, types::Value};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    FREELANCER_COLUMNS, RawFreelancer, encode_dt, encode_gender, encode_uuid, like_pattern,
    search_key,
  },
  schema::{ADD_SEARCH_KEY, SCHEMA, SCHEMA_VERSION},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A freelancer store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "opening sqlite store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, used by tests.
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
        let version: i64 = conn.pragma_query_value(None, "user_version", |r| r.get(0))?;
        conn.execute_batch(SCHEMA)?;
        if version == 1 {
          conn.execute_batch(ADD_SEARCH_KEY)?;
          backfill_search_keys(conn)?;
        }
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert or overwrite the full row for `f`.
  async fn write_row(&self, f: &Freelancer, replace: bool) -> Result<()> {
    let id_str          = encode_uuid(f.id);
    let name            = f.name.clone();
    let email           = f.email.clone();
    let country         = f.country.clone();
    let skill           = f.skill.clone();
    let gender          = encode_gender(f.gender);
    let age             = i64::from(f.age);
    let projects_worked = i64::from(f.projects_worked);
    let rating          = f.rating;
    let last_active     = encode_dt(f.last_active);
    let created_at      = encode_dt(f.created_at);
    let updated_at      = encode_dt(f.updated_at);
    let key             = search_key(&f.name, &f.email);

    let sql = if replace {
      "UPDATE freelancers SET
         name = ?2, email = ?3, country = ?4, skill = ?5, gender = ?6, age = ?7,
         projects_worked = ?8, rating = ?9, last_active = ?10, created_at = ?11,
         updated_at = ?12, search_key = ?13
       WHERE id = ?1"
    } else {
      "INSERT INTO freelancers (
         id, name, email, country, skill, gender, age,
         projects_worked, rating, last_active, created_at, updated_at, search_key
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
    };

    self
      .conn
      .call(move |conn| {
        conn.execute(
          sql,
          rusqlite::params![
            id_str,
            name,
            email,
            country,
            skill,
            gender,
            age,
            projects_worked,
            rating,
            last_active,
            created_at,
            updated_at,
            key,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| unique_violation(e, &f.email))
  }
}

/// Fill `search_key` for rows written before the column existed.
fn backfill_search_keys(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  let mut select = conn.prepare("SELECT id, name, email FROM freelancers")?;
  let rows = select
    .query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?, r.get::<_, String>(2)?)))?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut stmt = conn.prepare("UPDATE freelancers SET search_key = ?2 WHERE id = ?1")?;
  for (id, name, email) in rows {
    stmt.execute(rusqlite::params![id, search_key(&name, &email)])?;
  }
  Ok(())
}

/// Map a UNIQUE constraint failure on `freelancers.email` to the core
/// duplicate error. Other constraint failures stay database errors.
fn unique_violation(e: tokio_rusqlite::Error, email: &str) -> Error {
  match &e {
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(failure, Some(msg)))
      if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        && msg.contains("freelancers.email") =>
    {
      gig_core::Error::DuplicateEmail(email.to_owned()).into()
    }
    _ => e.into(),
  }
}

/// `WHERE` clause and positional parameters for the filter part of `query`.
fn filter_clause(query: &FreelancerQuery) -> (String, Vec<Value>) {
  let mut conds: Vec<&'static str> = vec![];
  let mut params: Vec<Value> = vec![];

  if let Some(country) = query.country.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
    conds.push("country = ?");
    params.push(Value::Text(country.to_owned()));
  }
  if let Some(skill) = query.skill.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
    conds.push("skill = ?");
    params.push(Value::Text(skill.to_owned()));
  }
  if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
    conds.push("search_key LIKE ? ESCAPE '\\'");
    params.push(Value::Text(like_pattern(&search.to_lowercase())));
  }

  let clause = if conds.is_empty() {
    String::new()
  } else {
    format!("WHERE {}", conds.join(" AND "))
  };
  (clause, params)
}

/// Timestamps are stored at microsecond precision; trim the in-memory
/// record to match so the returned value equals what a later read yields.
fn at_stored_precision(mut f: Freelancer) -> Freelancer {
  f.last_active = f.last_active.trunc_subsecs(6);
  f.created_at = f.created_at.trunc_subsecs(6);
  f.updated_at = f.updated_at.trunc_subsecs(6);
  f
}

fn to_sql_int(n: usize) -> i64 { i64::try_from(n).unwrap_or(i64::MAX) }

// ─── FreelancerStore impl ────────────────────────────────────────────────────

impl FreelancerStore for SqliteStore {
  type Error = Error;

  async fn create(&self, input: NewFreelancer) -> Result<Freelancer> {
    let freelancer = at_stored_precision(input.into_freelancer(Utc::now())?);
    self.write_row(&freelancer, false).await?;
    tracing::debug!(id = %freelancer.id, "created freelancer");
    Ok(freelancer)
  }

  async fn get(&self, id: Uuid) -> Result<Option<Freelancer>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawFreelancer> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {FREELANCER_COLUMNS} FROM freelancers WHERE id = ?1");
        let raw = conn
          .query_row(&sql, rusqlite::params![id_str], RawFreelancer::from_row)
          .optional()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawFreelancer::into_freelancer).transpose()
  }

  async fn get_many<'a>(&'a self, ids: &'a [Uuid]) -> Result<Vec<Freelancer>> {
    if ids.is_empty() {
      return Ok(vec![]);
    }
    let id_strs: Vec<String> = ids.iter().copied().map(encode_uuid).collect();

    let raws: Vec<RawFreelancer> = self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; id_strs.len()].join(", ");
        let sql = format!(
          "SELECT {FREELANCER_COLUMNS} FROM freelancers
           WHERE id IN ({placeholders})
           ORDER BY last_active DESC, id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(id_strs.iter()), RawFreelancer::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFreelancer::into_freelancer).collect()
  }

  async fn update(&self, id: Uuid, patch: FreelancerPatch) -> Result<Option<Freelancer>> {
    let Some(current) = self.get(id).await? else {
      return Ok(None);
    };
    let next = at_stored_precision(current.patched(patch, Utc::now())?);
    self.write_row(&next, true).await?;
    tracing::debug!(%id, "updated freelancer");
    Ok(Some(next))
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let affected = self
      .conn
      .call(move |conn| {
        let n = conn.execute("DELETE FROM freelancers WHERE id = ?1", rusqlite::params![id_str])?;
        Ok(n)
      })
      .await?;
    Ok(affected > 0)
  }

  async fn delete_all(&self) -> Result<usize> {
    let affected = self
      .conn
      .call(|conn| {
        let n = conn.execute("DELETE FROM freelancers", [])?;
        Ok(n)
      })
      .await?;
    Ok(affected)
  }

  async fn list<'a>(&'a self, query: &'a FreelancerQuery) -> Result<Vec<Freelancer>> {
    let (where_clause, mut params) = filter_clause(query);
    // SQLite treats a negative LIMIT as "no limit".
    params.push(Value::Integer(query.limit.map(to_sql_int).unwrap_or(-1)));
    params.push(Value::Integer(query.offset.map(to_sql_int).unwrap_or(0)));

    let raws: Vec<RawFreelancer> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {FREELANCER_COLUMNS} FROM freelancers
           {where_clause}
           ORDER BY last_active DESC, id
           LIMIT ? OFFSET ?"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawFreelancer::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFreelancer::into_freelancer).collect()
  }

  async fn count<'a>(&'a self, query: &'a FreelancerQuery) -> Result<usize> {
    let (where_clause, params) = filter_clause(query);

    let n: i64 = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT COUNT(*) FROM freelancers {where_clause}");
        let n = conn.query_row(&sql, rusqlite::params_from_iter(params), |r| r.get(0))?;
        Ok(n)
      })
      .await?;

    usize::try_from(n).map_err(|_| Error::CorruptRow(format!("negative count {n}")))
  }

  async fn distinct(&self, field: DistinctField) -> Result<Vec<String>> {
    let column = match field {
      DistinctField::Country => "country",
      DistinctField::Skill => "skill",
    };

    let values = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT DISTINCT {column} FROM freelancers ORDER BY {column}");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |r| r.get::<_, String>(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(values)
  }
}
