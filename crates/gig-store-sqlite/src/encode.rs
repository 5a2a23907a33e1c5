//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so that lexical order matches chronological order.
//! UUIDs are stored as hyphenated lowercase strings.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use gig_core::freelancer::{Freelancer, Gender};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Gender ───────────────────────────────────────────────────────────────────

pub fn encode_gender(g: Gender) -> &'static str { g.into() }

pub fn decode_gender(s: &str) -> Result<Gender> {
  Gender::from_str(s).map_err(|_| gig_core::Error::UnknownGender(s.to_owned()).into())
}

// ─── Search ───────────────────────────────────────────────────────────────────

/// Lower-cased name and email joined by a newline, matched by `search`.
///
/// SQLite's `LIKE` and `lower()` only fold ASCII, so folding happens here.
pub fn search_key(name: &str, email: &str) -> String {
  format!("{}\n{}", name.to_lowercase(), email.to_lowercase())
}

/// `%text%` with `%`, `_` and `\` escaped; pair with `ESCAPE '\'`.
pub fn like_pattern(text: &str) -> String {
  let mut out = String::with_capacity(text.len() + 2);
  out.push('%');
  for c in text.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Column list matching [`RawFreelancer::from_row`].
pub const FREELANCER_COLUMNS: &str = "id, name, email, country, skill, gender, age, \
                                      projects_worked, rating, last_active, created_at, \
                                      updated_at";

/// Raw values read directly from a `freelancers` row.
pub struct RawFreelancer {
  pub id:              String,
  pub name:            String,
  pub email:           String,
  pub country:         String,
  pub skill:           String,
  pub gender:          String,
  pub age:             i64,
  pub projects_worked: i64,
  pub rating:          f64,
  pub last_active:     String,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawFreelancer {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      name:            row.get(1)?,
      email:           row.get(2)?,
      country:         row.get(3)?,
      skill:           row.get(4)?,
      gender:          row.get(5)?,
      age:             row.get(6)?,
      projects_worked: row.get(7)?,
      rating:          row.get(8)?,
      last_active:     row.get(9)?,
      created_at:      row.get(10)?,
      updated_at:      row.get(11)?,
    })
  }

  pub fn into_freelancer(self) -> Result<Freelancer> {
    let age = u32::try_from(self.age)
      .map_err(|_| Error::CorruptRow(format!("age {} out of range", self.age)))?;
    let projects_worked = u32::try_from(self.projects_worked).map_err(|_| {
      Error::CorruptRow(format!("projects_worked {} out of range", self.projects_worked))
    })?;

    Ok(Freelancer {
      id: decode_uuid(&self.id)?,
      name: self.name,
      email: self.email,
      country: self.country,
      skill: self.skill,
      gender: decode_gender(&self.gender)?,
      age,
      projects_worked,
      rating: self.rating,
      last_active: decode_dt(&self.last_active)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_are_fixed_width_and_roundtrip() {
    let a = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let b = a + chrono::Duration::microseconds(1_500);
    let (ea, eb) = (encode_dt(a), encode_dt(b));
    assert_eq!(ea, "2024-01-02T03:04:05.000000Z");
    assert_eq!(ea.len(), eb.len());
    assert!(ea < eb);
    assert_eq!(decode_dt(&eb).unwrap(), b);
  }

  #[test]
  fn search_key_folds_non_ascii_case() {
    assert_eq!(search_key("ÉLODIE Moreau", "Elodie@Example.com"), "élodie moreau\nelodie@example.com");
  }

  #[test]
  fn like_pattern_escapes_wildcards() {
    assert_eq!(like_pattern("ann"), "%ann%");
    assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
  }

  #[test]
  fn unknown_gender_is_a_core_error() {
    assert!(matches!(
      decode_gender("robot"),
      Err(Error::Core(gig_core::Error::UnknownGender(_)))
    ));
    assert_eq!(decode_gender(encode_gender(Gender::Female)).unwrap(), Gender::Female);
  }
}
