//! The freelancer record, the only entity tracked by the roster.
//!
//! Records are normalized and validated here, before they ever reach a store.
//! Derived quantities (days inactive, activity, performance index) are never
//! stored; see `gig-analytics`.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Field bounds ────────────────────────────────────────────────────────────

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;
pub const AGE_MIN: u32 = 18;
pub const AGE_MAX: u32 = 100;
pub const RATING_MIN: f64 = 1.0;
pub const RATING_MAX: f64 = 5.0;
pub const DEFAULT_RATING: f64 = 3.0;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$")
    .expect("email pattern is a valid regex")
});

// ─── Gender ──────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
  strum::VariantArray,
)]
pub enum Gender {
  Male,
  Female,
  Other,
}

// ─── Freelancer ──────────────────────────────────────────────────────────────

/// A persisted freelancer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Freelancer {
  pub id:              Uuid,
  pub name:            String,
  /// Trimmed and lower-cased; unique across the store.
  pub email:           String,
  pub country:         String,
  pub skill:           String,
  pub gender:          Gender,
  /// Stored and validated, but not used by any analytics formula.
  pub age:             u32,
  pub projects_worked: u32,
  pub rating:          f64,
  pub last_active:     DateTime<Utc>,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

impl Freelancer {
  /// Apply a partial update, returning the merged record.
  ///
  /// The merged record is re-validated as a whole; `self` is left untouched
  /// if validation fails.
  pub fn patched(&self, patch: FreelancerPatch, now: DateTime<Utc>) -> Result<Self> {
    let mut next = self.clone();
    if let Some(name) = patch.name {
      next.name = name.trim().to_owned();
    }
    if let Some(email) = patch.email {
      next.email = normalize_email(&email);
    }
    if let Some(country) = patch.country {
      next.country = country.trim().to_owned();
    }
    if let Some(skill) = patch.skill {
      next.skill = skill.trim().to_owned();
    }
    if let Some(gender) = patch.gender {
      next.gender = gender;
    }
    if let Some(age) = patch.age {
      next.age = age;
    }
    if let Some(projects_worked) = patch.projects_worked {
      next.projects_worked = projects_worked;
    }
    if let Some(rating) = patch.rating {
      next.rating = rating;
    }
    if let Some(last_active) = patch.last_active {
      next.last_active = last_active;
    }

    check_fields(&Fields {
      name:    &next.name,
      email:   &next.email,
      country: &next.country,
      skill:   &next.skill,
      age:     next.age,
      rating:  next.rating,
    })?;

    next.updated_at = now;
    Ok(next)
  }
}

// ─── NewFreelancer ───────────────────────────────────────────────────────────

fn default_rating() -> f64 { DEFAULT_RATING }

/// Input to [`crate::store::FreelancerStore::create`].
/// `id`, `created_at` and `updated_at` are always assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFreelancer {
  pub name:            String,
  pub email:           String,
  pub country:         String,
  pub skill:           String,
  pub gender:          Gender,
  pub age:             u32,
  #[serde(default)]
  pub projects_worked: u32,
  #[serde(default = "default_rating")]
  pub rating:          f64,
  /// Defaults to the creation instant when omitted.
  #[serde(default)]
  pub last_active:     Option<DateTime<Utc>>,
}

impl NewFreelancer {
  /// Normalize, validate, and stamp the input into a full record.
  pub fn into_freelancer(self, now: DateTime<Utc>) -> Result<Freelancer> {
    let freelancer = Freelancer {
      id:              Uuid::new_v4(),
      name:            self.name.trim().to_owned(),
      email:           normalize_email(&self.email),
      country:         self.country.trim().to_owned(),
      skill:           self.skill.trim().to_owned(),
      gender:          self.gender,
      age:             self.age,
      projects_worked: self.projects_worked,
      rating:          self.rating,
      last_active:     self.last_active.unwrap_or(now),
      created_at:      now,
      updated_at:      now,
    };

    check_fields(&Fields {
      name:    &freelancer.name,
      email:   &freelancer.email,
      country: &freelancer.country,
      skill:   &freelancer.skill,
      age:     freelancer.age,
      rating:  freelancer.rating,
    })?;

    Ok(freelancer)
  }
}

// ─── FreelancerPatch ─────────────────────────────────────────────────────────

/// A partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FreelancerPatch {
  pub name:            Option<String>,
  pub email:           Option<String>,
  pub country:         Option<String>,
  pub skill:           Option<String>,
  pub gender:          Option<Gender>,
  pub age:             Option<u32>,
  pub projects_worked: Option<u32>,
  pub rating:          Option<f64>,
  pub last_active:     Option<DateTime<Utc>>,
}

// ─── Validation ──────────────────────────────────────────────────────────────

pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

pub fn is_valid_email(email: &str) -> bool { EMAIL_PATTERN.is_match(email) }

struct Fields<'a> {
  name:    &'a str,
  email:   &'a str,
  country: &'a str,
  skill:   &'a str,
  age:     u32,
  rating:  f64,
}

/// Collect every rule violation rather than stopping at the first.
fn check_fields(f: &Fields<'_>) -> Result<()> {
  let mut problems = Vec::new();

  let name_len = f.name.chars().count();
  if name_len == 0 {
    problems.push("Name is required".to_owned());
  } else if name_len < NAME_MIN_CHARS {
    problems.push(format!("Name must be at least {NAME_MIN_CHARS} characters"));
  } else if name_len > NAME_MAX_CHARS {
    problems.push(format!("Name cannot exceed {NAME_MAX_CHARS} characters"));
  }

  if f.email.is_empty() {
    problems.push("Email is required".to_owned());
  } else if !is_valid_email(f.email) {
    problems.push("Please provide a valid email".to_owned());
  }

  if f.country.is_empty() {
    problems.push("Country is required".to_owned());
  }
  if f.skill.is_empty() {
    problems.push("Skill is required".to_owned());
  }

  if f.age < AGE_MIN {
    problems.push(format!("Age must be at least {AGE_MIN}"));
  } else if f.age > AGE_MAX {
    problems.push(format!("Age cannot exceed {AGE_MAX}"));
  }

  // Written so that NaN fails too.
  if !(RATING_MIN..=RATING_MAX).contains(&f.rating) {
    problems.push(format!("Rating must be between {RATING_MIN} and {RATING_MAX}"));
  }

  if problems.is_empty() {
    Ok(())
  } else {
    Err(Error::Validation(problems))
  }
}
