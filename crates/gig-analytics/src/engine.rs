//! Per-record and set-wide metrics.
//!
//! The performance index blends three normalized terms:
//!
//! ```text
//! 0.6 · rating/5  +  0.3 · 1/(1 + daysInactive)  +  0.1 · projects/maxProjectsInSet
//! ```
//!
//! `maxProjectsInSet` is the maximum over the snapshot being analyzed, so
//! callers compute it once per pass with [`max_projects`] and pass it down.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use gig_core::freelancer::{Freelancer, RATING_MAX};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Policy constants ────────────────────────────────────────────────────────

/// A freelancer is active while `days_inactive` is at most this many days.
pub const ACTIVE_THRESHOLD_DAYS: u64 = 90;

pub const RATING_WEIGHT: f64 = 0.6;
pub const RECENCY_WEIGHT: f64 = 0.3;
pub const PROJECTS_WEIGHT: f64 = 0.1;

/// Default length of a top-performers list.
pub const DEFAULT_TOP_LIMIT: usize = 10;

/// Default number of skills kept per country by [`top_skills_by_country`].
pub const DEFAULT_TOP_SKILLS: usize = 3;

pub const EXCELLENT_FROM: f64 = 0.8;
pub const GOOD_FROM: f64 = 0.6;
pub const AVERAGE_FROM: f64 = 0.4;

const MILLIS_PER_DAY: u64 = 86_400_000;

// ─── Rounding ────────────────────────────────────────────────────────────────

/// Round half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
  let factor = 10f64.powi(places);
  (value * factor).round() / factor
}

// ─── Recency ─────────────────────────────────────────────────────────────────

/// Whole days between `last_active` and `now`, rounded up.
///
/// Uses the absolute difference, so a `last_active` in the future still
/// yields a non-negative count.
pub fn days_inactive(last_active: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
  (now - last_active)
    .num_milliseconds()
    .unsigned_abs()
    .div_ceil(MILLIS_PER_DAY)
}

pub fn is_active(last_active: DateTime<Utc>, now: DateTime<Utc>) -> bool {
  days_inactive(last_active, now) <= ACTIVE_THRESHOLD_DAYS
}

// ─── Performance index ───────────────────────────────────────────────────────

pub fn normalized_rating(rating: f64) -> f64 { rating / RATING_MAX }

pub fn recency_score(days_inactive: u64) -> f64 { 1.0 / (1.0 + days_inactive as f64) }

/// `projects / max_projects`, or 0 when the set maximum is 0.
pub fn normalized_projects(projects: u32, max_projects: u32) -> f64 {
  if max_projects == 0 {
    0.0
  } else {
    f64::from(projects) / f64::from(max_projects)
  }
}

/// The weighted index from its raw inputs, rounded to 4 decimal places.
///
/// Not clamped: inputs inside the validated ranges keep it within `[0, 1]`.
pub fn weighted_index(
  rating: f64,
  days_inactive: u64,
  projects: u32,
  max_projects: u32,
) -> f64 {
  let index = RATING_WEIGHT * normalized_rating(rating)
    + RECENCY_WEIGHT * recency_score(days_inactive)
    + PROJECTS_WEIGHT * normalized_projects(projects, max_projects);
  round_to(index, 4)
}

pub fn performance_index(
  record: &Freelancer,
  max_projects: u32,
  now: DateTime<Utc>,
) -> f64 {
  weighted_index(
    record.rating,
    days_inactive(record.last_active, now),
    record.projects_worked,
    max_projects,
  )
}

/// The largest `projects_worked` in `records`, or 0 for an empty set.
pub fn max_projects(records: &[Freelancer]) -> u32 {
  records.iter().map(|f| f.projects_worked).max().unwrap_or(0)
}

// ─── Tiers ───────────────────────────────────────────────────────────────────

/// Coarse band of a performance index, used for dashboard badges.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "camelCase")]
pub enum PerformanceTier {
  Excellent,
  Good,
  Average,
  #[strum(serialize = "Needs Improvement")]
  NeedsImprovement,
}

impl PerformanceTier {
  pub fn for_index(index: f64) -> Self {
    if index >= EXCELLENT_FROM {
      Self::Excellent
    } else if index >= GOOD_FROM {
      Self::Good
    } else if index >= AVERAGE_FROM {
      Self::Average
    } else {
      Self::NeedsImprovement
    }
  }
}

// ─── Scoring ─────────────────────────────────────────────────────────────────

/// A record scored against its snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceEntry {
  pub id:                Uuid,
  pub name:              String,
  pub country:           String,
  pub skill:             String,
  pub rating:            f64,
  pub projects_worked:   u32,
  pub last_active:       DateTime<Utc>,
  pub days_inactive:     u64,
  pub is_active:         bool,
  pub performance_index: f64,
  pub tier:              PerformanceTier,
}

/// Score every record in input order, normalizing projects against the
/// maximum of `records`.
pub fn score_all(records: &[Freelancer], now: DateTime<Utc>) -> Vec<PerformanceEntry> {
  let max = max_projects(records);
  records
    .iter()
    .map(|f| {
      let days = days_inactive(f.last_active, now);
      let index = weighted_index(f.rating, days, f.projects_worked, max);
      PerformanceEntry {
        id:                f.id,
        name:              f.name.clone(),
        country:           f.country.clone(),
        skill:             f.skill.clone(),
        rating:            f.rating,
        projects_worked:   f.projects_worked,
        last_active:       f.last_active,
        days_inactive:     days,
        is_active:         days <= ACTIVE_THRESHOLD_DAYS,
        performance_index: index,
        tier:              PerformanceTier::for_index(index),
      }
    })
    .collect()
}

/// Sort descending by index. The sort is stable, so equal scores keep
/// their relative order.
pub fn rank(entries: &mut [PerformanceEntry]) {
  entries.sort_by(|a, b| b.performance_index.total_cmp(&a.performance_index));
}

/// The `limit` highest-scoring records.
pub fn top_performers(
  records: &[Freelancer],
  now: DateTime<Utc>,
  limit: usize,
) -> Vec<PerformanceEntry> {
  let mut entries = score_all(records, now);
  rank(&mut entries);
  entries.truncate(limit);
  entries
}

/// Records inactive for more than [`ACTIVE_THRESHOLD_DAYS`], in input order.
pub fn inactive_freelancers(
  records: &[Freelancer],
  now: DateTime<Utc>,
) -> Vec<&Freelancer> {
  records
    .iter()
    .filter(|f| !is_active(f.last_active, now))
    .collect()
}

// ─── Activity ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
  pub total:               usize,
  pub active:              usize,
  pub inactive:            usize,
  /// Rounded to 2 decimal places; 0 for an empty set.
  pub active_percentage:   f64,
  pub inactive_percentage: f64,
}

pub fn activity_summary(records: &[Freelancer], now: DateTime<Utc>) -> ActivitySummary {
  let total = records.len();
  if total == 0 {
    return ActivitySummary::default();
  }

  let active = records.iter().filter(|f| is_active(f.last_active, now)).count();
  let inactive = total - active;
  let percent = |n: usize| round_to(n as f64 / total as f64 * 100.0, 2);

  ActivitySummary {
    total,
    active,
    inactive,
    active_percentage: percent(active),
    inactive_percentage: percent(inactive),
  }
}

// ─── Distribution ────────────────────────────────────────────────────────────

/// country → skill → number of records. Ordered maps keep output stable.
pub type SkillDistribution = BTreeMap<String, BTreeMap<String, usize>>;

pub fn skill_distribution_by_country(records: &[Freelancer]) -> SkillDistribution {
  let mut distribution = SkillDistribution::new();
  for f in records {
    *distribution
      .entry(f.country.clone())
      .or_default()
      .entry(f.skill.clone())
      .or_default() += 1;
  }
  distribution
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCount {
  pub skill: String,
  pub count: usize,
}

/// For each country, its `n` most common skills (ties broken by name).
pub fn top_skills_by_country(
  distribution: &SkillDistribution,
  n: usize,
) -> BTreeMap<String, Vec<SkillCount>> {
  distribution
    .iter()
    .map(|(country, skills)| {
      let mut ranked: Vec<SkillCount> = skills
        .iter()
        .map(|(skill, &count)| SkillCount { skill: skill.clone(), count })
        .collect();
      // BTreeMap iteration is already name-ordered; a stable sort keeps that
      // as the tiebreak.
      ranked.sort_by(|a, b| b.count.cmp(&a.count));
      ranked.truncate(n);
      (country.clone(), ranked)
    })
    .collect()
}

// ─── Aggregate stats ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStats {
  /// Rounded to 4 decimal places.
  pub average_performance_index: f64,
  /// Rounded to 2 decimal places.
  pub average_rating:            f64,
  /// Rounded to the nearest whole project.
  pub average_projects:          u32,
}

pub fn performance_stats(entries: &[PerformanceEntry]) -> PerformanceStats {
  if entries.is_empty() {
    return PerformanceStats::default();
  }
  let n = entries.len() as f64;
  let sum_index: f64 = entries.iter().map(|e| e.performance_index).sum();
  let sum_rating: f64 = entries.iter().map(|e| e.rating).sum();
  let sum_projects: f64 = entries.iter().map(|e| f64::from(e.projects_worked)).sum();

  PerformanceStats {
    average_performance_index: round_to(sum_index / n, 4),
    average_rating:            round_to(sum_rating / n, 2),
    average_projects:          (sum_projects / n).round() as u32,
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone};
  use gig_core::freelancer::Gender;

  use super::*;

  fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap() }

  fn freelancer(
    name: &str,
    rating: f64,
    projects: u32,
    days_ago: i64,
  ) -> Freelancer {
    Freelancer {
      id:              Uuid::new_v4(),
      name:            name.into(),
      email:           format!("{}@example.com", name.to_lowercase()),
      country:         "Canada".into(),
      skill:           "DevOps".into(),
      gender:          Gender::Other,
      age:             30,
      projects_worked: projects,
      rating,
      last_active:     now() - Duration::days(days_ago),
      created_at:      now(),
      updated_at:      now(),
    }
  }

  fn located(name: &str, country: &str, skill: &str) -> Freelancer {
    Freelancer {
      country: country.into(),
      skill: skill.into(),
      ..freelancer(name, 3.0, 1, 1)
    }
  }

  // ── days_inactive / is_active ────────────────────────────────────────────

  #[test]
  fn same_instant_is_zero_days() {
    assert_eq!(days_inactive(now(), now()), 0);
  }

  #[test]
  fn partial_days_round_up() {
    assert_eq!(days_inactive(now() - Duration::milliseconds(1), now()), 1);
    assert_eq!(days_inactive(now() - Duration::hours(36), now()), 2);
    assert_eq!(days_inactive(now() - Duration::days(10), now()), 10);
  }

  #[test]
  fn future_last_active_is_non_negative() {
    assert_eq!(days_inactive(now() + Duration::hours(5), now()), 1);
  }

  #[test]
  fn activity_boundary_is_inclusive_at_ninety_days() {
    assert!(is_active(now() - Duration::days(90), now()));
    let just_over = now() - Duration::days(90) - Duration::seconds(1);
    assert_eq!(days_inactive(just_over, now()), 91);
    assert!(!is_active(just_over, now()));
  }

  #[test]
  fn is_active_agrees_with_threshold() {
    for hours in (0..24 * 200).step_by(7) {
      let at = now() - Duration::hours(hours);
      assert_eq!(
        is_active(at, now()),
        days_inactive(at, now()) <= ACTIVE_THRESHOLD_DAYS,
      );
    }
  }

  // ── performance index ────────────────────────────────────────────────────

  #[test]
  fn perfect_record_scores_one() {
    let f = freelancer("Max", 5.0, 100, 0);
    assert_eq!(performance_index(&f, 100, now()), 1.0);
  }

  #[test]
  fn stale_low_rated_record() {
    let f = freelancer("Low", 1.0, 0, 365);
    assert_eq!(performance_index(&f, 100, now()), 0.1208);
  }

  #[test]
  fn zero_max_projects_drops_the_projects_term() {
    let f = freelancer("Zed", 5.0, 0, 0);
    assert_eq!(performance_index(&f, 0, now()), 0.9);
    assert_eq!(normalized_projects(7, 0), 0.0);
  }

  #[test]
  fn index_is_monotonic_in_each_input() {
    let ratings = [1.0, 1.5, 2.0, 3.3, 4.0, 4.9, 5.0];
    for pair in ratings.windows(2) {
      assert!(weighted_index(pair[0], 10, 5, 50) <= weighted_index(pair[1], 10, 5, 50));
    }
    for projects in 0..50 {
      assert!(
        weighted_index(3.0, 10, projects, 50) <= weighted_index(3.0, 10, projects + 1, 50)
      );
    }
    for days in 0..400 {
      assert!(weighted_index(3.0, days + 1, 5, 50) <= weighted_index(3.0, days, 5, 50));
    }
  }

  #[test]
  fn rounding_is_half_away_from_zero() {
    assert_eq!(round_to(0.125, 2), 0.13);
    assert_eq!(round_to(-2.5, 0), -3.0);
    assert_eq!(round_to(33.333_333, 2), 33.33);
    assert_eq!(round_to(66.666_666, 2), 66.67);
  }

  #[test]
  fn tiers() {
    assert_eq!(PerformanceTier::for_index(0.8), PerformanceTier::Excellent);
    assert_eq!(PerformanceTier::for_index(0.7999), PerformanceTier::Good);
    assert_eq!(PerformanceTier::for_index(0.4), PerformanceTier::Average);
    assert_eq!(PerformanceTier::for_index(0.1), PerformanceTier::NeedsImprovement);
    assert_eq!(PerformanceTier::NeedsImprovement.to_string(), "Needs Improvement");
  }

  // ── activity summary ─────────────────────────────────────────────────────

  #[test]
  fn empty_summary_is_all_zero() {
    assert_eq!(activity_summary(&[], now()), ActivitySummary::default());
  }

  #[test]
  fn ten_and_two_hundred_days_split_evenly() {
    let records = [freelancer("Ann", 3.0, 1, 10), freelancer("Ben", 3.0, 1, 200)];
    let summary = activity_summary(&records, now());
    assert_eq!(summary, ActivitySummary {
      total:               2,
      active:              1,
      inactive:            1,
      active_percentage:   50.0,
      inactive_percentage: 50.0,
    });
  }

  #[test]
  fn counts_and_percentages_add_up() {
    for n in 1..12_i64 {
      let records: Vec<_> = (0..n)
        .map(|i| freelancer(&format!("F{i}"), 3.0, 1, i * 37))
        .collect();
      let s = activity_summary(&records, now());
      assert_eq!(s.active + s.inactive, s.total);
      assert!((s.active_percentage + s.inactive_percentage - 100.0).abs() <= 0.01);
    }
  }

  // ── ranking ──────────────────────────────────────────────────────────────

  #[test]
  fn top_performers_is_a_sorted_prefix() {
    let records: Vec<_> = (0..15)
      .map(|i| freelancer(&format!("F{i}"), 1.0 + (i % 5) as f64, i * 3, i64::from(i) * 11))
      .collect();
    let top = top_performers(&records, now(), DEFAULT_TOP_LIMIT);

    assert_eq!(top.len(), 10);
    assert!(top.windows(2).all(|w| w[0].performance_index >= w[1].performance_index));
    assert!(top.iter().all(|e| records.iter().any(|f| f.id == e.id)));

    let short = top_performers(&records[..4], now(), DEFAULT_TOP_LIMIT);
    assert_eq!(short.len(), 4);
  }

  #[test]
  fn ranking_ties_keep_input_order() {
    let records = [
      freelancer("First", 4.0, 10, 5),
      freelancer("Better", 5.0, 10, 5),
      freelancer("Second", 4.0, 10, 5),
    ];
    let names: Vec<_> = top_performers(&records, now(), 3)
      .into_iter()
      .map(|e| e.name)
      .collect();
    assert_eq!(names, ["Better", "First", "Second"]);
  }

  #[test]
  fn scoring_uses_the_set_maximum() {
    let records = [freelancer("Few", 3.0, 10, 0), freelancer("Many", 3.0, 40, 0)];
    let entries = score_all(&records, now());
    // 0.36 + 0.3 + 0.1 * 10/40
    assert_eq!(entries[0].performance_index, 0.685);
    assert_eq!(entries[1].performance_index, 0.76);
    assert_eq!(max_projects(&[]), 0);
  }

  #[test]
  fn inactive_filter_keeps_only_stale_records() {
    let records = [
      freelancer("Fresh", 3.0, 1, 3),
      freelancer("Stale", 3.0, 1, 120),
      freelancer("Edge", 3.0, 1, 90),
    ];
    let inactive = inactive_freelancers(&records, now());
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].name, "Stale");
  }

  // ── distribution ─────────────────────────────────────────────────────────

  #[test]
  fn distribution_groups_by_country_then_skill() {
    let records = [
      located("A", "India", "Web Development"),
      located("B", "India", "Web Development"),
      located("C", "India", "Animation"),
      located("D", "Brazil", "DevOps"),
    ];
    let d = skill_distribution_by_country(&records);
    assert_eq!(d.len(), 2);
    assert_eq!(d["India"]["Web Development"], 2);
    assert_eq!(d["India"]["Animation"], 1);
    assert_eq!(d["Brazil"]["DevOps"], 1);
    assert_eq!(d, skill_distribution_by_country(&records));
    assert!(skill_distribution_by_country(&[]).is_empty());
  }

  #[test]
  fn top_skills_sorted_by_count_then_name() {
    let records = [
      located("A", "Spain", "SEO Marketing"),
      located("B", "Spain", "Animation"),
      located("C", "Spain", "DevOps"),
      located("D", "Spain", "DevOps"),
      located("E", "Spain", "Copywriting"),
    ];
    let top = top_skills_by_country(&skill_distribution_by_country(&records), 3);
    let spain: Vec<_> = top["Spain"].iter().map(|s| s.skill.as_str()).collect();
    assert_eq!(spain, ["DevOps", "Animation", "Copywriting"]);
  }

  #[test]
  fn stats_average_the_entries() {
    let records = [freelancer("A", 4.0, 10, 0), freelancer("B", 2.5, 21, 0)];
    let stats = performance_stats(&score_all(&records, now()));
    assert_eq!(stats.average_rating, 3.25);
    assert_eq!(stats.average_projects, 16);
    assert_eq!(performance_stats(&[]), PerformanceStats::default());
  }
}
