//! Report views assembled from a full record snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use gig_core::freelancer::Freelancer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{
  self, ActivitySummary, DEFAULT_TOP_LIMIT, DEFAULT_TOP_SKILLS, PerformanceEntry,
  PerformanceStats, SkillCount, SkillDistribution,
};

// ─── Annotated records ───────────────────────────────────────────────────────

/// A stored record plus the quantities derived from it at `now`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedFreelancer {
  #[serde(flatten)]
  pub freelancer:        Freelancer,
  pub days_inactive:     u64,
  pub is_active:         bool,
  /// Only present when a set-wide maximum was available.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub performance_index: Option<f64>,
}

impl AnnotatedFreelancer {
  pub fn new(freelancer: Freelancer, now: DateTime<Utc>) -> Self {
    let days_inactive = engine::days_inactive(freelancer.last_active, now);
    Self {
      freelancer,
      days_inactive,
      is_active: days_inactive <= engine::ACTIVE_THRESHOLD_DAYS,
      performance_index: None,
    }
  }

  /// Also score the record against `max_projects` of its snapshot.
  pub fn scored(freelancer: Freelancer, max_projects: u32, now: DateTime<Utc>) -> Self {
    let index = engine::performance_index(&freelancer, max_projects, now);
    Self {
      performance_index: Some(index),
      ..Self::new(freelancer, now)
    }
  }
}

/// An inactive record, as listed for re-engagement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InactiveEntry {
  pub id:            Uuid,
  pub name:          String,
  pub email:         String,
  pub country:       String,
  pub skill:         String,
  pub last_active:   DateTime<Utc>,
  pub days_inactive: u64,
}

// ─── AnalyticsReport ─────────────────────────────────────────────────────────

/// Every dashboard view over one snapshot, evaluated at `generated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
  pub generated_at:          DateTime<Utc>,
  pub activity_summary:      ActivitySummary,
  pub skill_distribution:    SkillDistribution,
  /// Every record, highest index first.
  pub performance_metrics:   Vec<PerformanceEntry>,
  pub inactive_freelancers:  Vec<InactiveEntry>,
  /// The first [`DEFAULT_TOP_LIMIT`] entries of `performance_metrics`.
  pub top_performers:        Vec<PerformanceEntry>,
  pub performance_stats:     PerformanceStats,
  pub top_skills_by_country: BTreeMap<String, Vec<SkillCount>>,
}

impl AnalyticsReport {
  /// Build all views from `records`, evaluating every record against the
  /// same `now`. An empty snapshot yields zeroed and empty views.
  pub fn build(records: &[Freelancer], now: DateTime<Utc>) -> Self {
    let skill_distribution = engine::skill_distribution_by_country(records);
    let top_skills_by_country =
      engine::top_skills_by_country(&skill_distribution, DEFAULT_TOP_SKILLS);

    let mut performance_metrics = engine::score_all(records, now);
    engine::rank(&mut performance_metrics);
    let top_performers = performance_metrics
      .iter()
      .take(DEFAULT_TOP_LIMIT)
      .cloned()
      .collect();

    let inactive_freelancers = engine::inactive_freelancers(records, now)
      .into_iter()
      .map(|f| InactiveEntry {
        id:            f.id,
        name:          f.name.clone(),
        email:         f.email.clone(),
        country:       f.country.clone(),
        skill:         f.skill.clone(),
        last_active:   f.last_active,
        days_inactive: engine::days_inactive(f.last_active, now),
      })
      .collect();

    Self {
      generated_at: now,
      activity_summary: engine::activity_summary(records, now),
      skill_distribution,
      performance_stats: engine::performance_stats(&performance_metrics),
      performance_metrics,
      inactive_freelancers,
      top_performers,
      top_skills_by_country,
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone};
  use gig_core::freelancer::Gender;

  use super::*;

  fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap() }

  fn record(name: &str, country: &str, rating: f64, projects: u32, days_ago: i64) -> Freelancer {
    Freelancer {
      id:              Uuid::new_v4(),
      name:            name.into(),
      email:           format!("{}@example.com", name.to_lowercase()),
      country:         country.into(),
      skill:           "Web Development".into(),
      gender:          Gender::Male,
      age:             40,
      projects_worked: projects,
      rating,
      last_active:     now() - Duration::days(days_ago),
      created_at:      now(),
      updated_at:      now(),
    }
  }

  fn roster() -> Vec<Freelancer> {
    (0..14)
      .map(|i| {
        record(
          &format!("Person{i}"),
          if i % 2 == 0 { "Germany" } else { "Mexico" },
          1.0 + f64::from(i % 5),
          i * 7,
          i64::from(i) * 17,
        )
      })
      .collect()
  }

  #[test]
  fn empty_snapshot_degrades_gracefully() {
    let report = AnalyticsReport::build(&[], now());
    assert_eq!(report.activity_summary, ActivitySummary::default());
    assert!(report.skill_distribution.is_empty());
    assert!(report.performance_metrics.is_empty());
    assert!(report.inactive_freelancers.is_empty());
    assert!(report.top_performers.is_empty());
    assert!(report.top_skills_by_country.is_empty());
  }

  #[test]
  fn performance_views_are_ranked_and_consistent() {
    let records = roster();
    let report = AnalyticsReport::build(&records, now());

    assert_eq!(report.performance_metrics.len(), records.len());
    assert!(
      report
        .performance_metrics
        .windows(2)
        .all(|w| w[0].performance_index >= w[1].performance_index)
    );
    assert_eq!(report.top_performers.len(), DEFAULT_TOP_LIMIT);
    assert_eq!(report.top_performers[..], report.performance_metrics[..DEFAULT_TOP_LIMIT]);
  }

  #[test]
  fn inactive_entries_carry_their_day_count() {
    let report = AnalyticsReport::build(&roster(), now());
    // days_ago = 17 * i; inactive once that exceeds 90, i.e. i >= 6.
    assert_eq!(report.inactive_freelancers.len(), 8);
    assert_eq!(report.activity_summary.inactive, 8);
    assert!(report.inactive_freelancers.iter().all(|e| e.days_inactive > 90));
    assert_eq!(report.inactive_freelancers[0].name, "Person6");
    assert_eq!(report.inactive_freelancers[0].days_inactive, 102);
  }

  #[test]
  fn building_twice_is_identical() {
    let records = roster();
    assert_eq!(
      AnalyticsReport::build(&records, now()),
      AnalyticsReport::build(&records, now())
    );
  }

  #[test]
  fn wire_shape_uses_camel_case() {
    let report = AnalyticsReport::build(&roster(), now());
    let v = serde_json::to_value(&report).unwrap();
    assert_eq!(v["activitySummary"]["total"], 14);
    assert!(v["activitySummary"].get("activePercentage").is_some());
    assert_eq!(v["skillDistribution"]["Germany"]["Web Development"], 7);
    assert!(v["performanceMetrics"][0].get("performanceIndex").is_some());
    assert!(v["inactiveFreelancers"][0].get("daysInactive").is_some());
    assert_eq!(v["topPerformers"].as_array().unwrap().len(), 10);
  }

  #[test]
  fn annotation_flattens_the_record() {
    let f = record("Solo", "Norway", 5.0, 100, 0);
    let annotated = AnnotatedFreelancer::scored(f.clone(), 100, now());
    assert_eq!(annotated.performance_index, Some(1.0));
    assert!(annotated.is_active);

    let v = serde_json::to_value(AnnotatedFreelancer::new(f, now())).unwrap();
    assert_eq!(v["name"], "Solo");
    assert_eq!(v["daysInactive"], 0);
    assert!(v.get("performanceIndex").is_none());
  }
}
