//! Demo roster generation for `gig-server seed`.
//!
//! Roughly [`ACTIVE_SHARE`] of the generated records were active within the
//! last 90 days; the rest fall anywhere within the last year.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use gig_analytics::{ActivitySummary, activity_summary};
use gig_core::{
  freelancer::{Freelancer, Gender, NewFreelancer},
  store::{FreelancerQuery, FreelancerStore},
};
use rand::Rng;
use strum::VariantArray as _;

pub const DEFAULT_COUNT: usize = 50;
pub const ACTIVE_SHARE: f64 = 0.3;
const RECENT_WINDOW_DAYS: i64 = 90;
const FULL_WINDOW_DAYS: i64 = 365;

pub const COUNTRIES: [&str; 20] = [
  "United States", "United Kingdom", "Canada", "Australia", "Germany",
  "France", "India", "Pakistan", "Bangladesh", "Philippines",
  "Ukraine", "Poland", "Brazil", "Mexico", "Spain",
  "Italy", "Netherlands", "Sweden", "Norway", "Denmark",
];

pub const SKILLS: [&str; 15] = [
  "Web Development", "Mobile Development", "UI/UX Design", "Graphic Design",
  "Content Writing", "SEO Marketing", "Data Analysis", "Machine Learning",
  "DevOps", "Project Management", "Video Editing", "Animation",
  "Copywriting", "Digital Marketing", "Cloud Architecture",
];

const FIRST_NAMES: [&str; 16] = [
  "Amara", "Bilal", "Chloe", "Diego", "Elif", "Farah", "Goran", "Hana",
  "Ivan", "Julia", "Kwame", "Lena", "Mateo", "Nadia", "Oskar", "Priya",
];

const LAST_NAMES: [&str; 16] = [
  "Ahmed", "Bauer", "Costa", "Dubois", "Eriksen", "Fischer", "Garcia", "Haddad",
  "Ivanova", "Jensen", "Khan", "Lopez", "Moreau", "Nowak", "Okafor", "Rossi",
];

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
  items[rng.random_range(0..items.len())]
}

/// Generate `count` valid, uniquely-addressed freelancers relative to `now`.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, count: usize, now: DateTime<Utc>) -> Vec<NewFreelancer> {
  (0..count)
    .map(|i| {
      let first = pick(rng, &FIRST_NAMES);
      let last = pick(rng, &LAST_NAMES);
      let window = if rng.random_bool(ACTIVE_SHARE) {
        RECENT_WINDOW_DAYS
      } else {
        FULL_WINDOW_DAYS
      };

      NewFreelancer {
        name:            format!("{first} {last}"),
        email:           format!("{first}.{last}{i}@example.com").to_lowercase(),
        country:         pick(rng, &COUNTRIES).to_owned(),
        skill:           pick(rng, &SKILLS).to_owned(),
        gender:          Gender::VARIANTS[rng.random_range(0..Gender::VARIANTS.len())],
        age:             rng.random_range(22..=55),
        projects_worked: rng.random_range(0..=100),
        rating:          f64::from(rng.random_range(10..=50_u8)) / 10.0,
        last_active:     Some(now - Duration::days(rng.random_range(0..window))),
      }
    })
    .collect()
}

// ─── Store seeding ────────────────────────────────────────────────────────────

/// What a seed run did, for logging.
#[derive(Debug, Clone)]
pub struct SeedSummary {
  pub removed:       usize,
  pub inserted:      usize,
  pub activity:      ActivitySummary,
  pub top_countries: Vec<(String, usize)>,
  pub top_skills:    Vec<(String, usize)>,
}

const SUMMARY_TOP: usize = 5;

/// Most common values of `key`, by count and then name.
fn top_counts<'a>(
  records: &'a [Freelancer],
  key: impl Fn(&'a Freelancer) -> &'a str,
  n: usize,
) -> Vec<(String, usize)> {
  let mut counts: HashMap<&str, usize> = HashMap::new();
  for f in records {
    *counts.entry(key(f)).or_default() += 1;
  }
  let mut sorted: Vec<(String, usize)> = counts.into_iter().map(|(k, v)| (k.to_owned(), v)).collect();
  sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
  sorted.truncate(n);
  sorted
}

/// Replace the store's contents with `records`.
pub async fn reseed<S: FreelancerStore>(
  store: &S,
  records: Vec<NewFreelancer>,
) -> Result<SeedSummary, S::Error> {
  let removed = store.delete_all().await?;
  tracing::info!(removed, "cleared existing freelancers");

  let mut inserted = 0;
  for record in records {
    store.create(record).await?;
    inserted += 1;
  }

  let all = store.list(&FreelancerQuery::default()).await?;
  Ok(SeedSummary {
    removed,
    inserted,
    activity: activity_summary(&all, Utc::now()),
    top_countries: top_counts(&all, |f| f.country.as_str(), SUMMARY_TOP),
    top_skills: top_counts(&all, |f| f.skill.as_str(), SUMMARY_TOP),
  })
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use chrono::TimeZone;
  use gig_store_sqlite::SqliteStore;
  use rand::{SeedableRng, rngs::StdRng};

  use super::*;

  fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap() }

  #[test]
  fn same_seed_same_roster() {
    let a = generate(&mut StdRng::seed_from_u64(7), 20, now());
    let b = generate(&mut StdRng::seed_from_u64(7), 20, now());
    let emails = |v: &[NewFreelancer]| v.iter().map(|f| f.email.clone()).collect::<Vec<_>>();
    assert_eq!(emails(&a), emails(&b));
  }

  #[test]
  fn generated_records_are_valid_and_in_range() {
    let records = generate(&mut StdRng::seed_from_u64(42), 200, now());
    let emails: HashSet<_> = records.iter().map(|f| f.email.clone()).collect();
    assert_eq!(emails.len(), 200);

    for r in records {
      assert!((22..=55).contains(&r.age));
      assert!(r.projects_worked <= 100);
      assert!((1.0..=5.0).contains(&r.rating));
      let days = (now() - r.last_active.unwrap()).num_days();
      assert!((0..FULL_WINDOW_DAYS).contains(&days));
      assert!(r.into_freelancer(now()).is_ok());
    }
  }

  #[test]
  fn top_counts_orders_by_count_then_name() {
    let records: Vec<Freelancer> = generate(&mut StdRng::seed_from_u64(1), 3, now())
      .into_iter()
      .zip(["Spain", "Chile", "Spain"])
      .map(|(mut r, country)| {
        r.country = country.to_owned();
        r.into_freelancer(now()).unwrap()
      })
      .collect();
    assert_eq!(
      top_counts(&records, |f| f.country.as_str(), 5),
      vec![("Spain".to_owned(), 2), ("Chile".to_owned(), 1)]
    );
  }

  #[tokio::test]
  async fn reseed_replaces_existing_records() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    reseed(&store, generate(&mut StdRng::seed_from_u64(3), 10, now())).await.unwrap();

    let summary = reseed(&store, generate(&mut StdRng::seed_from_u64(4), 25, now()))
      .await
      .unwrap();
    assert_eq!(summary.removed, 10);
    assert_eq!(summary.inserted, 25);
    assert_eq!(summary.activity.total, 25);
    assert!(summary.top_countries.len() <= SUMMARY_TOP);
    assert_eq!(store.count(&FreelancerQuery::default()).await.unwrap(), 25);
  }
}
