//! Engagement analytics for the gig freelancer roster.
//!
//! Pure synchronous functions over immutable record snapshots; no HTTP,
//! database, or clock dependencies. Every function that depends on elapsed
//! time takes an explicit `now`, so a report evaluates all records against
//! the same instant and is reproducible in tests.
//!
//! # Quick start
//!
//! ```no_run
//! use chrono::Utc;
//! use gig_analytics::AnalyticsReport;
//!
//! let records = Vec::new();
//! let report = AnalyticsReport::build(&records, Utc::now());
//! assert_eq!(report.activity_summary.total, 0);
//! ```

pub mod engine;
pub mod report;

pub use engine::{
  ACTIVE_THRESHOLD_DAYS, ActivitySummary, DEFAULT_TOP_LIMIT, PerformanceEntry,
  PerformanceTier, SkillDistribution, activity_summary, days_inactive,
  inactive_freelancers, is_active, max_projects, performance_index,
  skill_distribution_by_country, top_performers,
};
pub use report::{AnalyticsReport, AnnotatedFreelancer, InactiveEntry};
