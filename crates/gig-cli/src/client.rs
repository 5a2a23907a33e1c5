//! Async HTTP client wrapping the gig JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use gig_analytics::{AnalyticsReport, AnnotatedFreelancer};
use gig_core::store::Page;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Records per page on the Freelancers tab.
pub const PAGE_SIZE: usize = 100;

/// Connection settings for the gig API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Server-side filters for `GET /freelancers`; `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
  pub country: Option<String>,
  pub skill:   Option<String>,
  pub active:  Option<bool>,
}

impl ListFilter {
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  /// Query-string pairs for the set filters plus paging.
  pub fn query(&self, page: usize) -> Vec<(&'static str, String)> {
    let mut pairs = vec![("page", page.to_string()), ("limit", PAGE_SIZE.to_string())];
    if let Some(country) = &self.country {
      pairs.push(("country", country.clone()));
    }
    if let Some(skill) = &self.skill {
      pairs.push(("skill", skill.clone()));
    }
    if let Some(active) = self.active {
      pairs.push(("active", active.to_string()));
    }
    pairs
  }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReactivateRequest<'a> {
  freelancer_ids: &'a [Uuid],
}

/// The part of the reactivation response the dashboard shows.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactivateOutcome {
  pub emails_sent: usize,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

/// Async HTTP client for the gig JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  /// Pass successful responses through; turn failures into an error carrying
  /// the server's `{"error": …}` message when there is one.
  async fn checked(resp: Response, what: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    match resp.json::<ErrorBody>().await {
      Ok(body) => Err(anyhow!("{what} → {status}: {}", body.error)),
      Err(_) => Err(anyhow!("{what} → {status}")),
    }
  }

  /// `GET /api/freelancers/analytics`
  pub async fn analytics(&self) -> Result<AnalyticsReport> {
    let resp = self
      .client
      .get(self.url("/freelancers/analytics"))
      .send()
      .await
      .context("GET /freelancers/analytics failed")?;

    Self::checked(resp, "GET /freelancers/analytics")
      .await?
      .json()
      .await
      .context("deserialising analytics report")
  }

  /// `GET /api/freelancers?page=…&limit=…[&country=…][&skill=…][&active=…]`
  pub async fn freelancers(
    &self,
    filter: &ListFilter,
    page: usize,
  ) -> Result<Page<AnnotatedFreelancer>> {
    let resp = self
      .client
      .get(self.url("/freelancers"))
      .query(&filter.query(page))
      .send()
      .await
      .context("GET /freelancers failed")?;

    Self::checked(resp, "GET /freelancers")
      .await?
      .json()
      .await
      .context("deserialising freelancers")
  }

  /// `GET /api/freelancers/filters/countries`
  pub async fn countries(&self) -> Result<Vec<String>> {
    self.filter_values("/freelancers/filters/countries").await
  }

  /// `GET /api/freelancers/filters/skills`
  pub async fn skills(&self) -> Result<Vec<String>> {
    self.filter_values("/freelancers/filters/skills").await
  }

  async fn filter_values(&self, path: &str) -> Result<Vec<String>> {
    let resp = self
      .client
      .get(self.url(path))
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;

    Self::checked(resp, &format!("GET {path}"))
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising {path}"))
  }

  /// `POST /api/freelancers/reactivate`
  pub async fn reactivate(&self, ids: &[Uuid]) -> Result<ReactivateOutcome> {
    let resp = self
      .client
      .post(self.url("/freelancers/reactivate"))
      .json(&ReactivateRequest { freelancer_ids: ids })
      .send()
      .await
      .context("POST /freelancers/reactivate failed")?;

    Self::checked(resp, "POST /freelancers/reactivate")
      .await?
      .json()
      .await
      .context("deserialising reactivation result")
  }
}
