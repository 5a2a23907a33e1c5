//! Application state machine and event dispatcher.

use std::{collections::HashSet, sync::Arc};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use gig_analytics::{AnalyticsReport, AnnotatedFreelancer, InactiveEntry, engine::SkillCount};
use gig_core::store::Page;
use uuid::Uuid;

use crate::client::{ApiClient, ListFilter};

// ─── Tab ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
  Overview,
  Performance,
  Skills,
  Freelancers,
}

impl Tab {
  pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Performance, Tab::Skills, Tab::Freelancers];

  pub fn title(self) -> &'static str {
    match self {
      Tab::Overview => "Overview",
      Tab::Performance => "Performance",
      Tab::Skills => "Skills",
      Tab::Freelancers => "Freelancers",
    }
  }

  pub fn index(self) -> usize {
    Self::ALL.iter().position(|t| *t == self).unwrap_or_default()
  }

  fn next(self) -> Self { Self::ALL[(self.index() + 1) % Self::ALL.len()] }
}

// ─── Filter menus ─────────────────────────────────────────────────────────────

/// Next menu entry after `current`: "all", then each option, then "all" again.
fn cycle(current: Option<&str>, options: &[String]) -> Option<String> {
  match current {
    None => options.first().cloned(),
    Some(v) => options
      .iter()
      .position(|o| o == v)
      .and_then(|i| options.get(i + 1))
      .cloned(),
  }
}

/// all → active only → inactive only → all
fn cycle_active(current: Option<bool>) -> Option<bool> {
  match current {
    None => Some(true),
    Some(true) => Some(false),
    Some(false) => None,
  }
}

/// One country row on the Skills tab.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillRow<'a> {
  pub country: &'a str,
  /// Records in this country, whatever their skill.
  pub total:   usize,
  pub skills:  Vec<SkillCount>,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub tab: Tab,

  /// Latest analytics report; `None` until the first successful load.
  pub report: Option<AnalyticsReport>,

  /// Current page of the Freelancers tab, most recently active first.
  pub freelancers: Vec<AnnotatedFreelancer>,

  /// Server-side filters for the Freelancers tab.
  pub list_filter: ListFilter,

  /// 1-based page of the Freelancers tab.
  pub page: usize,
  pub total_pages: usize,
  /// Records matching `list_filter` across all pages.
  pub total: usize,

  /// Set when filters or page changed and the list must be fetched again.
  pub list_stale: bool,

  /// Country and skill filters of the Skills tab, applied locally.
  pub skills_filter: ListFilter,

  /// Menu values from `/freelancers/filters/*`.
  pub countries: Vec<String>,
  pub skills: Vec<String>,

  /// Inactive freelancers ticked for re-engagement on the Overview tab.
  pub selected: HashSet<Uuid>,

  /// Cursor within the current tab's list.
  pub cursor: usize,

  /// Current fuzzy-filter string for the Freelancers tab.
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient) -> Self {
    Self {
      tab: Tab::Overview,
      report: None,
      freelancers: Vec::new(),
      list_filter: ListFilter::default(),
      page: 1,
      total_pages: 0,
      total: 0,
      list_stale: false,
      skills_filter: ListFilter::default(),
      countries: Vec::new(),
      skills: Vec::new(),
      selected: HashSet::new(),
      cursor: 0,
      filter: String::new(),
      filter_active: false,
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch the analytics report, the filter menus and the current page.
  pub async fn refresh(&mut self) -> anyhow::Result<()> {
    self.status_msg = "Loading…".into();
    let loaded = async {
      let report = self.client.analytics().await?;
      let countries = self.client.countries().await?;
      let skills = self.client.skills().await?;
      let page = self.client.freelancers(&self.list_filter, self.page).await?;
      anyhow::Ok((report, countries, skills, page))
    }
    .await;

    match loaded {
      Ok((report, countries, skills, page)) => {
        self.countries = countries;
        self.skills = skills;
        self.set_report(report);
        self.set_page(page);
        self.list_stale = false;
        self.status_msg = String::new();
        Ok(())
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        Err(e)
      }
    }
  }

  /// Replace the report, dropping selections that are no longer inactive and
  /// clamping the cursor.
  pub fn set_report(&mut self, report: AnalyticsReport) {
    let still_inactive: HashSet<Uuid> = report.inactive_freelancers.iter().map(|e| e.id).collect();
    self.selected.retain(|id| still_inactive.contains(id));
    self.report = Some(report);
    self.cursor = self.cursor.min(self.list_len().saturating_sub(1));
  }

  /// Replace the Freelancers tab with a freshly fetched page.
  pub fn set_page(&mut self, page: Page<AnnotatedFreelancer>) {
    self.freelancers = page.data;
    self.total = page.total;
    self.total_pages = page.total_pages;
    self.page = page.current_page.max(1);
    self.cursor = self.cursor.min(self.list_len().saturating_sub(1));
  }

  /// Fetch the Freelancers page again if filters or paging changed.
  pub async fn reload_if_stale(&mut self) {
    if !self.list_stale {
      return;
    }
    self.list_stale = false;
    match self.client.freelancers(&self.list_filter, self.page).await {
      Ok(page) => {
        self.set_page(page);
        self.status_msg = String::new();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  /// Send mock re-engagement emails to every selected freelancer.
  async fn send_reactivation(&mut self) -> anyhow::Result<()> {
    if self.selected.is_empty() {
      self.status_msg = "Select inactive freelancers with Space first.".into();
      return Ok(());
    }
    let ids: Vec<Uuid> = self.selected.iter().copied().collect();
    self.status_msg = "Sending…".into();
    match self.client.reactivate(&ids).await {
      Ok(outcome) => {
        self.selected.clear();
        self.status_msg = format!("Sent {} re-engagement email(s).", outcome.emails_sent);
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
    Ok(())
  }

  // ── Views ─────────────────────────────────────────────────────────────────

  pub fn inactive(&self) -> &[InactiveEntry] {
    self
      .report
      .as_ref()
      .map(|r| r.inactive_freelancers.as_slice())
      .unwrap_or_default()
  }

  /// Records that match the current filter over name, email, country and
  /// skill.
  pub fn filtered_freelancers(&self) -> Vec<&AnnotatedFreelancer> {
    if self.filter.is_empty() {
      return self.freelancers.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .freelancers
      .iter()
      .filter(|a| {
        let f = &a.freelancer;
        [&f.name, &f.email, &f.country, &f.skill]
          .iter()
          .any(|field| matcher.fuzzy_match(field, &self.filter).is_some())
      })
      .collect()
  }

  /// Skills tab rows: each country's top skills, narrowed by the Skills
  /// filters. With a skill chosen, a country shows only that skill's count
  /// and countries without it are left out.
  pub fn skill_rows(&self) -> Vec<SkillRow<'_>> {
    let Some(report) = &self.report else {
      return Vec::new();
    };
    let wanted_country = self.skills_filter.country.as_deref();
    let wanted_skill = self.skills_filter.skill.as_deref();

    report
      .skill_distribution
      .iter()
      .filter(|(country, _)| wanted_country.is_none_or(|c| c == country.as_str()))
      .filter_map(|(country, by_skill)| {
        let skills = match wanted_skill {
          Some(skill) => {
            let count = *by_skill.get(skill)?;
            vec![SkillCount { skill: skill.to_owned(), count }]
          }
          None => report.top_skills_by_country.get(country).cloned().unwrap_or_default(),
        };
        Some(SkillRow { country, total: by_skill.values().sum(), skills })
      })
      .collect()
  }

  /// Number of rows the cursor can move over on the current tab.
  pub fn list_len(&self) -> usize {
    let report = self.report.as_ref();
    match self.tab {
      Tab::Overview => self.inactive().len(),
      Tab::Performance => report.map_or(0, |r| r.performance_metrics.len()),
      Tab::Skills => self.skill_rows().len(),
      Tab::Freelancers => self.filtered_freelancers().len(),
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    // Filter input mode: all printable keys go into the filter string.
    if self.filter_active {
      self.handle_filter_key(key);
      return Ok(true);
    }

    match key.code {
      KeyCode::Char('q') => return Ok(false),

      // Tabs
      KeyCode::Tab => self.switch_to(self.tab.next()),
      KeyCode::Char(c @ '1'..='4') => {
        let idx = c as usize - '1' as usize;
        self.switch_to(Tab::ALL[idx]);
      }

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        if self.cursor + 1 < self.list_len() {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.cursor = self.cursor.saturating_sub(1);
      }

      KeyCode::Char('r') => {
        // The error is already in the status bar.
        let _ = self.refresh().await;
      }

      _ => match self.tab {
        Tab::Overview => self.handle_overview_key(key).await?,
        Tab::Freelancers => self.handle_list_key(key),
        Tab::Skills => self.handle_skills_key(key),
        Tab::Performance => {}
      },
    }
    Ok(true)
  }

  fn switch_to(&mut self, tab: Tab) {
    if self.tab != tab {
      self.tab = tab;
      self.cursor = 0;
    }
  }

  async fn handle_overview_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
    match key.code {
      KeyCode::Char(' ') => {
        if let Some(id) = self.inactive().get(self.cursor).map(|e| e.id) {
          if !self.selected.remove(&id) {
            self.selected.insert(id);
          }
        }
      }
      KeyCode::Char('a') => {
        let all: Vec<Uuid> = self.inactive().iter().map(|e| e.id).collect();
        if self.selected.len() == all.len() {
          self.selected.clear();
        } else {
          self.selected.extend(all);
        }
      }
      KeyCode::Char('s') => self.send_reactivation().await?,
      _ => {}
    }
    Ok(())
  }

  fn handle_list_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.cursor = 0;
      }
      KeyCode::Char('c') => {
        self.list_filter.country = cycle(self.list_filter.country.as_deref(), &self.countries);
        self.list_filter_changed();
      }
      KeyCode::Char('s') => {
        self.list_filter.skill = cycle(self.list_filter.skill.as_deref(), &self.skills);
        self.list_filter_changed();
      }
      KeyCode::Char('a') => {
        self.list_filter.active = cycle_active(self.list_filter.active);
        self.list_filter_changed();
      }
      KeyCode::Char('x') => {
        if !self.list_filter.is_empty() {
          self.list_filter = ListFilter::default();
          self.list_filter_changed();
        }
        self.filter.clear();
      }
      KeyCode::Char('n') if self.page < self.total_pages => {
        self.page += 1;
        self.cursor = 0;
        self.list_stale = true;
      }
      KeyCode::Char('p') if self.page > 1 => {
        self.page -= 1;
        self.cursor = 0;
        self.list_stale = true;
      }
      _ => {}
    }
  }

  /// New server-side filters start again from the first page.
  fn list_filter_changed(&mut self) {
    self.page = 1;
    self.cursor = 0;
    self.list_stale = true;
  }

  fn handle_skills_key(&mut self, key: KeyEvent) {
    let f = &mut self.skills_filter;
    match key.code {
      KeyCode::Char('c') => f.country = cycle(f.country.as_deref(), &self.countries),
      KeyCode::Char('s') => f.skill = cycle(f.skill.as_deref(), &self.skills),
      KeyCode::Char('x') => *f = ListFilter::default(),
      _ => return,
    }
    self.cursor = 0;
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.cursor = 0;
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.cursor = 0;
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.cursor = 0;
      }
      _ => {}
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, Utc};
  use gig_core::freelancer::{Gender, NewFreelancer};

  use super::*;
  use crate::client::ApiConfig;

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  fn app_with_roster() -> App {
    let now = Utc::now();
    let records: Vec<_> = [
      ("Ana Souza", "Brazil", 5),
      ("Bruno Lima", "Brazil", 120),
      ("Chen Wei", "China", 200),
    ]
    .into_iter()
    .map(|(name, country, days)| {
      NewFreelancer {
        name:            name.into(),
        email:           format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        country:         country.into(),
        skill:           "DevOps".into(),
        gender:          Gender::Other,
        age:             30,
        projects_worked: 5,
        rating:          4.0,
        last_active:     Some(now - Duration::days(days)),
      }
      .into_freelancer(now)
      .unwrap()
    })
    .collect();

    let client = ApiClient::new(ApiConfig { base_url: "http://127.0.0.1:9".into() }).unwrap();
    let mut app = App::new(client);
    let data: Vec<_> = records.iter().cloned().map(|f| AnnotatedFreelancer::new(f, now)).collect();
    app.countries = vec!["Brazil".into(), "China".into()];
    app.skills = vec!["DevOps".into(), "QA".into()];
    app.set_report(AnalyticsReport::build(&records, now));
    app.set_page(Page { count: data.len(), total: 250, total_pages: 3, current_page: 1, data });
    app
  }

  async fn press(app: &mut App, c: char) { app.handle_key(key(KeyCode::Char(c))).await.unwrap(); }

  #[tokio::test]
  async fn number_keys_and_tab_switch_views() {
    let mut app = app_with_roster();
    assert!(app.handle_key(key(KeyCode::Char('3'))).await.unwrap());
    assert_eq!(app.tab, Tab::Skills);
    app.handle_key(key(KeyCode::Tab)).await.unwrap();
    assert_eq!(app.tab, Tab::Freelancers);
    app.handle_key(key(KeyCode::Tab)).await.unwrap();
    assert_eq!(app.tab, Tab::Overview);
  }

  #[tokio::test]
  async fn quit_keys() {
    let mut app = app_with_roster();
    assert!(!app.handle_key(key(KeyCode::Char('q'))).await.unwrap());
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert!(!app.handle_key(ctrl_c).await.unwrap());
  }

  #[tokio::test]
  async fn space_and_a_toggle_inactive_selection() {
    let mut app = app_with_roster();
    assert_eq!(app.inactive().len(), 2);

    app.handle_key(key(KeyCode::Char(' '))).await.unwrap();
    assert_eq!(app.selected.len(), 1);
    app.handle_key(key(KeyCode::Char(' '))).await.unwrap();
    assert!(app.selected.is_empty());

    app.handle_key(key(KeyCode::Char('a'))).await.unwrap();
    assert_eq!(app.selected.len(), 2);
    app.handle_key(key(KeyCode::Char('a'))).await.unwrap();
    assert!(app.selected.is_empty());
  }

  #[tokio::test]
  async fn cursor_stays_within_the_list() {
    let mut app = app_with_roster();
    for _ in 0..5 {
      app.handle_key(key(KeyCode::Down)).await.unwrap();
    }
    assert_eq!(app.cursor, 1);
    app.handle_key(key(KeyCode::Char('2'))).await.unwrap();
    assert_eq!(app.cursor, 0);
  }

  #[tokio::test]
  async fn fuzzy_filter_matches_any_field() {
    let mut app = app_with_roster();
    app.handle_key(key(KeyCode::Char('4'))).await.unwrap();
    app.handle_key(key(KeyCode::Char('/'))).await.unwrap();
    for c in "china".chars() {
      app.handle_key(key(KeyCode::Char(c))).await.unwrap();
    }
    let names: Vec<_> = app.filtered_freelancers().iter().map(|a| a.freelancer.name.as_str()).collect();
    assert_eq!(names, ["Chen Wei"]);

    app.handle_key(key(KeyCode::Esc)).await.unwrap();
    assert_eq!(app.filtered_freelancers().len(), 3);
  }

  #[tokio::test]
  async fn send_without_selection_only_hints() {
    let mut app = app_with_roster();
    app.handle_key(key(KeyCode::Char('s'))).await.unwrap();
    assert!(app.status_msg.contains("Space"));
  }

  #[test]
  fn refreshed_data_drops_stale_selections() {
    let mut app = app_with_roster();
    app.selected.insert(Uuid::new_v4());
    let inactive_id = app.inactive()[0].id;
    app.selected.insert(inactive_id);

    let report = app.report.clone().unwrap();
    app.set_report(report);
    assert_eq!(app.selected, HashSet::from([inactive_id]));
  }

  #[test]
  fn cycling_walks_all_then_each_option() {
    let options = vec!["Brazil".to_owned(), "China".to_owned()];
    assert_eq!(cycle(None, &options).as_deref(), Some("Brazil"));
    assert_eq!(cycle(Some("Brazil"), &options).as_deref(), Some("China"));
    assert_eq!(cycle(Some("China"), &options), None);
    assert_eq!(cycle(Some("Gone"), &options), None);
    assert_eq!(cycle(None, &[]), None);

    assert_eq!(cycle_active(None), Some(true));
    assert_eq!(cycle_active(Some(true)), Some(false));
    assert_eq!(cycle_active(Some(false)), None);
  }

  #[tokio::test]
  async fn list_filter_keys_reset_paging_and_mark_stale() {
    let mut app = app_with_roster();
    press(&mut app, '4').await;
    press(&mut app, 'n').await;
    assert_eq!(app.page, 2);
    assert!(app.list_stale);
    app.list_stale = false;

    press(&mut app, 'c').await;
    press(&mut app, 'c').await;
    press(&mut app, 's').await;
    press(&mut app, 'a').await;
    press(&mut app, 'a').await;
    assert_eq!(
      app.list_filter,
      ListFilter { country: Some("China".into()), skill: Some("DevOps".into()), active: Some(false) }
    );
    assert_eq!(app.page, 1);
    assert!(app.list_stale);

    app.list_stale = false;
    press(&mut app, 'x').await;
    assert!(app.list_filter.is_empty());
    assert!(app.list_stale);
  }

  #[tokio::test]
  async fn paging_stops_at_both_ends() {
    let mut app = app_with_roster();
    press(&mut app, '4').await;
    press(&mut app, 'p').await;
    assert_eq!(app.page, 1);
    assert!(!app.list_stale);

    for _ in 0..5 {
      press(&mut app, 'n').await;
    }
    assert_eq!(app.page, 3);
  }

  #[tokio::test]
  async fn list_keys_do_not_leak_into_other_tabs() {
    let mut app = app_with_roster();
    press(&mut app, 'c').await;
    press(&mut app, 'n').await;
    assert!(app.list_filter.is_empty());
    assert_eq!(app.page, 1);
    assert!(!app.list_stale);
  }

  #[tokio::test]
  async fn skills_tab_filters_the_distribution_locally() {
    let mut app = app_with_roster();
    press(&mut app, '3').await;
    assert_eq!(app.skill_rows().len(), 2);

    press(&mut app, 'c').await;
    let rows = app.skill_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].country, "Brazil");
    assert_eq!(rows[0].total, 2);

    // A skill nobody in Brazil has leaves no rows.
    press(&mut app, 's').await;
    press(&mut app, 's').await;
    assert_eq!(app.skills_filter.skill.as_deref(), Some("QA"));
    assert!(app.skill_rows().is_empty());

    press(&mut app, 'x').await;
    press(&mut app, 's').await;
    let rows = app.skill_rows();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.skills == [SkillCount { skill: "DevOps".into(), count: r.total }]));
    assert!(!app.list_stale);
  }
}
