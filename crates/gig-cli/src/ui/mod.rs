//! TUI rendering: header with tabs, the active tab's body, and a status bar.

pub mod freelancer_list;
pub mod overview;
pub mod performance;
pub mod skills;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Tabs},
};

use crate::app::{App, Tab};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([
      Constraint::Length(6),
      Constraint::Min(0),
      Constraint::Length(date.len() as u16 + 1),
    ])
    .split(area);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  f.render_widget(block, area);

  f.render_widget(
    Paragraph::new(Span::styled(
      " gig ",
      Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )),
    cols[0],
  );

  let titles = Tab::ALL
    .iter()
    .enumerate()
    .map(|(i, t)| format!("{} {}", i + 1, t.title()));
  f.render_widget(
    Tabs::new(titles)
      .select(app.tab.index())
      .style(Style::default().fg(Color::Gray))
      .highlight_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
      .divider("│"),
    cols[1],
  );

  f.render_widget(
    Paragraph::new(Span::styled(format!("{date} "), Style::default().fg(Color::Black))),
    cols[2],
  );
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  let Some(report) = &app.report else {
    draw_placeholder(f, area, "No data yet. Press r to load.");
    return;
  };

  match app.tab {
    Tab::Overview => overview::draw(f, area, app, report),
    Tab::Performance => performance::draw(f, area, app, report),
    Tab::Skills => skills::draw(f, area, app),
    Tab::Freelancers => freelancer_list::draw(f, area, app),
  }
}

pub(crate) fn draw_placeholder(f: &mut Frame, area: Rect, message: &str) {
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(Line::from(vec![Span::styled(
      message.to_owned(),
      Style::default().fg(Color::DarkGray),
    )])),
    inner,
  );
}

/// ` Label: value ` for a filter, `all` when unset.
pub(crate) fn filter_label(label: &str, value: Option<&str>) -> String {
  format!(" {label}: {} ", value.unwrap_or("all"))
}

/// Style for the row under the cursor.
pub(crate) fn cursor_style() -> Style {
  Style::default()
    .bg(Color::Blue)
    .fg(Color::White)
    .add_modifier(Modifier::BOLD)
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.tab {
    Tab::Freelancers if app.filter_active => (
      "SEARCH",
      "Type to filter  Esc cancel  Enter keep",
    ),
    Tab::Overview => (
      "OVERVIEW",
      "↑↓/jk move  Space select  a all  s send  r refresh  1-4/Tab switch  q quit",
    ),
    Tab::Freelancers => (
      "LIST",
      "↑↓/jk move  / search  c country  s skill  a active  x clear  n/p page  r refresh  q quit",
    ),
    Tab::Skills => (
      "SKILLS",
      "↑↓/jk move  c country  s skill  x clear  r refresh  1-4/Tab switch  q quit",
    ),
    Tab::Performance => (
      "VIEW",
      "↑↓/jk move  r refresh  1-4/Tab switch  q quit",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
