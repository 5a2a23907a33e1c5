//! Performance tab: averages and the ranked list with tier badges.

use gig_analytics::{AnalyticsReport, PerformanceTier};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{app::App, ui::cursor_style};

const GAUGE_WIDTH: usize = 20;

fn tier_color(tier: PerformanceTier) -> Color {
  match tier {
    PerformanceTier::Excellent => Color::Green,
    PerformanceTier::Good => Color::Cyan,
    PerformanceTier::Average => Color::Yellow,
    PerformanceTier::NeedsImprovement => Color::Red,
  }
}

/// Text bar for an index in `[0, 1]`.
fn gauge(index: f64) -> String {
  let filled = ((index.clamp(0.0, 1.0) * GAUGE_WIDTH as f64).round() as usize).min(GAUGE_WIDTH);
  format!("{}{}", "█".repeat(filled), "░".repeat(GAUGE_WIDTH - filled))
}

pub fn draw(f: &mut Frame, area: Rect, app: &App, report: &AnalyticsReport) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(3), Constraint::Min(0)])
    .split(area);

  let stats = &report.performance_stats;
  let summary = Line::from(vec![
    Span::raw(" Avg index "),
    Span::styled(
      format!("{:.4}", stats.average_performance_index),
      Style::default().add_modifier(Modifier::BOLD),
    ),
    Span::raw("   Avg rating "),
    Span::styled(
      format!("{:.2}", stats.average_rating),
      Style::default().add_modifier(Modifier::BOLD),
    ),
    Span::raw("   Avg projects "),
    Span::styled(
      stats.average_projects.to_string(),
      Style::default().add_modifier(Modifier::BOLD),
    ),
  ]);
  f.render_widget(
    Paragraph::new(summary).block(
      Block::default()
        .title(" Averages ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray)),
    ),
    rows[0],
  );

  let items: Vec<ListItem> = report
    .performance_metrics
    .iter()
    .enumerate()
    .map(|(rank, e)| {
      let color = tier_color(e.tier);
      ListItem::new(Line::from(vec![
        Span::styled(format!("{:>3}. ", rank + 1), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{:<24}", e.name), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("{:<20}", e.skill)),
        Span::styled(gauge(e.performance_index), Style::default().fg(color)),
        Span::raw(format!(" {:.4}  ", e.performance_index)),
        Span::styled(e.tier.to_string(), Style::default().fg(color)),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select((!report.performance_metrics.is_empty()).then_some(app.cursor));

  f.render_stateful_widget(
    List::new(items)
      .block(
        Block::default()
          .title(" Ranked by performance index ")
          .borders(Borders::ALL)
          .border_style(Style::default().fg(Color::DarkGray)),
      )
      .highlight_style(cursor_style()),
    rows[1],
    &mut state,
  );
}
