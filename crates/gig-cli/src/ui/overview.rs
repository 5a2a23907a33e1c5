//! Overview tab: activity stat cards and the inactive list.

use gig_analytics::AnalyticsReport;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{app::App, ui::cursor_style};

pub fn draw(f: &mut Frame, area: Rect, app: &App, report: &AnalyticsReport) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(4), Constraint::Min(0)])
    .split(area);

  draw_cards(f, rows[0], report);
  draw_inactive(f, rows[1], app);
}

fn draw_cards(f: &mut Frame, area: Rect, report: &AnalyticsReport) {
  let s = &report.activity_summary;
  let cards = [
    ("Total", s.total.to_string(), Color::White),
    ("Active", s.active.to_string(), Color::Green),
    ("Inactive", s.inactive.to_string(), Color::Red),
    ("Active rate", format!("{:.2}%", s.active_percentage), Color::Cyan),
  ];

  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Ratio(1, 4); 4])
    .split(area);

  for ((label, value, color), col) in cards.into_iter().zip(cols.iter()) {
    let block = Block::default()
      .title(format!(" {label} "))
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(
      Paragraph::new(Span::styled(
        value,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
      ))
      .block(block),
      *col,
    );
  }
}

fn draw_inactive(f: &mut Frame, area: Rect, app: &App) {
  let inactive = app.inactive();
  let block = Block::default()
    .title(format!(
      " Inactive for 90+ days ({}, {} selected) ",
      inactive.len(),
      app.selected.len()
    ))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let items: Vec<ListItem> = inactive
    .iter()
    .map(|e| {
      let mark = if app.selected.contains(&e.id) { "[x] " } else { "[ ] " };
      ListItem::new(Line::from(vec![
        Span::raw(mark),
        Span::styled(format!("{:<24}", e.name), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("{:<32}", e.email)),
        Span::styled(format!("{:<18}", e.country), Style::default().fg(Color::Gray)),
        Span::styled(
          format!("{} days", e.days_inactive),
          Style::default().fg(Color::Red),
        ),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select((!inactive.is_empty()).then_some(app.cursor));

  f.render_stateful_widget(
    List::new(items).block(block).highlight_style(cursor_style()),
    area,
    &mut state,
  );
}
