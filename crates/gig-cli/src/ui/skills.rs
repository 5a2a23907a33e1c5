//! Skills tab: each country's most common skills, narrowed by country and
//! skill filters.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::{
  app::App,
  ui::{cursor_style, filter_label},
};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let rows = app.skill_rows();
  let items: Vec<ListItem> = rows
    .iter()
    .map(|row| {
      let mut spans = vec![
        Span::styled(format!("{:<18}", row.country), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("{:>4}  ", row.total), Style::default().fg(Color::DarkGray)),
      ];
      for (i, s) in row.skills.iter().enumerate() {
        if i > 0 {
          spans.push(Span::styled(" · ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::raw(format!("{} ({})", s.skill, s.count)));
      }
      ListItem::new(Line::from(spans))
    })
    .collect();

  let filter = &app.skills_filter;
  let title = if filter.skill.is_some() { " Skill by country " } else { " Top skills by country " };
  let block = Block::default()
    .title(title)
    .title(Line::from(format!(
      "{}{}",
      filter_label("Country", filter.country.as_deref()),
      filter_label("Skill", filter.skill.as_deref()),
    )).right_aligned())
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut state = ListState::default();
  state.select((!rows.is_empty()).then_some(app.cursor));

  f.render_stateful_widget(
    List::new(items).block(block).highlight_style(cursor_style()),
    area,
    &mut state,
  );
}
