//! Freelancers tab: one page of records, the server-side filter bar and a
//! fuzzy search over the page.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{
  app::App,
  ui::{cursor_style, filter_label},
};

/// Render the freelancer list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let filtered = app.filtered_freelancers();
  let on_page = app.freelancers.len();

  let shown = if app.filter_active || !app.filter.is_empty() {
    format!("{}/{}", filtered.len(), on_page)
  } else {
    on_page.to_string()
  };
  let title = format!(
    " Freelancers ({shown} of {}, page {}/{}) ",
    app.total,
    app.page,
    app.total_pages.max(1)
  );

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let items: Vec<ListItem> = filtered
    .iter()
    .map(|a| {
      let rec = &a.freelancer;
      let (dot, dot_color) = if a.is_active { ("● ", Color::Green) } else { ("○ ", Color::Red) };
      ListItem::new(Line::from(vec![
        Span::styled(dot, Style::default().fg(dot_color)),
        Span::styled(format!("{:<24}", rec.name), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("{:<32}", rec.email)),
        Span::raw(format!("{:<18}", rec.country)),
        Span::raw(format!("{:<20}", rec.skill)),
        Span::styled(format!("★ {:.1}", rec.rating), Style::default().fg(Color::Yellow)),
        Span::styled(
          format!("  {} projects  {}d", rec.projects_worked, a.days_inactive),
          Style::default().fg(Color::DarkGray),
        ),
      ]))
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Server-side filters along the top of the pane.
  if inner_area.height > 1 {
    let status = match app.list_filter.active {
      None => None,
      Some(true) => Some("active"),
      Some(false) => Some("inactive"),
    };
    let chip = Style::default().fg(Color::Black).bg(Color::Cyan);
    let bar = Line::from(vec![
      Span::styled(filter_label("Country", app.list_filter.country.as_deref()), chip),
      Span::raw(" "),
      Span::styled(filter_label("Skill", app.list_filter.skill.as_deref()), chip),
      Span::raw(" "),
      Span::styled(filter_label("Status", status), chip),
    ]);
    let bar_area = Rect { height: 1, ..inner_area };
    f.render_widget(Paragraph::new(bar), bar_area);
    inner_area.y += 1;
    inner_area.height -= 1;
  }

  // Filter bar along the bottom of the pane.
  if (app.filter_active || !app.filter.is_empty()) && inner_area.height > 2 {
    let filter_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let filter_text = if app.filter_active {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  let mut state = ListState::default();
  state.select((!filtered.is_empty()).then_some(app.cursor));

  f.render_stateful_widget(
    List::new(items).highlight_style(cursor_style()),
    inner_area,
    &mut state,
  );
}
