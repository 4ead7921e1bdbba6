mod views;

use crate::app::{App, Mode};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // File table
      Constraint::Length(1), // Pagination strip
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  draw_header(frame, chunks[0], app);
  views::files::draw_file_list(frame, chunks[1], app);
  views::files::draw_pagination(frame, chunks[2], app);
  draw_status_bar(frame, chunks[3], app);
}

/// Header bar with logo, vault domain and query context
fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
  let params = app.params();

  let header = Line::from(vec![
    Span::styled(" f9s ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {} ", extract_domain(app.vault_url())),
      Style::default().fg(Color::White),
    ),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" page {} ", params.page),
      Style::default().fg(Color::Yellow).bold(),
    ),
    Span::styled(
      format!("{}/page ", params.limit.as_u32()),
      Style::default().fg(Color::DarkGray),
    ),
    Span::styled(
      format!(" {} cached ", app.cached_pages()),
      Style::default().fg(Color::DarkGray),
    ),
  ]);

  let paragraph = Paragraph::new(header).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  let (content, style) = match app.mode() {
    Mode::Normal => {
      if let Some(notice) = app.notice() {
        (notice.to_string(), Style::default().fg(Color::Yellow))
      } else if app.deletes_in_flight() > 0 {
        (
          format!(" deleting {}...", app.deletes_in_flight()),
          Style::default().fg(Color::Yellow),
        )
      } else {
        let hint =
          " :command  /filter  1-4:sort  N/D/E/T:local sort  d:delete  s:save  h/l:page  q:quit";
        (hint.to_string(), Style::default().fg(Color::DarkGray))
      }
    }
    Mode::Command => {
      let suggestions = app.autocomplete_suggestions();
      let picked = suggestions
        .get(app.selected_suggestion())
        .map(|c| format!("  ({} - {})", c.name, c.description))
        .unwrap_or_default();
      (
        format!(":{}{}", app.command_input(), picked),
        Style::default().fg(Color::Yellow),
      )
    }
    Mode::Filter => {
      let filter = format!("/{}", app.filter_input());
      (filter, Style::default().fg(Color::Cyan))
    }
  };

  let paragraph = Paragraph::new(content).style(style);
  frame.render_widget(paragraph, area);
}

/// Extract domain from the vault URL
fn extract_domain(url: &str) -> &str {
  url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url)
    .split('/')
    .next()
    .unwrap_or(url)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_extract_domain() {
    assert_eq!(
      extract_domain("https://vault.example.com"),
      "vault.example.com"
    );
    assert_eq!(
      extract_domain("http://vault.example.com/api/v2"),
      "vault.example.com"
    );
    assert_eq!(extract_domain("vault.example.com"), "vault.example.com");
  }
}
