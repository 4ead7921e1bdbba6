use crate::app::App;
use crate::listing::pagination::PageMarker;
use crate::vault::params::{SortColumn, SortOrder};
use crate::vault::types::{format_uploaded_at, FileEntry};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

const NAME_WIDTH: usize = 28;
const DESCRIPTION_WIDTH: usize = 30;
const EMAIL_WIDTH: usize = 26;

pub fn draw_file_list(frame: &mut Frame, area: Rect, app: &App) {
  let files = app.displayed_files();

  let title = if app.loading() {
    " Files (loading...) ".to_string()
  } else {
    match app.total_count() {
      Some(total) => format!(" Files ({total} total) "),
      None => format!(" Files ({}) ", files.len()),
    }
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if files.is_empty() && !app.loading() {
    let content = if app.params().filters.name.is_some() {
      "No files match the filter. Press / Enter to clear it."
    } else {
      "No files found."
    };
    let paragraph = Paragraph::new(content)
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let inner = block.inner(area);
  frame.render_widget(block, area);

  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Column headers
      Constraint::Min(1),    // Rows
    ])
    .split(inner);

  frame.render_widget(Paragraph::new(header_line(app)), chunks[0]);

  let items: Vec<ListItem> = files.iter().map(|file| ListItem::new(row_line(file))).collect();

  let list = List::new(items)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut state = ListState::default();
  state.select(Some(app.selected()));

  frame.render_stateful_widget(list, chunks[1], &mut state);
}

/// Column headers with server-sort and overlay-sort markers.
fn header_line(app: &App) -> Line<'static> {
  let columns = [
    (SortColumn::Name, "[1] Name", NAME_WIDTH),
    (SortColumn::Description, "[2] Description", DESCRIPTION_WIDTH),
    (SortColumn::UploaderEmail, "[3] Email", EMAIL_WIDTH),
    (SortColumn::UploadedAt, "[4] Uploaded", 18),
  ];

  let params = app.params();
  let mut spans = vec![Span::raw("  ")];
  for (column, label, width) in columns {
    let server_marker = if params.sort_by == column {
      match params.sort_order {
        SortOrder::Asc => " ^",
        SortOrder::Desc => " v",
      }
    } else {
      ""
    };
    let local_marker = match app.local_sort().order_for(column) {
      Some(SortOrder::Asc) => " +",
      Some(SortOrder::Desc) => " -",
      None => "",
    };

    spans.push(Span::styled(
      format!("{:<width$} ", format!("{label}{server_marker}{local_marker}")),
      Style::default().fg(Color::Cyan),
    ));
  }

  Line::from(spans)
}

fn row_line(file: &FileEntry) -> Line<'static> {
  Line::from(vec![
    Span::styled(cell(&file.name, NAME_WIDTH), Style::default().fg(Color::White)),
    Span::styled(
      cell(&file.description, DESCRIPTION_WIDTH),
      Style::default().fg(Color::Gray),
    ),
    Span::styled(
      cell(&file.uploader_email, EMAIL_WIDTH),
      Style::default().fg(Color::Gray),
    ),
    Span::raw(format_uploaded_at(&file.uploaded_at)),
  ])
}

/// One fixed-width, space-terminated table cell.
fn cell(text: &str, width: usize) -> String {
  format!("{:<width$} ", truncate(text, width))
}

/// Numbered strip when the total is known, prev/next hints otherwise.
pub fn draw_pagination(frame: &mut Frame, area: Rect, app: &App) {
  let current = app.params().page;
  let mut spans: Vec<Span> = vec![Span::raw(" ")];

  match app.pagination() {
    Some(markers) => {
      for marker in markers {
        match marker {
          PageMarker::Page(page) => {
            let style = if page == current {
              Style::default().fg(Color::Yellow).bold()
            } else {
              Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(format!(" {page} "), style));
          }
          PageMarker::LeftEllipsis | PageMarker::RightEllipsis => {
            spans.push(Span::styled(" .. ", Style::default().fg(Color::DarkGray)));
          }
        }
      }
    }
    None => {
      // Total unknown: suppress the numbered tail entirely
      spans.push(Span::styled(
        format!(" page {current} "),
        Style::default().fg(Color::Yellow),
      ));
      if current > 1 {
        spans.push(Span::styled(" <h> prev ", Style::default().fg(Color::DarkGray)));
      }
      if app.has_next_page() {
        spans.push(Span::styled(" <l> next ", Style::default().fg(Color::DarkGray)));
      }
    }
  }

  frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{cut}...")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_is_char_safe() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a very long file name", 10), "a very ...");
    assert_eq!(truncate("ăîşţâăîşţâăî", 6), "ăîş...");
  }
}
