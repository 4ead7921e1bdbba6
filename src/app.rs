use crate::commands;
use crate::config::Config;
use crate::event::{Event, EventHandler, VaultEvent};
use crate::listing::delete::PendingDeletes;
use crate::listing::pagination::{last_page, window_of, PageMarker};
use crate::listing::sort::{apply_local_sort, LocalSort};
use crate::ui;
use crate::vault::cached_client::CachedVaultClient;
use crate::vault::error::ApiError;
use crate::vault::params::{QueryParams, SortColumn};
use crate::vault::types::FileEntry;
use color_eyre::{eyre::eyre, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Neighbors shown on each side of the current page in the strip.
const PAGE_WINDOW_DELTA: u32 = 2;

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Command,
  Filter,
}

/// Main application state
pub struct App {
  /// Current page exactly as the server returned it (pre-overlay)
  files: Vec<FileEntry>,

  /// Server-side query state; every change builds a new value
  params: QueryParams,

  /// Client-side sort overlay on the displayed page
  local_sort: LocalSort,

  /// Optimistic deletes awaiting server confirmation
  pending_deletes: PendingDeletes,

  /// Displayed total. Decremented on confirmed deletes, so cached pages can
  /// carry a higher total until they are refetched.
  total_count: Option<u64>,

  has_next_page: bool,

  /// Selected row in the displayed (overlay-sorted) list
  selected: usize,

  loading: bool,

  /// Monotonic stamp for list requests; responses carrying an older stamp
  /// are dropped instead of applied
  fetch_epoch: u64,

  /// Current input mode
  mode: Mode,

  /// Command input buffer (after pressing :)
  command_input: String,

  /// Selected autocomplete suggestion index
  selected_suggestion: usize,

  /// Name-filter input buffer (after pressing /)
  filter_input: String,

  /// One-line status notice (delete/download results)
  notice: Option<String>,

  /// Set when the session must end with an error after terminal teardown
  fatal: Option<String>,

  /// Application configuration
  config: Config,

  /// Vault client with the query cache in front
  vault: CachedVaultClient,

  /// Event sender for async tasks
  event_tx: mpsc::UnboundedSender<Event>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: Config) -> Result<Self> {
    let vault = CachedVaultClient::new(&config)?;
    let (tx, _rx) = mpsc::unbounded_channel();

    Ok(Self {
      files: Vec::new(),
      params: QueryParams::default(),
      local_sort: LocalSort::default(),
      pending_deletes: PendingDeletes::default(),
      total_count: None,
      has_next_page: false,
      selected: 0,
      loading: true,
      fetch_epoch: 0,
      mode: Mode::Normal,
      command_input: String::new(),
      selected_suggestion: 0,
      filter_input: String::new(),
      notice: None,
      fatal: None,
      config,
      vault,
      event_tx: tx,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create event handler
    let mut events = EventHandler::new(Duration::from_millis(250));
    self.event_tx = events.sender();

    // Initial data load
    self.start_fetch();

    // Main loop
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    if let Some(reason) = self.fatal.take() {
      return Err(eyre!(reason));
    }
    Ok(())
  }

  /// Kick off a list request for the current params under a fresh epoch.
  fn start_fetch(&mut self) {
    self.fetch_epoch += 1;
    self.loading = true;

    let epoch = self.fetch_epoch;
    let vault = self.vault.clone();
    let params = self.params.clone();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      match vault.list_files(&params).await {
        Ok(page) => {
          let _ = tx.send(Event::Vault(VaultEvent::PageLoaded { epoch, page }));
        }
        Err(error) => {
          let _ = tx.send(Event::Vault(VaultEvent::PageFailed { epoch, error }));
        }
      }
    });
  }

  /// Adopt new query params, fetching only when something actually changed.
  fn set_params(&mut self, params: QueryParams) {
    if params != self.params {
      self.params = params;
      self.start_fetch();
    }
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {} // UI refresh happens automatically
      Event::Vault(vault_event) => self.handle_vault_event(vault_event),
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    match self.mode {
      Mode::Normal => self.handle_normal_mode_key(key),
      Mode::Command => self.handle_command_mode_key(key),
      Mode::Filter => self.handle_filter_mode_key(key),
    }
  }

  fn handle_normal_mode_key(&mut self, key: KeyEvent) {
    // Any keypress retires the previous notice
    self.notice = None;

    match key.code {
      // Quit
      KeyCode::Char('q') => self.should_quit = true,
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.should_quit = true;
      }

      // Selection
      KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
      KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),

      // Paging
      KeyCode::Left | KeyCode::Char('h') => {
        if self.params.page > 1 {
          let params = self.params.prev_page();
          self.set_params(params);
        }
      }
      KeyCode::Right | KeyCode::Char('l') => {
        if self.has_next_page {
          let params = self.params.next_page();
          self.set_params(params);
        }
      }
      KeyCode::Char('+') => {
        let params = self.params.with_limit(self.params.limit.cycle());
        self.set_params(params);
      }

      // Server sort (round-trips; resets to page 1)
      KeyCode::Char(c @ '1'..='4') => {
        if let Some(column) = column_for_digit(c) {
          let params = self.params.toggle_sort(column);
          self.set_params(params);
        }
      }

      // Local sort overlay (no refetch)
      KeyCode::Char('N') => self.toggle_local_sort(SortColumn::Name),
      KeyCode::Char('D') => self.toggle_local_sort(SortColumn::Description),
      KeyCode::Char('E') => self.toggle_local_sort(SortColumn::UploaderEmail),
      KeyCode::Char('T') => self.toggle_local_sort(SortColumn::UploadedAt),

      // Actions on the selected file
      KeyCode::Char('d') => self.delete_selected(),
      KeyCode::Char('s') => self.download_selected(),

      // Mode switches
      KeyCode::Char(':') => {
        self.mode = Mode::Command;
        self.command_input.clear();
        self.selected_suggestion = 0;
      }
      KeyCode::Char('/') => {
        self.mode = Mode::Filter;
        self.filter_input = self.params.filters.name.clone().unwrap_or_default();
      }

      _ => {}
    }
  }

  fn handle_command_mode_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.command_input.clear();
        self.selected_suggestion = 0;
      }
      KeyCode::Enter => {
        self.execute_command();
        self.mode = Mode::Normal;
        self.selected_suggestion = 0;
      }
      KeyCode::Tab | KeyCode::Down => {
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = (self.selected_suggestion + 1) % suggestions.len();
        }
      }
      KeyCode::BackTab | KeyCode::Up => {
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = if self.selected_suggestion == 0 {
            suggestions.len() - 1
          } else {
            self.selected_suggestion - 1
          };
        }
      }
      KeyCode::Backspace => {
        self.command_input.pop();
        self.selected_suggestion = 0;
      }
      KeyCode::Char(c) => {
        self.command_input.push(c);
        self.selected_suggestion = 0;
      }
      _ => {}
    }
  }

  fn handle_filter_mode_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.filter_input.clear();
      }
      KeyCode::Enter => {
        let trimmed = self.filter_input.trim();
        let name = if trimmed.is_empty() {
          None
        } else {
          Some(trimmed.to_string())
        };
        let params = self.params.with_name_filter(name);
        self.set_params(params);
        self.mode = Mode::Normal;
      }
      KeyCode::Backspace => {
        self.filter_input.pop();
      }
      KeyCode::Char(c) => {
        self.filter_input.push(c);
      }
      _ => {}
    }
  }

  fn execute_command(&mut self) {
    // Get the command to execute - either from selected suggestion or direct input
    let suggestions = commands::get_suggestions(&self.command_input);
    let cmd = if !suggestions.is_empty() && self.selected_suggestion < suggestions.len() {
      suggestions[self.selected_suggestion].name.to_string()
    } else {
      self.command_input.trim().to_lowercase()
    };

    match cmd.as_str() {
      "files" => {
        self.local_sort = LocalSort::default();
        self.params = self.params.without_filters();
        self.start_fetch();
      }
      "refresh" => {
        self.vault.clear_cache();
        self.start_fetch();
      }
      "quit" => {
        self.should_quit = true;
      }
      _ => {
        // Unknown command
      }
    }
    self.command_input.clear();
  }

  fn toggle_local_sort(&mut self, column: SortColumn) {
    self.local_sort = self.local_sort.toggle(column);
  }

  /// Remove the selected file optimistically and confirm remotely.
  fn delete_selected(&mut self) {
    let displayed = self.displayed_files();
    let Some(entry) = displayed.get(self.selected) else {
      return;
    };
    let key = entry.key.clone();
    let name = entry.name.clone();

    if self.pending_deletes.is_pending(&key) {
      self.notice = Some(format!("delete already in flight for {name}"));
      return;
    }
    if !self.pending_deletes.begin(&key, &mut self.files) {
      return;
    }

    if self.selected >= self.files.len() && self.selected > 0 {
      self.selected -= 1;
    }

    let vault = self.vault.clone();
    let tx = self.event_tx.clone();
    tokio::spawn(async move {
      match vault.delete_file(&key).await {
        Ok(()) => {
          let _ = tx.send(Event::Vault(VaultEvent::DeleteOk { key }));
        }
        Err(error) => {
          let _ = tx.send(Event::Vault(VaultEvent::DeleteFailed { key, error }));
        }
      }
    });
  }

  /// Download the selected file into the configured downloads directory.
  fn download_selected(&mut self) {
    let displayed = self.displayed_files();
    let Some(entry) = displayed.get(self.selected) else {
      return;
    };
    let key = entry.key.clone();
    let dir = self.config.downloads_dir();
    let vault = self.vault.clone();
    let tx = self.event_tx.clone();

    self.notice = Some(format!("downloading {}...", entry.name));

    tokio::spawn(async move {
      let result = async {
        let download = vault.download_file(&key).await?;
        // Keep whatever name the server suggested inside the downloads dir
        let file_name = download.file_name.replace(['/', '\\'], "_");
        let path = dir.join(file_name);
        tokio::fs::write(&path, &download.bytes)
          .await
          .map_err(|e| ApiError::Internal(format!("write failed: {e}")))?;
        Ok::<_, ApiError>(path)
      }
      .await;

      let event = match result {
        Ok(path) => VaultEvent::DownloadOk { path },
        Err(error) => VaultEvent::DownloadFailed { error },
      };
      let _ = tx.send(Event::Vault(event));
    });
  }

  fn handle_vault_event(&mut self, event: VaultEvent) {
    match event {
      VaultEvent::PageLoaded { epoch, page } => {
        if epoch != self.fetch_epoch {
          debug!(epoch, current = self.fetch_epoch, "dropping superseded page response");
          return;
        }
        self.files = page.files;
        self.total_count = page.total_count;
        self.has_next_page = page.has_next_page;
        // A fresh page starts un-overlaid
        self.local_sort = LocalSort::default();
        self.selected = 0;
        self.loading = false;
      }
      VaultEvent::PageFailed { epoch, error } => {
        if epoch != self.fetch_epoch {
          debug!(epoch, "dropping superseded fetch failure");
          return;
        }
        self.loading = false;
        self.report_api_error("list failed", &error);
      }
      VaultEvent::DeleteOk { key } => {
        self.pending_deletes.commit(&key);
        if let Some(total) = self.total_count.as_mut() {
          // Cached pages keep their recorded totals until refetched
          *total = total.saturating_sub(1);
          debug!(key = %key, "decremented displayed total after delete");
        }
      }
      VaultEvent::DeleteFailed { key, error } => {
        self.pending_deletes.rollback(&key, &mut self.files);
        self.report_api_error("delete failed", &error);
      }
      VaultEvent::DownloadOk { path } => {
        self.notice = Some(format!("saved to {}", path.display()));
      }
      VaultEvent::DownloadFailed { error } => {
        self.report_api_error("download failed", &error);
      }
    }
  }

  /// Surface a remote failure; an expired session ends the run instead.
  fn report_api_error(&mut self, context: &str, error: &ApiError) {
    if error.is_unauthenticated() {
      self.fatal = Some("Session expired. Log in again to get a fresh token.".to_string());
      self.should_quit = true;
    } else {
      warn!("{context}: {error}");
      self.notice = Some(format!("{context}: {error}"));
    }
  }

  fn move_selection(&mut self, delta: i32) {
    let len = self.files.len();
    if len > 0 {
      self.selected = (self.selected as i32 + delta).rem_euclid(len as i32) as usize;
    }
  }

  // Accessors for UI rendering

  /// The current page with the local sort overlay applied.
  pub fn displayed_files(&self) -> Vec<FileEntry> {
    apply_local_sort(&self.files, self.local_sort)
  }

  /// Numbered pagination strip, or None while the total is unknown.
  pub fn pagination(&self) -> Option<Vec<PageMarker>> {
    self.total_count.map(|total| {
      let last = last_page(total, self.params.limit.as_u32());
      window_of(self.params.page.min(last), last, PAGE_WINDOW_DELTA)
    })
  }

  pub fn mode(&self) -> &Mode {
    &self.mode
  }

  pub fn command_input(&self) -> &str {
    &self.command_input
  }

  pub fn filter_input(&self) -> &str {
    &self.filter_input
  }

  pub fn autocomplete_suggestions(&self) -> Vec<&'static commands::Command> {
    commands::get_suggestions(&self.command_input)
  }

  pub fn selected_suggestion(&self) -> usize {
    self.selected_suggestion
  }

  pub fn notice(&self) -> Option<&str> {
    self.notice.as_deref()
  }

  pub fn loading(&self) -> bool {
    self.loading
  }

  pub fn selected(&self) -> usize {
    self.selected
  }

  pub fn params(&self) -> &QueryParams {
    &self.params
  }

  pub fn local_sort(&self) -> LocalSort {
    self.local_sort
  }

  pub fn total_count(&self) -> Option<u64> {
    self.total_count
  }

  pub fn has_next_page(&self) -> bool {
    self.has_next_page
  }

  pub fn deletes_in_flight(&self) -> usize {
    self.pending_deletes.in_flight()
  }

  pub fn cached_pages(&self) -> usize {
    self.vault.cached_pages()
  }

  pub fn vault_url(&self) -> &str {
    &self.config.vault.url
  }
}

fn column_for_digit(digit: char) -> Option<SortColumn> {
  match digit {
    '1' => Some(SortColumn::Name),
    '2' => Some(SortColumn::Description),
    '3' => Some(SortColumn::UploaderEmail),
    '4' => Some(SortColumn::UploadedAt),
    _ => None,
  }
}
