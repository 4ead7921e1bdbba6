use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::vault::error::ApiError;
use crate::vault::types::FilePage;

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Periodic tick for UI refresh
  Tick,
  /// Completed vault call
  Vault(VaultEvent),
}

/// Results of async vault calls, applied by the app on arrival.
#[derive(Debug)]
pub enum VaultEvent {
  /// A list response, stamped with the fetch epoch it belongs to.
  PageLoaded { epoch: u64, page: FilePage },
  /// A list request failed; stale-epoch failures are dropped like stale pages.
  PageFailed { epoch: u64, error: ApiError },
  DeleteOk { key: String },
  DeleteFailed { key: String, error: ApiError },
  DownloadOk { path: PathBuf },
  DownloadFailed { error: ApiError },
}

/// Event handler that produces events from terminal input and a tick timer
pub struct EventHandler {
  tx: mpsc::UnboundedSender<Event>,
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    // Spawn terminal event reader
    let input_tx = tx.clone();
    tokio::spawn(async move {
      loop {
        if event::poll(tick_rate).unwrap_or(false) {
          if let Ok(evt) = event::read() {
            if let CrosstermEvent::Key(key) = evt {
              if input_tx.send(Event::Key(key)).is_err() {
                break;
              }
            }
          }
        } else {
          // Tick
          if input_tx.send(Event::Tick).is_err() {
            break;
          }
        }
      }
    });

    Self { tx, rx }
  }

  /// Sender for async tasks to report vault results through
  pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
    self.tx.clone()
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}
