//! Durable snapshot stores for the bounded query cache.

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection};
use std::path::PathBuf;
use std::sync::Mutex;

/// Where a cache writes its serialized state.
///
/// The snapshot is one opaque record, replaced wholesale on every write.
/// Stores never interpret the payload.
pub trait SnapshotStore: Send + Sync {
  fn load(&self) -> Result<Option<Vec<u8>>>;
  fn save(&self, data: &[u8]) -> Result<()>;
}

/// Store that persists nothing. Used when persistence is disabled.
pub struct NoopSnapshot;

impl SnapshotStore for NoopSnapshot {
  fn load(&self) -> Result<Option<Vec<u8>>> {
    Ok(None)
  }

  fn save(&self, _data: &[u8]) -> Result<()> {
    Ok(())
  }
}

/// SQLite-backed snapshot store.
pub struct SqliteSnapshot {
  conn: Mutex<Connection>,
}

/// Single-row table; every save replaces the one record.
const SNAPSHOT_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS query_snapshot (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    data BLOB NOT NULL,
    saved_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

impl SqliteSnapshot {
  /// Open or create the snapshot database at the default location.
  pub fn open() -> Result<Self> {
    let path = Self::default_path()?;

    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create cache directory: {}", e))?;
    }

    let conn = Connection::open(&path)
      .map_err(|e| eyre!("Failed to open cache database at {}: {}", path.display(), e))?;

    Self::with_connection(conn)
  }

  /// Get the default database path.
  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("f9s").join("cache.db"))
  }

  fn with_connection(conn: Connection) -> Result<Self> {
    conn
      .execute_batch(SNAPSHOT_SCHEMA)
      .map_err(|e| eyre!("Failed to create snapshot table: {}", e))?;

    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  #[cfg(test)]
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory().map_err(|e| eyre!("{}", e))?;
    Self::with_connection(conn)
  }
}

impl SnapshotStore for SqliteSnapshot {
  fn load(&self) -> Result<Option<Vec<u8>>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    let mut stmt = conn
      .prepare("SELECT data FROM query_snapshot WHERE id = 1")
      .map_err(|e| eyre!("Failed to prepare snapshot query: {}", e))?;

    let data: Option<Vec<u8>> = stmt.query_row([], |row| row.get(0)).ok();
    Ok(data)
  }

  fn save(&self, data: &[u8]) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute(
        "INSERT OR REPLACE INTO query_snapshot (id, data, saved_at)
         VALUES (1, ?, datetime('now'))",
        params![data],
      )
      .map_err(|e| eyre!("Failed to save snapshot: {}", e))?;

    Ok(())
  }
}

/// In-memory store, shared across clones so tests can observe writes.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemorySnapshot {
  data: std::sync::Arc<Mutex<Option<Vec<u8>>>>,
}

#[cfg(test)]
impl MemorySnapshot {
  pub fn preloaded(data: Vec<u8>) -> Self {
    Self {
      data: std::sync::Arc::new(Mutex::new(Some(data))),
    }
  }
}

#[cfg(test)]
impl SnapshotStore for MemorySnapshot {
  fn load(&self) -> Result<Option<Vec<u8>>> {
    Ok(self.data.lock().unwrap().clone())
  }

  fn save(&self, data: &[u8]) -> Result<()> {
    *self.data.lock().unwrap() = Some(data.to_vec());
    Ok(())
  }
}
