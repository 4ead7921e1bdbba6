//! Optimistic delete tracking with rollback.

use std::collections::HashMap;

use crate::vault::types::FileEntry;

/// A removed entry held for possible rollback.
#[derive(Debug, Clone)]
struct Removed {
  entry: FileEntry,
  position: usize,
}

/// In-flight optimistic deletes, keyed by storage key.
///
/// `begin` removes the entry from the visible list before the server has
/// confirmed anything; `rollback` puts it back where it was. A key that is
/// already pending is refused, so two deletes never race on one entry.
#[derive(Debug, Default)]
pub struct PendingDeletes {
  pending: HashMap<String, Removed>,
}

impl PendingDeletes {
  /// Capture and remove `key` from `files`.
  ///
  /// Returns false when the key is not in the list or a delete for it is
  /// already in flight; the list is untouched in both cases.
  pub fn begin(&mut self, key: &str, files: &mut Vec<FileEntry>) -> bool {
    if self.pending.contains_key(key) {
      return false;
    }

    let Some(position) = files.iter().position(|f| f.key == key) else {
      return false;
    };

    let entry = files.remove(position);
    self.pending.insert(key.to_string(), Removed { entry, position });
    true
  }

  /// The server accepted the delete; drop the captured snapshot.
  pub fn commit(&mut self, key: &str) -> bool {
    self.pending.remove(key).is_some()
  }

  /// The delete failed; restore the entry at its captured position.
  ///
  /// If the list was reloaded meanwhile and already shows the key again,
  /// the snapshot is discarded instead of inserting a duplicate.
  pub fn rollback(&mut self, key: &str, files: &mut Vec<FileEntry>) -> bool {
    let Some(Removed { entry, position }) = self.pending.remove(key) else {
      return false;
    };

    if files.iter().any(|f| f.key == key) {
      return false;
    }

    files.insert(position.min(files.len()), entry);
    true
  }

  pub fn is_pending(&self, key: &str) -> bool {
    self.pending.contains_key(key)
  }

  pub fn in_flight(&self) -> usize {
    self.pending.len()
  }
}
