//! Client-side sort overlay for the page currently on screen.
//!
//! The overlay re-orders only the in-memory list; it never touches the
//! server query or the cache.

use crate::vault::params::{SortColumn, SortOrder};
use crate::vault::types::FileEntry;

/// Overlay sort state, one tagged value so the per-column cycle
/// unsorted -> ascending -> descending -> unsorted is a total function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LocalSort {
  #[default]
  Unsorted,
  SortedBy { column: SortColumn, order: SortOrder },
}

impl LocalSort {
  /// Advance the cycle for `column`. Choosing a different column restarts
  /// at ascending.
  pub fn toggle(self, column: SortColumn) -> Self {
    match self {
      LocalSort::SortedBy {
        column: current,
        order: SortOrder::Asc,
      } if current == column => LocalSort::SortedBy {
        column,
        order: SortOrder::Desc,
      },
      LocalSort::SortedBy {
        column: current,
        order: SortOrder::Desc,
      } if current == column => LocalSort::Unsorted,
      _ => LocalSort::SortedBy {
        column,
        order: SortOrder::Asc,
      },
    }
  }

  /// Overlay direction for `column`, if it is the overlaid one.
  pub fn order_for(&self, column: SortColumn) -> Option<SortOrder> {
    match self {
      LocalSort::SortedBy { column: c, order } if *c == column => Some(*order),
      _ => None,
    }
  }
}

/// Re-order `files` by the overlay without mutating the input.
///
/// `Unsorted` hands back the server order unchanged. Comparison is
/// case-insensitive on the chosen column; the sort is stable.
pub fn apply_local_sort(files: &[FileEntry], sort: LocalSort) -> Vec<FileEntry> {
  let LocalSort::SortedBy { column, order } = sort else {
    return files.to_vec();
  };

  let mut sorted = files.to_vec();
  sorted.sort_by(|a, b| {
    let ordering = sort_value(a, column).cmp(&sort_value(b, column));
    match order {
      SortOrder::Asc => ordering,
      SortOrder::Desc => ordering.reverse(),
    }
  });
  sorted
}

fn sort_value(entry: &FileEntry, column: SortColumn) -> String {
  let value = match column {
    SortColumn::Name => &entry.name,
    SortColumn::Description => &entry.description,
    SortColumn::UploaderEmail => &entry.uploader_email,
    SortColumn::UploadedAt => &entry.uploaded_at,
  };
  value.to_lowercase()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(name: &str, description: &str) -> FileEntry {
    FileEntry {
      key: name.to_string(),
      name: name.to_string(),
      description: description.to_string(),
      uploader_email: "a@b.c".to_string(),
      uploaded_at: "2024-01-01T00:00:00.000".to_string(),
    }
  }

  #[test]
  fn test_unsorted_preserves_server_order() {
    let files = vec![entry("zeta", ""), entry("alpha", "")];
    let out = apply_local_sort(&files, LocalSort::Unsorted);
    assert_eq!(out, files);
  }

  #[test]
  fn test_sort_is_case_insensitive() {
    let files = vec![entry("banana", ""), entry("Apple", ""), entry("cherry", "")];
    let out = apply_local_sort(
      &files,
      LocalSort::SortedBy {
        column: SortColumn::Name,
        order: SortOrder::Asc,
      },
    );
    let names: Vec<&str> = out.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["Apple", "banana", "cherry"]);
  }

  #[test]
  fn test_descending_reverses() {
    let files = vec![entry("a", ""), entry("b", "")];
    let out = apply_local_sort(
      &files,
      LocalSort::SortedBy {
        column: SortColumn::Name,
        order: SortOrder::Desc,
      },
    );
    let names: Vec<&str> = out.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["b", "a"]);
  }

  #[test]
  fn test_missing_description_sorts_as_empty() {
    let files = vec![entry("x", "zzz"), entry("y", "")];
    let out = apply_local_sort(
      &files,
      LocalSort::SortedBy {
        column: SortColumn::Description,
        order: SortOrder::Asc,
      },
    );
    assert_eq!(out[0].name, "y");
  }

  #[test]
  fn test_toggle_three_state_cycle() {
    let start = LocalSort::Unsorted;
    let first = start.toggle(SortColumn::Name);
    assert_eq!(
      first,
      LocalSort::SortedBy {
        column: SortColumn::Name,
        order: SortOrder::Asc
      }
    );

    let second = first.toggle(SortColumn::Name);
    assert_eq!(
      second,
      LocalSort::SortedBy {
        column: SortColumn::Name,
        order: SortOrder::Desc
      }
    );

    let third = second.toggle(SortColumn::Name);
    assert_eq!(third, LocalSort::Unsorted);

    // A fourth toggle reproduces the first.
    assert_eq!(third.toggle(SortColumn::Name), first);
  }

  #[test]
  fn test_toggle_other_column_resets_to_ascending() {
    let sorted_desc = LocalSort::SortedBy {
      column: SortColumn::Name,
      order: SortOrder::Desc,
    };
    assert_eq!(
      sorted_desc.toggle(SortColumn::UploadedAt),
      LocalSort::SortedBy {
        column: SortColumn::UploadedAt,
        order: SortOrder::Asc
      }
    );
  }
}
