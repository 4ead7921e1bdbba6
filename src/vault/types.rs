//! Domain types for vault entries and pages.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A stored file as the vault lists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
  /// Opaque storage key; list identity and the argument to download/delete.
  pub key: String,
  pub name: String,
  /// Empty when the uploader gave none.
  pub description: String,
  pub uploader_email: String,
  /// Upload timestamp as the server sent it (ISO-like string).
  pub uploaded_at: String,
}

/// One page of listing results; exactly what one query returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePage {
  pub files: Vec<FileEntry>,
  /// Absent when the server reports only a next-page flag.
  pub total_count: Option<u64>,
  pub has_next_page: bool,
}

/// A downloaded blob plus the name the server suggested for it.
#[derive(Debug, Clone)]
pub struct Download {
  pub file_name: String,
  pub bytes: Vec<u8>,
}

/// Timestamps are parseable only up to this prefix; some servers append a
/// zone suffix behind it.
const TIMESTAMP_PREFIX_LEN: usize = 23;

/// Render an upload timestamp for display as `dd.MM.yyyy HH:mm`.
///
/// Only the first 23 characters of the server string are parsed; anything
/// that does not parse is shown verbatim.
pub fn format_uploaded_at(raw: &str) -> String {
  let prefix = raw.get(..TIMESTAMP_PREFIX_LEN).unwrap_or(raw);

  match NaiveDateTime::parse_from_str(prefix, "%Y-%m-%dT%H:%M:%S%.f") {
    Ok(dt) => dt.format("%d.%m.%Y %H:%M").to_string(),
    Err(_) => raw.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format_uploaded_at_with_millis() {
    assert_eq!(
      format_uploaded_at("2024-03-05T09:07:30.123"),
      "05.03.2024 09:07"
    );
  }

  #[test]
  fn test_format_uploaded_at_strips_zone_suffix() {
    assert_eq!(
      format_uploaded_at("2024-03-05T09:07:30.123+02:00[Europe/Bucharest]"),
      "05.03.2024 09:07"
    );
  }

  #[test]
  fn test_format_uploaded_at_unparsable_is_verbatim() {
    assert_eq!(format_uploaded_at("yesterday"), "yesterday");
    assert_eq!(format_uploaded_at(""), "");
  }
}
