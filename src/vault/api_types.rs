//! Wire-format types for the vault HTTP API.

use serde::Deserialize;

use super::types::{FileEntry, FilePage};

/// One file as the listing endpoint returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFileEntry {
  pub s3_key: String,
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  pub uploader_email: String,
  pub uploaded_at: String,
}

/// Listing response. Servers report either a total count or a next-page
/// flag, sometimes both.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFilePage {
  pub files: Vec<ApiFileEntry>,
  #[serde(default)]
  pub total_count: Option<u64>,
  #[serde(default)]
  pub has_next_page: Option<bool>,
}

impl ApiFileEntry {
  fn into_entry(self) -> FileEntry {
    FileEntry {
      key: self.s3_key,
      name: self.name,
      description: self.description.unwrap_or_default(),
      uploader_email: self.uploader_email,
      uploaded_at: self.uploaded_at,
    }
  }
}

impl ApiFilePage {
  /// Convert to the domain page, deriving the next-page flag from the total
  /// count when the server sent no explicit flag.
  pub fn into_page(self, page: u32, limit: u32) -> FilePage {
    let total_count = self.total_count;
    let has_next_page = match (self.has_next_page, total_count) {
      (Some(flag), _) => flag,
      (None, Some(total)) => u64::from(page) * u64::from(limit) < total,
      (None, None) => false,
    };

    FilePage {
      files: self.files.into_iter().map(ApiFileEntry::into_entry).collect(),
      total_count,
      has_next_page,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(key: &str) -> ApiFileEntry {
    ApiFileEntry {
      s3_key: key.to_string(),
      name: format!("{key}.txt"),
      description: None,
      uploader_email: "a@b.c".to_string(),
      uploaded_at: "2024-01-01T00:00:00.000".to_string(),
    }
  }

  #[test]
  fn test_parses_camel_case_fields() {
    let json = r#"{
      "files": [{
        "s3Key": "abc",
        "name": "a.txt",
        "uploaderEmail": "a@b.c",
        "uploadedAt": "2024-01-01T00:00:00.000"
      }],
      "totalCount": 41
    }"#;

    let page: ApiFilePage = serde_json::from_str(json).unwrap();
    assert_eq!(page.files[0].s3_key, "abc");
    assert_eq!(page.total_count, Some(41));
    assert_eq!(page.has_next_page, None);
  }

  #[test]
  fn test_missing_description_becomes_empty() {
    assert_eq!(entry("k").into_entry().description, "");
  }

  #[test]
  fn test_next_page_derived_from_total() {
    let page = ApiFilePage {
      files: vec![entry("a")],
      total_count: Some(41),
      has_next_page: None,
    };
    assert!(page.into_page(2, 20).has_next_page);

    let page = ApiFilePage {
      files: vec![entry("a")],
      total_count: Some(40),
      has_next_page: None,
    };
    assert!(!page.into_page(2, 20).has_next_page);
  }

  #[test]
  fn test_explicit_flag_wins_over_total() {
    let page = ApiFilePage {
      files: vec![],
      total_count: Some(1000),
      has_next_page: Some(false),
    };
    assert!(!page.into_page(1, 10).has_next_page);
  }
}
