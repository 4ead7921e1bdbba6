//! Query parameters for vault list requests and their canonical cache keys.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Page sizes the vault API accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLimit {
  Ten,
  #[default]
  Twenty,
  Fifty,
}

impl PageLimit {
  pub fn as_u32(self) -> u32 {
    match self {
      PageLimit::Ten => 10,
      PageLimit::Twenty => 20,
      PageLimit::Fifty => 50,
    }
  }

  /// Next size in the 10 -> 20 -> 50 cycle.
  pub fn cycle(self) -> Self {
    match self {
      PageLimit::Ten => PageLimit::Twenty,
      PageLimit::Twenty => PageLimit::Fifty,
      PageLimit::Fifty => PageLimit::Ten,
    }
  }
}

/// Columns the server can sort by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortColumn {
  #[default]
  Name,
  Description,
  UploaderEmail,
  UploadedAt,
}

impl SortColumn {
  /// Query-string value the server expects.
  pub fn as_param(self) -> &'static str {
    match self {
      SortColumn::Name => "name",
      SortColumn::Description => "description",
      SortColumn::UploaderEmail => "uploaderEmail",
      SortColumn::UploadedAt => "uploadedAt",
    }
  }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
  #[default]
  Asc,
  Desc,
}

impl SortOrder {
  pub fn as_param(self) -> &'static str {
    match self {
      SortOrder::Asc => "asc",
      SortOrder::Desc => "desc",
    }
  }

  pub fn toggled(self) -> Self {
    match self {
      SortOrder::Asc => SortOrder::Desc,
      SortOrder::Desc => SortOrder::Asc,
    }
  }
}

/// Optional server-side filters.
///
/// Absent fields still participate in the cache key, so "no filter" and
/// "empty-string filter" produce distinct keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
  pub name: Option<String>,
  pub description: Option<String>,
  pub uploader_email: Option<String>,
  pub uploaded_after: Option<NaiveDate>,
  pub uploaded_before: Option<NaiveDate>,
}

/// One immutable combination of page, limit, sort and filters.
///
/// Every change of any field builds a new value; nothing mutates in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
  pub page: u32,
  pub limit: PageLimit,
  pub sort_by: SortColumn,
  pub sort_order: SortOrder,
  pub filters: Filters,
}

impl Default for QueryParams {
  fn default() -> Self {
    Self {
      page: 1,
      limit: PageLimit::default(),
      sort_by: SortColumn::default(),
      sort_order: SortOrder::default(),
      filters: Filters::default(),
    }
  }
}

impl QueryParams {
  /// Next page; the caller gates this on the server's next-page flag.
  pub fn next_page(&self) -> Self {
    Self {
      page: self.page + 1,
      ..self.clone()
    }
  }

  /// Previous page, never below 1.
  pub fn prev_page(&self) -> Self {
    Self {
      page: self.page.max(2) - 1,
      ..self.clone()
    }
  }

  /// New page size; resets to the first page.
  pub fn with_limit(&self, limit: PageLimit) -> Self {
    Self {
      page: 1,
      limit,
      ..self.clone()
    }
  }

  /// Server sort toggle: the same column flips the order, a new column
  /// starts ascending. Resets to the first page.
  pub fn toggle_sort(&self, column: SortColumn) -> Self {
    let sort_order = if self.sort_by == column {
      self.sort_order.toggled()
    } else {
      SortOrder::Asc
    };
    Self {
      page: 1,
      sort_by: column,
      sort_order,
      ..self.clone()
    }
  }

  /// New name filter (`None` clears it). Resets to the first page.
  pub fn with_name_filter(&self, name: Option<String>) -> Self {
    Self {
      page: 1,
      filters: Filters {
        name,
        ..self.filters.clone()
      },
      ..self.clone()
    }
  }

  /// Clear every filter. Resets to the first page.
  pub fn without_filters(&self) -> Self {
    Self {
      page: 1,
      filters: Filters::default(),
      ..self.clone()
    }
  }

  /// Canonical cache key for this parameter set.
  ///
  /// Every field participates, serialized as a JSON array in a fixed order,
  /// so field-wise equal values always map to the same key and the
  /// serializer's escaping keeps distinct filter sets from colliding.
  /// SHA-256 gives a stable, fixed-length key.
  pub fn cache_key(&self) -> String {
    let canonical = serde_json::json!([
      self.page,
      self.limit.as_u32(),
      self.sort_by.as_param(),
      self.sort_order.as_param(),
      self.filters.name,
      self.filters.description,
      self.filters.uploader_email,
      self.filters.uploaded_after,
      self.filters.uploaded_before,
    ]);

    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string().as_bytes());
    hex::encode(hasher.finalize())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_equal_params_equal_key() {
    let p1 = QueryParams {
      page: 3,
      limit: PageLimit::Fifty,
      sort_by: SortColumn::UploadedAt,
      sort_order: SortOrder::Desc,
      filters: Filters {
        name: Some("report".to_string()),
        uploaded_after: Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
        ..Filters::default()
      },
    };

    // Same fields assembled in a different order.
    let mut p2 = QueryParams::default();
    p2.filters.uploaded_after = NaiveDate::from_ymd_opt(2024, 1, 1);
    p2.filters.name = Some("report".to_string());
    p2.sort_order = SortOrder::Desc;
    p2.sort_by = SortColumn::UploadedAt;
    p2.limit = PageLimit::Fifty;
    p2.page = 3;

    assert_eq!(p1, p2);
    assert_eq!(p1.cache_key(), p2.cache_key());
  }

  #[test]
  fn test_any_field_change_changes_key() {
    let base = QueryParams::default();
    let variants = [
      base.next_page(),
      base.with_limit(PageLimit::Fifty),
      base.toggle_sort(SortColumn::UploadedAt),
      base.toggle_sort(SortColumn::Name), // flips order on the default column
      base.with_name_filter(Some("a".to_string())),
    ];

    let base_key = base.cache_key();
    for variant in &variants {
      assert_ne!(variant.cache_key(), base_key, "{variant:?}");
    }
  }

  #[test]
  fn test_absent_and_empty_filter_differ() {
    let absent = QueryParams::default();
    let empty = absent.with_name_filter(Some(String::new()));
    assert_ne!(absent.cache_key(), empty.cache_key());
  }

  #[test]
  fn test_toggle_sort_cycle() {
    let p = QueryParams::default();
    let once = p.toggle_sort(SortColumn::Description);
    assert_eq!(once.sort_by, SortColumn::Description);
    assert_eq!(once.sort_order, SortOrder::Asc);

    let twice = once.toggle_sort(SortColumn::Description);
    assert_eq!(twice.sort_order, SortOrder::Desc);

    // Switching column always restarts ascending.
    let switched = twice.toggle_sort(SortColumn::Name);
    assert_eq!(switched.sort_by, SortColumn::Name);
    assert_eq!(switched.sort_order, SortOrder::Asc);
  }

  #[test]
  fn test_page_arithmetic_saturates() {
    let p = QueryParams::default();
    assert_eq!(p.prev_page().page, 1);
    assert_eq!(p.next_page().page, 2);
    assert_eq!(p.next_page().prev_page().page, 1);
  }
}
