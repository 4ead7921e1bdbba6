//! Windowed page-number strip with ellipsis markers.

/// One slot in the pagination strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
  Page(u32),
  LeftEllipsis,
  RightEllipsis,
}

/// Last page for a known total, never below 1.
pub fn last_page(total_count: u64, limit: u32) -> u32 {
  let pages = total_count.div_ceil(u64::from(limit.max(1)));
  u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

/// Pages to show around `current`, with `delta` neighbors on each side.
///
/// Page 1 and the last page are always present; a run of skipped pages on
/// either side collapses into an ellipsis marker.
pub fn window_of(current: u32, last: u32, delta: u32) -> Vec<PageMarker> {
  debug_assert!(current >= 1 && current <= last.max(1));

  let mut window = vec![PageMarker::Page(1)];
  if last <= 1 {
    return window;
  }

  if current.saturating_sub(delta) > 2 {
    window.push(PageMarker::LeftEllipsis);
  }

  let from = current.saturating_sub(delta).max(2);
  let to = (current + delta).min(last - 1);
  for page in from..=to {
    window.push(PageMarker::Page(page));
  }

  if current + delta < last - 1 {
    window.push(PageMarker::RightEllipsis);
  }

  window.push(PageMarker::Page(last));
  window
}

#[cfg(test)]
mod tests {
  use super::*;
  use PageMarker::*;

  #[test]
  fn test_window_in_the_middle() {
    assert_eq!(
      window_of(5, 10, 2),
      vec![
        Page(1),
        LeftEllipsis,
        Page(3),
        Page(4),
        Page(5),
        Page(6),
        Page(7),
        RightEllipsis,
        Page(10)
      ]
    );
  }

  #[test]
  fn test_single_page() {
    assert_eq!(window_of(1, 1, 2), vec![Page(1)]);
  }

  #[test]
  fn test_start_has_no_left_ellipsis() {
    assert_eq!(
      window_of(1, 10, 2),
      vec![Page(1), Page(2), Page(3), RightEllipsis, Page(10)]
    );
  }

  #[test]
  fn test_end_has_no_right_ellipsis() {
    assert_eq!(
      window_of(10, 10, 2),
      vec![Page(1), LeftEllipsis, Page(8), Page(9), Page(10)]
    );
  }

  #[test]
  fn test_small_range_has_no_ellipses() {
    assert_eq!(window_of(2, 3, 2), vec![Page(1), Page(2), Page(3)]);
  }

  #[test]
  fn test_last_page_rounds_up() {
    assert_eq!(last_page(41, 20), 3);
    assert_eq!(last_page(40, 20), 2);
    assert_eq!(last_page(0, 20), 1);
    assert_eq!(last_page(1, 20), 1);
  }
}
