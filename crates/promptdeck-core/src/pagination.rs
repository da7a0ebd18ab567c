//! Pagination metadata and the page-window algorithm.
//!
//! [`PaginationMeta`] is computed by the server for every list response.
//! [`compute_page_window`] is the client-side algorithm that turns
//! `(current_page, total_pages)` into the page-number controls to render:
//!
//! ```text
//! current=5, total=10  ->  1 … 3 4 [5] 6 7 … 10
//! ```

use serde::{Deserialize, Serialize, Serializer};

use crate::defaults::ELLIPSIS;

// =============================================================================
// PAGINATION METADATA
// =============================================================================

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PaginationMeta {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub per_page: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Derive metadata for `page` of size `per_page` out of `total_count` matches.
    ///
    /// `total_pages` is `ceil(total_count / per_page)`, so an empty result has
    /// zero pages.
    pub fn new(current_page: i64, per_page: i64, total_count: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total_count + per_page - 1) / per_page
        } else {
            0
        };
        Self {
            current_page,
            total_pages,
            total_count,
            per_page,
            has_next: current_page < total_pages,
            has_prev: current_page > 1,
        }
    }

    /// Item range shown on the current page, `None` when it holds no items.
    pub fn summary(&self) -> Option<PageSummary> {
        PageSummary::new(self.current_page, self.per_page, self.total_count)
    }
}

/// "Showing first–last of total" range for the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub first_item: i64,
    pub last_item: i64,
    pub total_count: i64,
}

impl PageSummary {
    /// `None` for an empty result or a page past the last one.
    pub fn new(current_page: i64, per_page: i64, total_count: i64) -> Option<Self> {
        let first_item = (current_page - 1) * per_page + 1;
        if current_page < 1 || per_page < 1 || first_item > total_count {
            return None;
        }
        Some(Self {
            first_item,
            last_item: (current_page * per_page).min(total_count),
            total_count,
        })
    }
}

// =============================================================================
// PAGE WINDOW
// =============================================================================

/// One entry in the rendered page-number sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    /// A clickable page number.
    Page(u32),
    /// Collapsed range of pages.
    Ellipsis,
}

impl PageMarker {
    /// Page number, `None` for an ellipsis.
    pub fn page(&self) -> Option<u32> {
        match self {
            PageMarker::Page(n) => Some(*n),
            PageMarker::Ellipsis => None,
        }
    }
}

/// Serializes as a JSON number or the string `"..."`, the shape renderers consume.
impl Serialize for PageMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageMarker::Page(n) => serializer.serialize_u32(*n),
            PageMarker::Ellipsis => serializer.serialize_str(ELLIPSIS),
        }
    }
}

/// Compute the page markers to render for `current_page` of `total_pages`.
///
/// Shows up to `delta` pages either side of the current one, widening the
/// window to `2 * delta + 1` pages when it touches either end. The first and
/// last pages are always reachable; gaps of more than one page collapse into
/// an ellipsis. Returns nothing when there is at most one page.
///
/// # Examples
///
/// ```
/// use promptdeck_core::{compute_page_window, PageMarker::{Ellipsis, Page}};
///
/// assert_eq!(
///     compute_page_window(5, 10, 2),
///     vec![Page(1), Ellipsis, Page(3), Page(4), Page(5), Page(6), Page(7), Ellipsis, Page(10)]
/// );
/// assert!(compute_page_window(1, 1, 2).is_empty());
/// ```
pub fn compute_page_window(current_page: u32, total_pages: u32, delta: u32) -> Vec<PageMarker> {
    if total_pages <= 1 {
        return Vec::new();
    }

    // Signed arithmetic: current - delta goes below zero near the first page.
    let current = i64::from(current_page);
    let total = i64::from(total_pages);
    let delta = i64::from(delta);

    let mut start = (current - delta).max(1);
    let mut end = (current + delta).min(total);

    if current - delta <= 1 {
        end = total.min(1 + delta * 2);
    } else if current + delta >= total {
        start = (total - delta * 2).max(1);
    }

    let mut markers = Vec::with_capacity((end - start + 5).max(0) as usize);

    if start > 1 {
        markers.push(PageMarker::Page(1));
        if start > 2 {
            markers.push(PageMarker::Ellipsis);
        }
    }

    markers.extend((start..=end).map(|n| PageMarker::Page(n as u32)));

    if end < total - 1 {
        markers.push(PageMarker::Ellipsis);
        markers.push(PageMarker::Page(total_pages));
    } else if end == total - 1 {
        markers.push(PageMarker::Page(total_pages));
    }

    markers
}

/// Everything a renderer needs for the pagination bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageControls {
    pub current_page: u32,
    pub total_pages: u32,
    pub markers: Vec<PageMarker>,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

impl PageControls {
    /// Controls for `current_page` of `total_pages`, or `None` when there is
    /// nothing to paginate.
    pub fn new(current_page: u32, total_pages: u32, delta: u32) -> Option<Self> {
        if total_pages <= 1 {
            return None;
        }
        Some(Self {
            current_page,
            total_pages,
            markers: compute_page_window(current_page, total_pages, delta),
            prev_disabled: current_page <= 1,
            next_disabled: current_page >= total_pages,
        })
    }

    /// Page a "previous" click navigates to, if enabled.
    pub fn prev_target(&self) -> Option<u32> {
        (!self.prev_disabled).then(|| self.current_page - 1)
    }

    /// Page a "next" click navigates to, if enabled.
    pub fn next_target(&self) -> Option<u32> {
        (!self.next_disabled).then(|| self.current_page + 1)
    }

    /// Whether `marker` is the active page.
    pub fn is_active(&self, marker: &PageMarker) -> bool {
        marker.page() == Some(self.current_page)
    }
}

#[cfg(test)]
mod tests {
    use super::PageMarker::{Ellipsis, Page};
    use super::*;

    fn pages(markers: &[PageMarker]) -> Vec<u32> {
        markers.iter().filter_map(PageMarker::page).collect()
    }

    // ─── PaginationMeta ────────────────────────────────────────────────────

    #[test]
    fn test_meta_total_pages_rounds_up() {
        let meta = PaginationMeta::new(1, 12, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn test_meta_exact_multiple() {
        let meta = PaginationMeta::new(2, 12, 24);
        assert_eq!(meta.total_pages, 2);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_meta_empty_result() {
        let meta = PaginationMeta::new(1, 12, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn test_meta_page_past_end() {
        let meta = PaginationMeta::new(9, 10, 15);
        assert_eq!(meta.total_pages, 2);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_meta_invariants_over_grid() {
        for total_count in 0..60 {
            for per_page in 1..15 {
                for page in 1..8 {
                    let meta = PaginationMeta::new(page, per_page, total_count);
                    let expected = (total_count as f64 / per_page as f64).ceil() as i64;
                    assert_eq!(meta.total_pages, expected);
                    assert_eq!(meta.has_next, page < expected);
                    assert_eq!(meta.has_prev, page > 1);
                }
            }
        }
    }

    #[test]
    fn test_meta_serializes_field_names() {
        let json = serde_json::to_value(PaginationMeta::new(1, 12, 13)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "current_page": 1,
                "total_pages": 2,
                "total_count": 13,
                "per_page": 12,
                "has_next": true,
                "has_prev": false
            })
        );
    }

    #[test]
    fn test_summary_range() {
        let summary = PaginationMeta::new(2, 12, 30).summary().unwrap();
        assert_eq!(summary.first_item, 13);
        assert_eq!(summary.last_item, 24);

        let last = PaginationMeta::new(3, 12, 30).summary().unwrap();
        assert_eq!(last.first_item, 25);
        assert_eq!(last.last_item, 30);
    }

    #[test]
    fn test_summary_absent_past_last_page() {
        assert_eq!(PageSummary::new(9, 10, 15), None);
        assert_eq!(PageSummary::new(1, 12, 0), None);
        assert_eq!(
            PageSummary::new(2, 10, 15),
            Some(PageSummary {
                first_item: 11,
                last_item: 15,
                total_count: 15
            })
        );
    }

    // ─── Page window ───────────────────────────────────────────────────────

    #[test]
    fn test_window_empty_for_single_page() {
        assert!(compute_page_window(1, 0, 2).is_empty());
        assert!(compute_page_window(1, 1, 2).is_empty());
    }

    #[test]
    fn test_window_middle() {
        assert_eq!(
            compute_page_window(5, 10, 2),
            vec![Page(1), Ellipsis, Page(3), Page(4), Page(5), Page(6), Page(7), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn test_window_last_page() {
        assert_eq!(
            compute_page_window(10, 10, 2),
            vec![Page(1), Ellipsis, Page(6), Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn test_window_first_page_widens_forward() {
        assert_eq!(
            compute_page_window(1, 10, 2),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn test_window_no_ellipsis_when_start_is_two() {
        // start == 2: page 1 then the contiguous range
        assert_eq!(
            compute_page_window(4, 10, 2),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn test_window_no_ellipsis_when_end_is_second_to_last() {
        assert_eq!(
            compute_page_window(7, 10, 2),
            vec![Page(1), Ellipsis, Page(5), Page(6), Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn test_window_small_totals_show_everything() {
        assert_eq!(compute_page_window(1, 2, 2), vec![Page(1), Page(2)]);
        assert_eq!(
            compute_page_window(3, 5, 2),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5)]
        );
        assert_eq!(
            pages(&compute_page_window(2, 6, 2)),
            vec![1, 2, 3, 4, 5, 6]
        );
    }

    #[test]
    fn test_window_properties_hold_for_all_inputs() {
        for total in 2..40u32 {
            for current in 1..=total {
                let window = compute_page_window(current, total, 2);
                let nums = pages(&window);

                assert!(nums.windows(2).all(|w| w[0] < w[1]), "{current}/{total}: {nums:?}");
                assert!(nums.iter().all(|&n| (1..=total).contains(&n)));
                assert_eq!(nums.first(), Some(&1));
                assert_eq!(nums.last(), Some(&total));
                assert!(nums.contains(&current));

                // ellipses never lead, trail, or repeat
                assert_ne!(window.first(), Some(&Ellipsis));
                assert_ne!(window.last(), Some(&Ellipsis));
                assert!(!window.windows(2).any(|w| w[0] == Ellipsis && w[1] == Ellipsis));

                // an ellipsis always hides at least one page
                for (i, marker) in window.iter().enumerate() {
                    if *marker == Ellipsis {
                        let before = window[i - 1].page().unwrap();
                        let after = window[i + 1].page().unwrap();
                        assert!(after - before >= 2, "{current}/{total}: {window:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_window_is_pure() {
        assert_eq!(compute_page_window(6, 20, 2), compute_page_window(6, 20, 2));
    }

    #[test]
    fn test_marker_serialization() {
        let json = serde_json::to_string(&compute_page_window(5, 10, 2)).unwrap();
        assert_eq!(json, r#"[1,"...",3,4,5,6,7,"...",10]"#);
    }

    // ─── Controls ──────────────────────────────────────────────────────────

    #[test]
    fn test_controls_none_for_single_page() {
        assert!(PageControls::new(1, 1, 2).is_none());
        assert!(PageControls::new(1, 0, 2).is_none());
    }

    #[test]
    fn test_controls_prev_next_state() {
        let first = PageControls::new(1, 5, 2).unwrap();
        assert!(first.prev_disabled);
        assert!(!first.next_disabled);
        assert_eq!(first.prev_target(), None);
        assert_eq!(first.next_target(), Some(2));

        let last = PageControls::new(5, 5, 2).unwrap();
        assert!(!last.prev_disabled);
        assert!(last.next_disabled);
        assert_eq!(last.prev_target(), Some(4));
        assert_eq!(last.next_target(), None);
    }

    #[test]
    fn test_controls_active_marker() {
        let controls = PageControls::new(3, 10, 2).unwrap();
        assert!(controls.is_active(&Page(3)));
        assert!(!controls.is_active(&Page(4)));
        assert!(!controls.is_active(&Ellipsis));
    }
}
