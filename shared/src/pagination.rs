//! Pagination metadata and page windows.

use serde::{Deserialize, Serialize};

/// Response header carrying the total item count.
pub const TOTAL_HEADER: &str = "X-WP-Total";
/// Response header carrying the total page count.
pub const TOTAL_PAGES_HEADER: &str = "X-WP-TotalPages";

/// Pagination state of one listing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Total matching items.
    pub total: u64,
    /// Total pages.
    pub total_pages: u64,
    /// 1-based page this response holds.
    pub current_page: u32,
    /// Page size.
    pub per_page: u32,
}

impl Pagination {
    /// State reported when the fetch failed: nothing, zero pages, page one.
    pub fn empty(per_page: u32) -> Self {
        Self {
            total: 0,
            total_pages: 0,
            current_page: 1,
            per_page,
        }
    }

    /// Trust the transport's headers verbatim. Missing or unparsable headers
    /// fall back to total 0 and a single page.
    pub fn from_headers(
        total: Option<&str>,
        total_pages: Option<&str>,
        current_page: u32,
        per_page: u32,
    ) -> Self {
        Self {
            total: parse_header(total).unwrap_or(0),
            total_pages: parse_header(total_pages).unwrap_or(1),
            current_page,
            per_page,
        }
    }

    /// Derive totals from a fully reconciled list.
    pub fn from_reconciled(total_items: usize, current_page: u32, per_page: u32) -> Self {
        let per_page = per_page.max(1);
        let total = total_items as u64;
        Self {
            total,
            total_pages: total.div_ceil(u64::from(per_page)).max(1),
            current_page,
            per_page,
        }
    }

    /// Whether a "load more" control should be offered.
    pub fn has_more(&self) -> bool {
        u64::from(self.current_page) < self.total_pages
    }
}

fn parse_header(value: Option<&str>) -> Option<u64> {
    value.and_then(|raw| raw.trim().parse::<u64>().ok())
}

/// Slice `[(page-1)*per_page, page*per_page)` out of `items`.
///
/// Pages past the end yield an empty vec, page 0 is treated as page 1.
pub fn page_window<T: Clone>(items: &[T], page: u32, per_page: u32) -> Vec<T> {
    let per_page = per_page.max(1) as usize;
    let start = (page.max(1) as usize - 1).saturating_mul(per_page);
    if start >= items.len() {
        return Vec::new();
    }
    let end = start.saturating_add(per_page).min(items.len());
    items[start..end].to_vec()
}

/// One slot of the page-number control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PageSlot {
    /// A clickable page number.
    Page(u64),
    /// A gap, left or right of the current window.
    Ellipsis(&'static str),
}

/// Page numbers to render for `current` out of `total` pages.
///
/// Out-of-range `current` values are clamped, so the control renders even
/// when the requested page is past the end.
pub fn visible_slots(current: u64, total: u64) -> Vec<PageSlot> {
    if total == 0 {
        return Vec::new();
    }
    if total <= 7 {
        return (1..=total).map(PageSlot::Page).collect();
    }

    let current = current.clamp(1, total);
    let mut slots = vec![PageSlot::Page(1)];

    let (start, end) = if current <= 3 {
        (2, 5)
    } else if current + 2 >= total {
        (total.saturating_sub(4).max(2), total - 1)
    } else {
        (current - 2, current + 2)
    };

    if start > 2 {
        slots.push(PageSlot::Ellipsis("left"));
    }
    slots.extend((start..=end).map(PageSlot::Page));
    if end < total - 1 {
        slots.push(PageSlot::Ellipsis("right"));
    }
    slots.push(PageSlot::Page(total));
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconciled_totals_round_up_with_floor_of_one() {
        let p = Pagination::from_reconciled(19, 2, 9);
        assert_eq!(p.total, 19);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_more());

        let empty = Pagination::from_reconciled(0, 1, 9);
        assert_eq!(empty.total_pages, 1);
        assert!(!empty.has_more());
    }

    #[test]
    fn headers_are_trusted_verbatim() {
        let p = Pagination::from_headers(Some("42"), Some("5"), 2, 9);
        assert_eq!((p.total, p.total_pages, p.current_page), (42, 5, 2));

        let missing = Pagination::from_headers(None, Some("garbage"), 1, 9);
        assert_eq!((missing.total, missing.total_pages), (0, 1));
    }

    #[test]
    fn window_slices_the_requested_page() {
        let items: Vec<u32> = (1..=20).collect();
        assert_eq!(page_window(&items, 1, 9), (1..=9).collect::<Vec<_>>());
        assert_eq!(page_window(&items, 3, 9), vec![19, 20]);
    }

    #[test]
    fn window_past_the_end_is_empty() {
        let items: Vec<u32> = (1..=20).collect();
        assert!(page_window(&items, 4, 9).is_empty());
        assert!(page_window(&items, u32::MAX, 9).is_empty());
    }

    #[test]
    fn slots_collapse_long_ranges() {
        assert_eq!(visible_slots(2, 3), vec![PageSlot::Page(1), PageSlot::Page(2), PageSlot::Page(3)]);
        let slots = visible_slots(10, 20);
        assert_eq!(slots.first(), Some(&PageSlot::Page(1)));
        assert_eq!(slots[1], PageSlot::Ellipsis("left"));
        assert!(slots.contains(&PageSlot::Page(8)));
        assert!(slots.contains(&PageSlot::Page(12)));
        assert_eq!(slots[slots.len() - 2], PageSlot::Ellipsis("right"));
        assert_eq!(slots.last(), Some(&PageSlot::Page(20)));
    }

    #[test]
    fn slots_survive_out_of_range_pages() {
        let slots = visible_slots(99, 12);
        assert_eq!(slots.last(), Some(&PageSlot::Page(12)));
        assert!(slots.contains(&PageSlot::Page(11)));
        assert!(visible_slots(5, 0).is_empty());
    }
}
