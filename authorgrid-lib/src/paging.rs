//! Pagination window over the row list.

use std::ops::Range;

use serde::Serialize;

/// Offset and page size of the visible window.
///
/// The pager does not own the rows; every query takes the current total.
///
/// # Example
///
/// ```
/// use authorgrid_lib::paging::Pager;
///
/// let mut pager = Pager::new(10);
/// assert!(pager.page_forward(25));
/// assert_eq!(pager.visible_range(25), 10..20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    offset: usize,
    page_size: usize,
}

/// Pagination state handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Index of the first visible row.
    pub offset: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Number of pages for the current total.
    pub page_count: usize,
    /// Total number of rows.
    pub total: usize,
    /// Whether pagination controls should be shown.
    pub show_controls: bool,
    /// Caption such as `Authors 11-20 of 25`.
    pub status: String,
}

impl Pager {
    /// Creates a pager at offset 0. A page size of 0 is raised to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            offset: 0,
            page_size: page_size.max(1),
        }
    }

    /// Returns the index of the first visible row.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the number of rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns `ceil(total / page_size)`.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Returns the half-open range of visible rows.
    pub fn visible_range(&self, total: usize) -> Range<usize> {
        let start = self.offset.min(total);
        let end = self.offset.saturating_add(self.page_size).min(total);
        start..end
    }

    /// Returns `true` if `index` falls on the current page.
    pub fn is_visible(&self, index: usize, total: usize) -> bool {
        self.visible_range(total).contains(&index)
    }

    /// Advances one page. No-op on the last page.
    pub fn page_forward(&mut self, total: usize) -> bool {
        let next = self.offset.saturating_add(self.page_size);
        if next >= total {
            return false;
        }
        self.offset = next;
        true
    }

    /// Goes back one page, stopping at 0. No-op on the first page.
    pub fn page_back(&mut self) -> bool {
        if self.offset == 0 {
            return false;
        }
        self.offset = self.offset.saturating_sub(self.page_size);
        true
    }

    /// Sets the page size (at least 1). The offset is left untouched;
    /// [`Pager::clamp`] brings it back in range.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let page_size = page_size.max(1);
        if page_size == self.page_size {
            return false;
        }
        self.page_size = page_size;
        true
    }

    /// Moves an offset that points past the end to the start of the last page.
    ///
    /// Returns `true` if the offset changed.
    pub fn clamp(&mut self, total: usize) -> bool {
        let clamped = if total == 0 {
            0
        } else if self.offset >= total {
            ((total - 1) / self.page_size) * self.page_size
        } else {
            self.offset
        };
        let changed = clamped != self.offset;
        self.offset = clamped;
        changed
    }

    /// Moves the window so that `index` is visible.
    pub fn reveal(&mut self, index: usize) -> bool {
        if (self.offset..self.offset.saturating_add(self.page_size)).contains(&index) {
            return false;
        }
        self.offset = (index / self.page_size) * self.page_size;
        true
    }

    /// Returns the caption shown next to the paging buttons.
    pub fn status_line(&self, total: usize) -> String {
        let range = self.visible_range(total);
        if range.is_empty() {
            return format!("Authors 0-0 of {total}");
        }
        format!("Authors {}-{} of {}", range.start + 1, range.end, total)
    }

    /// Builds the renderer-facing pagination state.
    pub fn info(&self, total: usize) -> PageInfo {
        let page_count = self.page_count(total);
        PageInfo {
            offset: self.offset,
            page_size: self.page_size,
            page_count,
            total,
            show_controls: page_count > 1,
            status: self.status_line(total),
        }
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(25)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_stops_at_last_page() {
        let mut pager = Pager::new(10);
        let mut offsets = vec![pager.offset()];
        for _ in 0..3 {
            pager.page_forward(25);
            offsets.push(pager.offset());
        }
        assert_eq!(offsets, vec![0, 10, 20, 20]);
    }

    #[test]
    fn back_stops_at_zero() {
        let mut pager = Pager::new(10);
        pager.page_forward(25);
        pager.page_forward(25);
        assert!(pager.page_back());
        assert_eq!(pager.offset(), 10);
        assert!(pager.page_back());
        assert_eq!(pager.offset(), 0);
        assert!(!pager.page_back());
        assert_eq!(pager.offset(), 0);
    }

    #[test]
    fn back_from_unaligned_offset_saturates() {
        let mut pager = Pager::new(10);
        pager.page_forward(25);
        pager.set_page_size(15);
        assert!(pager.page_back());
        assert_eq!(pager.offset(), 0);
    }

    #[test]
    fn visible_range_clamps_at_total() {
        let mut pager = Pager::new(10);
        pager.page_forward(25);
        pager.page_forward(25);
        assert_eq!(pager.visible_range(25), 20..25);
        assert_eq!(pager.page_count(25), 3);
        assert_eq!(pager.status_line(25), "Authors 21-25 of 25");
    }

    #[test]
    fn page_size_change_leaves_offset_until_clamped() {
        let mut pager = Pager::new(10);
        pager.page_forward(25);
        pager.page_forward(25);
        pager.set_page_size(30);
        assert_eq!(pager.offset(), 20);
        assert!(!pager.clamp(25));

        let mut pager = Pager::new(5);
        for _ in 0..4 {
            pager.page_forward(25);
        }
        assert_eq!(pager.offset(), 20);
        assert!(pager.clamp(12));
        assert_eq!(pager.offset(), 10);
        assert!(pager.clamp(0));
        assert_eq!(pager.offset(), 0);
    }

    #[test]
    fn huge_page_size_does_not_overflow() {
        let mut pager = Pager::new(10);
        pager.page_forward(25);
        pager.set_page_size(usize::MAX);
        assert_eq!(pager.visible_range(25), 10..25);
        assert!(!pager.page_forward(25));
        assert!(!pager.reveal(24));
        assert_eq!(pager.status_line(25), "Authors 11-25 of 25");
        assert_eq!(pager.page_count(25), 1);
    }

    #[test]
    fn controls_only_for_multiple_pages() {
        let pager = Pager::new(10);
        assert!(!pager.info(10).show_controls);
        assert!(pager.info(11).show_controls);
        assert_eq!(pager.info(0).page_count, 0);
    }
}
