//! Page arithmetic.

use std::fmt;
use std::ops::Range;

/// Number of pages needed for `total` rows. Zero rows means zero pages.
pub const fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(if page_size == 0 { 1 } else { page_size })
}

/// Index of the last page, `0` when there are no rows.
pub const fn last_page(total: usize, page_size: usize) -> usize {
    page_count(total, page_size).saturating_sub(1)
}

/// `page` clamped into `[0, last_page]`.
pub fn clamp_page(page: usize, total: usize, page_size: usize) -> usize {
    page.min(last_page(total, page_size))
}

/// Page that keeps the first visible row in view after the page size
/// changes from `old_size` to `new_size`, clamped to the new last page.
pub fn rescale_page(page: usize, old_size: usize, new_size: usize, total: usize) -> usize {
    let first_row = page.saturating_mul(old_size.max(1));
    clamp_page(first_row / new_size.max(1), total, new_size)
}

/// Positions visible on `page`: `page*size .. min((page+1)*size, total)`.
pub fn page_range(page: usize, total: usize, page_size: usize) -> Range<usize> {
    let size = page_size.max(1);
    let start = page.saturating_mul(size).min(total);
    let end = start.saturating_add(size).min(total);
    start..end
}

/// "Showing X to Y of Z entries".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    /// One-based position of the first visible row, `0` when empty.
    pub first: usize,
    pub last: usize,
    pub total: usize,
}

impl PageSummary {
    pub fn new(range: &Range<usize>, total: usize) -> Self {
        if range.is_empty() {
            Self {
                first: 0,
                last: 0,
                total,
            }
        } else {
            Self {
                first: range.start + 1,
                last: range.end,
                total,
            }
        }
    }
}

impl fmt::Display for PageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {} to {} of {} entries",
            self.first, self.last, self.total
        )
    }
}
