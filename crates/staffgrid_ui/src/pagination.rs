//! Page windows and the compact page-number list.

use std::fmt;

/// Page sizes offered to the user.
pub const PAGE_SIZES: [usize; 4] = [5, 10, 20, 50];

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Pages shown on each side of the current one.
const WINDOW_RADIUS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageLabel {
    /// 1-based page number.
    Page(usize),
    /// Hidden run of pages; opens the jump-to-page prompt.
    Ellipsis,
}

impl fmt::Display for PageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(n) => write!(f, "{n}"),
            Self::Ellipsis => f.write_str("…"),
        }
    }
}

#[must_use]
pub fn is_allowed_page_size(size: usize) -> bool {
    PAGE_SIZES.contains(&size)
}

/// Number of pages needed for `row_count` rows.
#[must_use]
pub const fn page_count(row_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    row_count.div_ceil(page_size)
}

/// Page index clamped to the pages that exist.
#[must_use]
pub const fn clamp_page_index(page_index: usize, total_pages: usize) -> usize {
    if total_pages == 0 {
        0
    } else if page_index >= total_pages {
        total_pages - 1
    } else {
        page_index
    }
}

/// Row range `[start, end)` of a page.
#[must_use]
pub fn page_bounds(
    page_index: usize,
    page_size: usize,
    row_count: usize,
) -> (usize, usize) {
    let start = page_index.saturating_mul(page_size).min(row_count);
    let end = start.saturating_add(page_size).min(row_count);
    (start, end)
}

/// Labels for the page buttons around `current_page_index` (0-based).
///
/// `[1, …, 8, 9, 10, 11, 12, …, 20]` for index 9 of 20 pages.
#[must_use]
pub fn page_labels(current_page_index: usize, total_pages: usize) -> Vec<PageLabel> {
    if total_pages == 0 {
        return Vec::new();
    }

    let current = current_page_index.saturating_add(1).min(total_pages);
    let start = current.saturating_sub(WINDOW_RADIUS).max(1);
    let end = (current + WINDOW_RADIUS).min(total_pages);

    let mut labels = Vec::with_capacity(end - start + 5);
    if start > 1 {
        labels.push(PageLabel::Page(1));
        if start > 2 {
            labels.push(PageLabel::Ellipsis);
        }
    }
    labels.extend((start..=end).map(PageLabel::Page));
    if end < total_pages {
        if end + 1 < total_pages {
            labels.push(PageLabel::Ellipsis);
        }
        labels.push(PageLabel::Page(total_pages));
    }
    labels
}

/// Pages whose number contains `query`; every page when the query is empty.
#[must_use]
pub fn jump_candidates(query: &str, total_pages: usize) -> Vec<usize> {
    let query = query.trim();
    (1..=total_pages)
        .filter(|page| query.is_empty() || page.to_string().contains(query))
        .collect()
}
