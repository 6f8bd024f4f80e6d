//! Client-side pagination over the current listing set.

use serde::Serialize;

/// Listings shown per page.
pub const PAGE_SIZE: usize = 6;

/// Returns `items[(page - 1) * page_size .. page * page_size]`, clipped to the
/// slice. Out-of-range pages, including page 0, yield an empty slice.
pub fn visible_slice<T>(items: &[T], page_index: usize, page_size: usize) -> &[T] {
    if page_index == 0 || page_size == 0 {
        return &[];
    }
    let start = (page_index - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Number of pages needed for `total` items; at least 1 so an empty set still
/// renders a (blank) first page.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Page cursor owned by the listing view.
///
/// Holds no listing data: it tracks the store's listings revision and snaps back
/// to page 1 whenever a new result lands.
#[derive(Debug, Clone)]
pub struct PaginationView {
    page_index: usize,
    page_size: usize,
    seen_revision: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// Backward control; hidden on the first page.
    pub show_previous: bool,
    /// Forward control; shown only when items remain past this page.
    pub show_next: bool,
}

impl Default for PaginationView {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl PaginationView {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 1,
            page_size,
            seen_revision: 0,
        }
    }

    /// Resets to page 1 if the listings revision moved since the last sync.
    pub fn sync(&mut self, listings_revision: u64) {
        if listings_revision != self.seen_revision {
            self.seen_revision = listings_revision;
            self.page_index = 1;
        }
    }

    pub fn has_next(&self, total: usize) -> bool {
        self.page_index.saturating_mul(self.page_size) < total
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 1
    }

    /// Advances one page if more items remain. Returns whether it moved.
    pub fn next(&mut self, total: usize) -> bool {
        if self.has_next(total) {
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    /// Steps back one page unless already on the first. Returns whether it moved.
    pub fn previous(&mut self) -> bool {
        if self.has_previous() {
            self.page_index -= 1;
            true
        } else {
            false
        }
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        visible_slice(items, self.page_index, self.page_size)
    }

    pub fn info(&self, total: usize) -> PageInfo {
        PageInfo {
            page: self.page_index,
            page_size: self.page_size,
            total_pages: page_count(total, self.page_size),
            total_items: total,
            show_previous: self.has_previous(),
            show_next: self.has_next(total),
        }
    }
}
