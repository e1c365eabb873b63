//! Page bookkeeping shared by the task list and the log viewer.

/// Page sizes offered by the task list.
pub const TASK_PAGE_SIZES: &[u32] = &[10, 20, 50];
/// Page sizes offered by the log viewer.
pub const LOG_PAGE_SIZES: &[u32] = &[10, 20, 50, 100];

pub const DEFAULT_TASK_PAGE_SIZE: u32 = 10;
pub const DEFAULT_LOG_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNav {
    First,
    Previous,
    Next,
    Last,
}

/// Current page window of a paged list.
///
/// `total` and `row_count` come from the last applied response; `page` and
/// `page_size` are the inputs of the next request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub row_count: usize,
    sizes: &'static [u32],
}

impl Pagination {
    /// Starts on page 1. A `page_size` outside `sizes` falls back to the
    /// first allowed size.
    pub fn new(sizes: &'static [u32], page_size: u32) -> Self {
        let page_size = if sizes.contains(&page_size) {
            page_size
        } else {
            sizes.first().copied().unwrap_or(DEFAULT_TASK_PAGE_SIZE)
        };
        Self {
            page: 1,
            page_size,
            total: 0,
            row_count: 0,
            sizes,
        }
    }

    pub fn sizes(&self) -> &'static [u32] {
        self.sizes
    }

    /// `ceil(total / page_size)`; zero for an empty result.
    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        let pages = self.total.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Last reachable page; page 1 always exists.
    pub fn last_page(&self) -> u32 {
        self.total_pages().max(1)
    }

    pub fn can_first(&self) -> bool {
        self.page > 1
    }

    pub fn can_previous(&self) -> bool {
        self.page > 1
    }

    pub fn can_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn can_last(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Page that `nav` would move to, or `None` when the control is disabled.
    pub fn target(&self, nav: PageNav) -> Option<u32> {
        match nav {
            PageNav::First if self.can_first() => Some(1),
            PageNav::Previous if self.can_previous() => Some(self.page - 1),
            PageNav::Next if self.can_next() => Some(self.page + 1),
            PageNav::Last if self.can_last() => Some(self.last_page()),
            _ => None,
        }
    }

    /// Move to the page selected by `nav`. Returns whether the page changed.
    pub fn navigate(&mut self, nav: PageNav) -> bool {
        match self.target(nav) {
            Some(page) if page != self.page => {
                self.page = page;
                true
            }
            _ => false,
        }
    }

    /// Change the page size and return to page 1. Sizes not offered by this
    /// list are ignored.
    pub fn set_page_size(&mut self, page_size: u32) -> bool {
        if !self.sizes.contains(&page_size) {
            return false;
        }
        self.page_size = page_size;
        self.page = 1;
        true
    }

    /// Switch to the next offered page size, wrapping around.
    pub fn cycle_page_size(&mut self) -> u32 {
        let idx = self
            .sizes
            .iter()
            .position(|s| *s == self.page_size)
            .map(|i| (i + 1) % self.sizes.len())
            .unwrap_or(0);
        if let Some(size) = self.sizes.get(idx).copied() {
            self.set_page_size(size);
        }
        self.page_size
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Record the totals of an applied response.
    pub fn record(&mut self, total: u64, row_count: usize) {
        self.total = total;
        self.row_count = row_count;
    }

    /// `(first, last, total)` row numbers of the current page, 1-based.
    pub fn showing(&self) -> Option<(u64, u64, u64)> {
        if self.row_count == 0 {
            return None;
        }
        let first = u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size) + 1;
        let last = first + self.row_count as u64 - 1;
        Some((first, last, self.total))
    }

    pub fn summary(&self) -> String {
        match self.showing() {
            Some((first, last, total)) => format!("Showing {}-{} of {}", first, last, total),
            None => "No results".to_string(),
        }
    }
}
