use crate::conditions::PAGE_SIZE_OPTIONS;

/// Client-side paging over an in-memory result set.
///
/// The page number always stays within `1..=max(total_pages, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
    page_number: usize,
    total_records: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, PAGE_SIZE_OPTIONS[0])
    }
}

impl Pagination {
    /// A zero page size is treated as one
    #[must_use]
    pub const fn new(total_records: usize, page_size: usize) -> Self {
        Self {
            page_size: if page_size == 0 { 1 } else { page_size },
            page_number: 1,
            total_records,
        }
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub const fn page_number(&self) -> usize {
        self.page_number
    }

    #[must_use]
    pub const fn total_records(&self) -> usize {
        self.total_records
    }

    #[must_use]
    pub const fn total_pages(&self) -> usize {
        self.total_records.div_ceil(self.page_size)
    }

    /// Move to `page`, clamped to the valid range
    pub fn set_page(&mut self, page: usize) {
        self.page_number = page.clamp(1, self.total_pages().max(1));
    }

    pub fn next(&mut self) {
        self.set_page(self.page_number.saturating_add(1));
    }

    pub fn previous(&mut self) {
        self.set_page(self.page_number.saturating_sub(1));
    }

    pub fn first(&mut self) {
        self.set_page(1);
    }

    pub fn last(&mut self) {
        self.set_page(self.total_pages());
    }

    /// Change the page size, keeping the current page number if still valid
    pub fn change_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.set_page(self.page_number);
    }

    /// Half-open index range of the visible page
    #[must_use]
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = (self.page_number - 1)
            .saturating_mul(self.page_size)
            .min(self.total_records);
        let end = self
            .page_number
            .saturating_mul(self.page_size)
            .min(self.total_records);
        start..end
    }

    /// The visible page of `records`
    #[must_use]
    pub fn slice<'a, T>(&self, records: &'a [T]) -> &'a [T] {
        records.get(self.range()).unwrap_or_default()
    }

    #[must_use]
    pub const fn is_first_disabled(&self) -> bool {
        self.page_number == 1
    }

    /// Also true when there are no pages at all
    #[must_use]
    pub const fn is_last_disabled(&self) -> bool {
        self.page_number >= self.total_pages()
    }
}
