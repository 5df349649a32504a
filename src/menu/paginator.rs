use std::ops::Range;

/// Fixed-size paging over a list of `len` entries. Pages are 0-indexed
/// internally and shown 1-indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginator {
    page_size: usize,
    len: usize,
    current: usize,
}

impl Paginator {
    pub fn new(len: usize, page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            len,
            current: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Never less than one, an empty list still shows an (empty) first page.
    pub fn page_count(&self) -> usize {
        self.len.div_ceil(self.page_size).max(1)
    }

    /// Recompute paging for a new list length, clamping the current page.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.current = self.current.min(self.page_count() - 1);
    }

    /// Advance one page, wrapping to the first. No-op on a single page.
    pub fn next(&mut self) -> bool {
        let count = self.page_count();
        if count <= 1 {
            return false;
        }
        self.current = (self.current + 1) % count;
        true
    }

    /// Retreat one page, wrapping to the last. No-op on a single page.
    pub fn previous(&mut self) -> bool {
        let count = self.page_count();
        if count <= 1 {
            return false;
        }
        self.current = (self.current + count - 1) % count;
        true
    }

    pub fn first_page(&mut self) {
        self.current = 0;
    }

    pub fn go_to(&mut self, page: usize) -> bool {
        if page >= self.page_count() || page == self.current {
            return false;
        }
        self.current = page;
        true
    }

    /// Positions of the current page within the list.
    pub fn range(&self) -> Range<usize> {
        let start = (self.current * self.page_size).min(self.len);
        let end = (start + self.page_size).min(self.len);
        start..end
    }

    pub fn label(&self) -> String {
        format!("{} of {}", self.current + 1, self.page_count())
    }
}
