//! Pagination state of the list view.

use crate::error::{DomainError, DomainResult};

/// Current page and the page count reported by the last successful fetch.
///
/// Both values are 1-based and never below 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PaginationState {
    current_page: u32,
    total_pages: u32,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
        }
    }
}

impl PaginationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Move to `page`. Pages past the last known total are allowed: the total
    /// is only authoritative until the next fetch.
    pub fn go_to(&mut self, page: u32) -> DomainResult<()> {
        if page == 0 {
            return Err(DomainError::validation("page numbers start at 1"));
        }
        self.current_page = page;
        Ok(())
    }

    /// Record the total reported by the directory; a zero total clamps to 1.
    pub fn set_total_pages(&mut self, total: u32) {
        self.total_pages = total.max(1);
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}
