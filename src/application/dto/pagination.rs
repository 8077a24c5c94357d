use crate::application::error::{ApplicationError, ApplicationResult};
use serde::Serialize;

/// Raw `page` / `per_page` values as they arrive from a query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageRequest {
    /// Validates the request against the configured limits and returns
    /// `(page, per_page, offset)`.
    pub fn resolve(self, default_per_page: u32, max_per_page: u32) -> ApplicationResult<(u32, u32, u64)> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(ApplicationError::validation("page indexing starts from 1"));
        }
        let per_page = self.per_page.unwrap_or(default_per_page);
        if per_page == 0 || per_page > max_per_page {
            return Err(ApplicationError::validation(format!(
                "cannot request more than {max_per_page} items"
            )));
        }
        let offset = u64::from(page - 1) * u64::from(per_page);
        Ok((page, per_page, offset))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    /// One-based inclusive range of the items on this page, `None` when empty.
    pub fn range(&self) -> Option<(u64, u64)> {
        if self.items.is_empty() {
            return None;
        }
        let first = u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page) + 1;
        Some((first, first + self.items.len() as u64 - 1))
    }
}
