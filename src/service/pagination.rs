//! Page/per_page parsing and clamping for list endpoints.

use std::collections::HashMap;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pagination {
    /// Either value failing to parse resets both to defaults; then page >= 1 and 1 <= per_page <= 100.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let page = params.get("page").map(|s| s.trim().parse::<i64>()).transpose();
        let per_page = params.get("per_page").map(|s| s.trim().parse::<i64>()).transpose();
        let (page, per_page) = match (page, per_page) {
            (Ok(page), Ok(per_page)) => (
                page.unwrap_or(i64::from(DEFAULT_PAGE)),
                per_page.unwrap_or(i64::from(DEFAULT_PER_PAGE)),
            ),
            _ => (i64::from(DEFAULT_PAGE), i64::from(DEFAULT_PER_PAGE)),
        };
        Self {
            page: page.clamp(1, i64::from(u32::MAX)) as u32,
            per_page: per_page.clamp(1, i64::from(MAX_PER_PAGE)) as u32,
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }
}
