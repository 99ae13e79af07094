//! `page[number]` / `page[size]` → `LIMIT` / `OFFSET`.

use crate::params::QueryParams;
use crate::report::Dropped;

use super::Scope;

pub const PAGE_NUMBER: &str = "page[number]";
pub const PAGE_SIZE: &str = "page[size]";

/// Resolved pagination for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    /// 1-based page number, never below 1.
    pub page: i64,
    /// Rows per page, never negative.
    pub limit: i64,
    pub offset: i64,
}

impl PagePlan {
    pub fn new(page: i64, limit: i64) -> Self {
        let page = page.max(1);
        let limit = limit.max(0);
        Self {
            page,
            limit,
            offset: limit.saturating_mul(page - 1),
        }
    }
}

/// Plan the page from the request parameters and the configured defaults.
pub fn plan_page(params: &QueryParams, scope: &Scope<'_>) -> PagePlan {
    let page = match params.first(PAGE_NUMBER) {
        None => 1,
        Some(raw) => match raw.parse::<i64>() {
            Ok(n) if n >= 1 => n,
            _ => {
                scope.report(Dropped::InvalidPage {
                    param: PAGE_NUMBER,
                    raw: raw.to_string(),
                });
                1
            }
        },
    };

    let default_size = scope.config.default_page_size;
    let requested = match params.first(PAGE_SIZE) {
        None => default_size,
        Some(raw) => match raw.parse::<i64>() {
            Ok(n) if n >= 0 => n,
            Ok(_) => {
                scope.report(Dropped::InvalidPage {
                    param: PAGE_SIZE,
                    raw: raw.to_string(),
                });
                0
            }
            Err(_) => {
                scope.report(Dropped::InvalidPage {
                    param: PAGE_SIZE,
                    raw: raw.to_string(),
                });
                default_size
            }
        },
    };

    let limit = match scope.config.max_page_size {
        Some(max) if requested > max => {
            scope.report(Dropped::PageSizeClamped { requested, max });
            max
        }
        _ => requested,
    };

    PagePlan::new(page, limit)
}
