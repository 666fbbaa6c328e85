//! Pagination query parameters and the paged response envelope.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

/// Largest page size any listing accepts.
pub const MAX_PAGE_SIZE: i64 = 100;

/// `?page&limit` as used by the user's own link listing.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<i64>,
}

impl LimitParams {
    pub const DEFAULT_LIMIT: i64 = 10;

    /// Returns `(page, limit)`, with `page >= 1` and `limit` clamped to 1-100.
    pub fn resolve(&self) -> (i64, i64) {
        (
            clamp_page(self.page),
            clamp_size(self.limit, Self::DEFAULT_LIMIT),
        )
    }
}

/// `?page&page_size` (or `pageSize`) as used by admin and click log listings.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PageSizeParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default, alias = "pageSize")]
    pub page_size: Option<i64>,
}

impl PageSizeParams {
    pub const DEFAULT_PAGE_SIZE: i64 = 50;

    /// Returns `(page, page_size)`, with `page >= 1` and `page_size` clamped to 1-100.
    pub fn resolve(&self) -> (i64, i64) {
        (
            clamp_page(self.page),
            clamp_size(self.page_size, Self::DEFAULT_PAGE_SIZE),
        )
    }
}

fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

fn clamp_size(size: Option<i64>, default: i64) -> i64 {
    size.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
}

/// Number of pages needed for `total` items.
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if per_page <= 0 {
        return 0;
    }
    (total + per_page - 1) / per_page
}

/// Paged listing sized by `limit`.
#[derive(Debug, Serialize)]
pub struct LimitPage<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T> LimitPage<T> {
    pub fn new(data: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        Self {
            data,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        }
    }
}

/// Paged listing sized by `page_size`.
#[derive(Debug, Serialize)]
pub struct SizedPage<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> SizedPage<T> {
    pub fn new(data: Vec<T>, total: i64, page: i64, page_size: i64) -> Self {
        Self {
            data,
            total,
            page,
            page_size,
            total_pages: total_pages(total, page_size),
        }
    }
}
