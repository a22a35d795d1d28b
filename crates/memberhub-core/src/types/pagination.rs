//! Paginated responses and envelope normalization.

use serde::{Deserialize, Serialize};

/// One page of a remote collection.
///
/// `total_pages` is always `ceil(total / page_size)`, and `0` for an empty
/// collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
    /// Current page number (1-based).
    pub page: u32,
    /// Number of items per page.
    pub page_size: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

impl<T> SearchResponse<T> {
    /// Create a page, deriving `total_pages` from `total` and `page_size`.
    pub fn new(items: Vec<T>, total: u64, page: u32, page_size: u32) -> Self {
        Self {
            items,
            total,
            page: page.max(1),
            page_size,
            total_pages: total_pages(total, page_size),
        }
    }

    /// The empty first page every list view starts from.
    pub fn empty(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            page_size,
            total_pages: 0,
        }
    }

    /// Whether a later page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether an earlier page exists.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// 1-based inclusive range of the items on this page, if any.
    pub fn item_range(&self) -> Option<(u64, u64)> {
        if self.items.is_empty() {
            return None;
        }
        let first = u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size) + 1;
        Some((first, first + self.items.len() as u64 - 1))
    }

    /// Transform the items, keeping the page metadata.
    pub fn map<U, F>(self, f: F) -> SearchResponse<U>
    where
        F: FnMut(T) -> U,
    {
        SearchResponse {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

fn total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    u32::try_from(total.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
}

/// Pagination block of the nested envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number (1-based).
    #[serde(default)]
    pub page: Option<u32>,
    /// Number of items per page.
    #[serde(default)]
    pub page_size: Option<u32>,
    /// Total number of items.
    pub total_items: u64,
    /// Total number of pages as reported by the server.
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// Either response shape served by search endpoints.
///
/// Older services return the flat shape, newer ones nest the counters in a
/// `pagination` object. Convert into [`SearchResponse`] before use.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PageEnvelope<T> {
    /// `{ items, pagination: { page, pageSize, totalItems, totalPages } }`
    Nested {
        /// Items on this page.
        items: Vec<T>,
        /// Counters.
        pagination: PaginationMeta,
    },
    /// `{ items, total, page, pageSize, totalPages }`
    Flat {
        /// Items on this page.
        items: Vec<T>,
        /// Total number of items.
        total: u64,
        /// Current page number.
        #[serde(default)]
        page: Option<u32>,
        /// Items per page.
        #[serde(default, rename = "pageSize")]
        page_size: Option<u32>,
        /// Total pages as reported by the server.
        #[serde(default, rename = "totalPages")]
        total_pages: Option<u32>,
    },
}

impl<T> PageEnvelope<T> {
    /// Normalize into a [`SearchResponse`], recomputing `total_pages`.
    ///
    /// Missing page metadata falls back to the request that produced it.
    /// A page holding more items than `page_size` is logged and kept whole.
    pub fn into_response(self, requested_page: u32, requested_page_size: u32) -> SearchResponse<T> {
        let (items, total, page, page_size, reported) = match self {
            Self::Nested { items, pagination } => (
                items,
                pagination.total_items,
                pagination.page,
                pagination.page_size,
                pagination.total_pages,
            ),
            Self::Flat {
                items,
                total,
                page,
                page_size,
                total_pages,
            } => (items, total, page, page_size, total_pages),
        };

        let response = SearchResponse::new(
            items,
            total,
            page.unwrap_or(requested_page),
            page_size.filter(|s| *s > 0).unwrap_or(requested_page_size),
        );

        if let Some(reported) = reported {
            if reported != response.total_pages {
                tracing::debug!(
                    reported,
                    computed = response.total_pages,
                    "Server totalPages disagrees with total/pageSize; using computed value"
                );
            }
        }

        if response.items.len() > response.page_size as usize {
            tracing::debug!(
                items = response.items.len(),
                page_size = response.page_size,
                "Server returned more items than the page size; keeping all of them"
            );
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_is_ceiling() {
        for (total, size, expected) in [(0, 10, 0), (1, 10, 1), (10, 10, 1), (11, 10, 2), (95, 10, 10)] {
            let response = SearchResponse::<u8>::new(Vec::new(), total, 1, size);
            assert_eq!(response.total_pages, expected, "total={total} size={size}");
        }
    }

    #[test]
    fn test_last_page_remainder() {
        let items: Vec<u32> = (91..=95).collect();
        let response = SearchResponse::new(items, 95, 10, 10);
        assert_eq!(response.total_pages, 10);
        assert_eq!(response.items.len(), 5);
        assert_eq!(response.item_range(), Some((91, 95)));
        assert!(!response.has_next());
        assert!(response.has_previous());
    }

    #[test]
    fn test_empty_page() {
        let response = SearchResponse::<String>::empty(25);
        assert_eq!(response.page, 1);
        assert_eq!(response.page_size, 25);
        assert_eq!(response.total_pages, 0);
        assert!(response.item_range().is_none());
    }

    #[test]
    fn test_flat_envelope() {
        let envelope: PageEnvelope<u32> = serde_json::from_value(serde_json::json!({
            "items": [1, 2],
            "total": 12,
            "page": 2,
            "pageSize": 10,
            "totalPages": 2
        }))
        .unwrap();
        let response = envelope.into_response(1, 10);
        assert_eq!(response.page, 2);
        assert_eq!(response.total, 12);
        assert_eq!(response.total_pages, 2);
    }

    #[test]
    fn test_nested_envelope() {
        let envelope: PageEnvelope<u32> = serde_json::from_value(serde_json::json!({
            "items": [1, 2, 3],
            "pagination": {"page": 1, "pageSize": 3, "totalItems": 7, "totalPages": 99}
        }))
        .unwrap();
        let response = envelope.into_response(1, 10);
        assert_eq!(response.page_size, 3);
        assert_eq!(response.total, 7);
        assert_eq!(response.total_pages, 3);
    }

    #[test]
    fn test_missing_metadata_falls_back_to_request() {
        let envelope: PageEnvelope<u32> =
            serde_json::from_value(serde_json::json!({"items": [], "total": 0})).unwrap();
        let response = envelope.into_response(4, 20);
        assert_eq!(response.page, 4);
        assert_eq!(response.page_size, 20);
    }

    #[test]
    fn test_oversized_page_kept_whole() {
        let envelope: PageEnvelope<u32> = serde_json::from_value(serde_json::json!({
            "items": [1, 2, 3, 4],
            "total": 4,
            "page": 1,
            "pageSize": 3
        }))
        .unwrap();
        let response = envelope.into_response(1, 3);
        assert_eq!(response.items.len(), 4);
        assert_eq!(response.page_size, 3);
        assert_eq!(response.total_pages, 2);
        assert_eq!(response.item_range(), Some((1, 4)));
    }
}
