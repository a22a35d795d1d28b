//! The outbound query every list view sends.

use serde::{Deserialize, Serialize};

use super::filter::Filter;
use super::sorting::SortOrder;
use crate::error::AppError;
use crate::result::AppResult;

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Query for a paginated, filtered, sorted collection.
///
/// Optional fields are omitted from the JSON body when absent. A request is
/// built fresh for every emission and passed by reference afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Free-text term matched against `search_fields`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    /// Fields the free-text term is matched against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_fields: Option<Vec<String>>,
    /// Structured predicates, combined with AND.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,
    /// Field to sort by.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// Sort direction; only meaningful with `sort_by`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    /// Page number (1-based).
    pub page: u32,
    /// Number of items per page.
    pub page_size: u32,
    /// Relations the server should embed in each item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eager_load: Option<Vec<String>>,
}

impl SearchRequest {
    /// Create a request for the given page.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            search_term: None,
            search_fields: None,
            filters: None,
            sort_by: None,
            sort_order: None,
            page: page.max(1),
            page_size: page_size.max(1),
            eager_load: None,
        }
    }

    /// Set the free-text term; blank terms are dropped.
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search_term = if term.is_empty() { None } else { Some(term) };
        self
    }

    /// Set the searched fields; an empty list is dropped.
    pub fn with_search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        self.search_fields = if fields.is_empty() { None } else { Some(fields) };
        self
    }

    /// Set the filters; an empty list is dropped.
    pub fn with_filters(mut self, filters: Vec<Filter>) -> Self {
        self.filters = if filters.is_empty() {
            None
        } else {
            Some(filters)
        };
        self
    }

    /// Sort by a field.
    pub fn sorted_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(field.into());
        self.sort_order = Some(order);
        self
    }

    /// Set the embedded relations; an empty list is dropped.
    pub fn with_eager_load<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let relations: Vec<String> = relations.into_iter().map(Into::into).collect();
        self.eager_load = if relations.is_empty() {
            None
        } else {
            Some(relations)
        };
        self
    }

    /// Index of the first item on this page (0-based).
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Check the page bounds and every filter.
    pub fn validate(&self) -> AppResult<()> {
        if self.page == 0 {
            return Err(AppError::validation("page must be at least 1"));
        }
        if self.page_size == 0 {
            return Err(AppError::validation("pageSize must be at least 1"));
        }
        if self.sort_order.is_some() && self.sort_by.is_none() {
            return Err(AppError::validation("sortOrder requires sortBy"));
        }
        for filter in self.filters.iter().flatten() {
            filter.validate()?;
        }
        Ok(())
    }
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_body_omits_optionals() {
        let json = serde_json::to_value(SearchRequest::new(2, 25)).unwrap();
        assert_eq!(json, serde_json::json!({"page": 2, "pageSize": 25}));
    }

    #[test]
    fn test_full_body_uses_camel_case() {
        let request = SearchRequest::new(1, 10)
            .with_search_term("john")
            .with_search_fields(["firstName", "lastName"])
            .sorted_by("createdAt", SortOrder::Desc)
            .with_eager_load(["agent"])
            .with_filters(vec![Filter::equals("status", "active")]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["searchTerm"], "john");
        assert_eq!(json["searchFields"][1], "lastName");
        assert_eq!(json["sortBy"], "createdAt");
        assert_eq!(json["sortOrder"], "desc");
        assert_eq!(json["eagerLoad"][0], "agent");
        assert_eq!(json["filters"][0]["operator"], "equals");
    }

    #[test]
    fn test_empty_collections_dropped() {
        let request = SearchRequest::default()
            .with_search_term("")
            .with_filters(Vec::new())
            .with_search_fields(Vec::<String>::new());
        assert!(request.search_term.is_none());
        assert!(request.filters.is_none());
        assert!(request.search_fields.is_none());
    }

    #[test]
    fn test_bounds_clamped() {
        let request = SearchRequest::new(0, 0);
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 1);
        assert_eq!(SearchRequest::new(3, 10).offset(), 20);
    }

    #[test]
    fn test_validate_rejects_bad_deserialized_page() {
        let request: SearchRequest =
            serde_json::from_value(serde_json::json!({"page": 0, "pageSize": 10})).unwrap();
        assert!(request.validate().is_err());
    }
}
