//! Core type definitions used across the MemberHub workspace.

pub mod filter;
pub mod id;
pub mod pagination;
pub mod response;
pub mod search;
pub mod sorting;

pub use filter::{Filter, FilterOperator, FilterValue};
pub use id::*;
pub use pagination::{PageEnvelope, PaginationMeta, SearchResponse};
pub use response::ApiErrorResponse;
pub use search::SearchRequest;
pub use sorting::SortOrder;
