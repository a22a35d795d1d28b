//! Anything a list view can query.

use std::sync::Arc;

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{SearchRequest, SearchResponse};

/// A remote (or in-memory) collection that answers [`SearchRequest`]s.
///
/// Domain services implement this once per listed entity; list stores hold
/// it as `Arc<dyn SearchSource<T>>`.
#[async_trait]
pub trait SearchSource<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    /// Fetch one page for the request.
    async fn search(&self, request: &SearchRequest) -> AppResult<SearchResponse<T>>;
}

#[async_trait]
impl<T, S> SearchSource<T> for Arc<S>
where
    T: Send + 'static,
    S: SearchSource<T> + ?Sized,
{
    async fn search(&self, request: &SearchRequest) -> AppResult<SearchResponse<T>> {
        (**self).search(request).await
    }
}
