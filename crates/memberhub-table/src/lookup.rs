//! Search-as-you-type lookup for picking a single record.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};
use tracing::debug;

use memberhub_core::config::table::TableConfig;
use memberhub_core::result::AppResult;
use memberhub_core::traits::SearchSource;
use memberhub_core::types::SearchRequest;

use crate::debounce::Debounce;

/// Rows fetched per lookup.
const DEFAULT_LOOKUP_SIZE: u32 = 20;

/// A debounced lookup box, e.g. the member picker on the claim form.
///
/// Terms shorter than `min_chars` (after trimming) never reach the
/// source, and a term equal to the previous lookup is not repeated.
pub struct SearchSelect<T> {
    source: Arc<dyn SearchSource<T>>,
    min_chars: usize,
    page_size: u32,
    search_fields: Vec<String>,
    debounce: Debounce<String>,
}

impl<T> SearchSelect<T>
where
    T: Send + 'static,
{
    /// Create a lookup over `source`.
    pub fn new(source: Arc<dyn SearchSource<T>>, min_chars: usize, window: Duration) -> Self {
        Self {
            source,
            min_chars: min_chars.max(1),
            page_size: DEFAULT_LOOKUP_SIZE,
            search_fields: Vec::new(),
            debounce: Debounce::new(window),
        }
    }

    /// Create a lookup with the configured minimum length and debounce.
    pub fn from_config(source: Arc<dyn SearchSource<T>>, config: &TableConfig) -> Self {
        Self::new(source, config.lookup_min_chars, config.debounce())
    }

    /// Match the term against these fields.
    pub fn with_search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Rows fetched per lookup.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Minimum term length.
    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// Record typed input. Too-short input cancels any pending lookup.
    pub fn input(&mut self, term: &str, now: Instant) {
        let term = term.trim();
        if term.chars().count() < self.min_chars {
            self.debounce.cancel();
            return;
        }
        self.debounce.push(term.to_string(), now);
    }

    /// When the pending lookup becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// The request to send, if a new term is due.
    pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
        let term = self.debounce.poll(now)?;
        Some(
            SearchRequest::new(1, self.page_size)
                .with_search_term(term)
                .with_search_fields(self.search_fields.iter().cloned()),
        )
    }

    /// Wait for the pending lookup and run it.
    ///
    /// Resolves to `None` when nothing new was due.
    pub async fn settle(&mut self) -> AppResult<Option<Vec<T>>> {
        let Some(deadline) = self.deadline() else {
            return Ok(None);
        };
        sleep_until(deadline).await;
        match self.poll(Instant::now()) {
            Some(request) => {
                debug!(term = request.search_term.as_deref().unwrap_or(""), "Lookup");
                let response = self.source.search(&request).await?;
                Ok(Some(response.items))
            }
            None => Ok(None),
        }
    }
}
