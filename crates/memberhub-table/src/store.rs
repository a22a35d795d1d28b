//! Loading state of one list page.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, warn};

use memberhub_core::error::AppError;
use memberhub_core::traits::SearchSource;
use memberhub_core::types::{SearchRequest, SearchResponse};

/// What a list page shows.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    /// Last committed page. Kept when a later load fails.
    pub response: SearchResponse<T>,
    /// A load is in flight.
    pub loading: bool,
    /// Error of the last committed load.
    pub error: Option<AppError>,
    /// Epoch of the newest issued load.
    pub epoch: u64,
    /// Request behind `response`.
    pub request: Option<SearchRequest>,
}

impl<T> ListState<T> {
    fn initial(page_size: u32) -> Self {
        Self {
            response: SearchResponse::empty(page_size),
            loading: false,
            error: None,
            epoch: 0,
            request: None,
        }
    }
}

/// Runs searches for one table and publishes their outcome.
///
/// Each [`load`](Self::load) takes a new epoch; a response is committed
/// only if no newer load was issued while it was in flight.
pub struct ListStore<T> {
    name: String,
    source: Arc<dyn SearchSource<T>>,
    state: watch::Sender<ListState<T>>,
    epoch: AtomicU64,
}

impl<T> fmt::Debug for ListStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListStore")
            .field("name", &self.name)
            .field("epoch", &self.epoch.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<T> ListStore<T>
where
    T: Send + Sync + 'static,
{
    /// Bind a search source. `name` labels log lines.
    pub fn new(name: impl Into<String>, source: Arc<dyn SearchSource<T>>, page_size: u32) -> Self {
        let (state, _) = watch::channel(ListState::initial(page_size));
        Self {
            name: name.into(),
            source,
            state,
            epoch: AtomicU64::new(0),
        }
    }

    /// Name used in log lines.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<ListState<T>> {
        self.state.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ListState<T>
    where
        T: Clone,
    {
        self.state.borrow().clone()
    }

    /// Run `request` and commit the outcome unless superseded.
    ///
    /// Returns `true` when the outcome was committed.
    pub async fn load(&self, request: SearchRequest) -> bool {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| {
            state.loading = true;
            state.epoch = epoch;
        });

        debug!(
            table = %self.name,
            epoch,
            page = request.page,
            term = request.search_term.as_deref().unwrap_or(""),
            "Loading page"
        );

        let result = self.source.search(&request).await;

        let committed = self.state.send_if_modified(|state| {
            if self.epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            state.loading = false;
            match result {
                Ok(response) => {
                    state.response = response;
                    state.error = None;
                    state.request = Some(request);
                }
                Err(err) => {
                    warn!(table = %self.name, epoch, error = %err, "Page load failed");
                    state.error = Some(err);
                }
            }
            true
        });

        if !committed {
            debug!(table = %self.name, epoch, "Discarding superseded response");
        }
        committed
    }
}
