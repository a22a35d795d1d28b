//! Event loop coupling a [`DataTable`] with its [`ListStore`].

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};

use memberhub_core::error::AppError;
use memberhub_core::result::AppResult;
use memberhub_core::types::SearchRequest;

use crate::filter::StagedValue;
use crate::store::ListStore;
use crate::table::{DataTable, TableState};

/// Capacity of the event channel.
const EVENT_BUFFER: usize = 64;

/// Operator input for a table session.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    /// Search box contents changed.
    SearchInput(String),
    /// Column header clicked.
    ToggleSort(String),
    /// Jump to a page.
    SetPage(u32),
    /// Next page, if there is one.
    NextPage,
    /// Previous page, if there is one.
    PreviousPage,
    /// Filter widget changed.
    StageFilter {
        /// Filter key.
        key: String,
        /// New widget value.
        value: StagedValue,
    },
    /// Apply staged filters.
    ApplyFilters,
    /// Clear all filters.
    ClearFilters,
    /// Reload the current page.
    Refresh,
    /// Stop the session.
    Shutdown,
}

/// Sends events to a running [`TableSession`] and observes its table state.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<TableEvent>,
    state: watch::Receiver<TableState>,
}

impl SessionHandle {
    /// Queue an event.
    pub async fn send(&self, event: TableEvent) -> AppResult<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| AppError::internal("Table session has stopped"))
    }

    /// Latest table state (term, sort, page, filters).
    pub fn table_state(&self) -> TableState {
        self.state.borrow().clone()
    }
}

/// Drives one table: applies events, fires the debounced search and
/// starts one load per emitted request.
///
/// Loads run as separate tasks; the store discards any response that a
/// newer load has superseded.
pub struct TableSession<T> {
    table: DataTable<T>,
    store: Arc<ListStore<T>>,
    events: mpsc::Receiver<TableEvent>,
    state: watch::Sender<TableState>,
}

impl<T> TableSession<T>
where
    T: Send + Sync + 'static,
{
    /// Create a session and the handle that feeds it.
    pub fn new(table: DataTable<T>, store: Arc<ListStore<T>>) -> (Self, SessionHandle) {
        let (tx, events) = mpsc::channel(EVENT_BUFFER);
        let (state, state_rx) = watch::channel(table.state().clone());
        (
            Self {
                table,
                store,
                events,
                state,
            },
            SessionHandle {
                tx,
                state: state_rx,
            },
        )
    }

    /// Run until [`TableEvent::Shutdown`] or until every handle is dropped.
    ///
    /// Loads the initial page first. Returns the table so its final state
    /// can be inspected.
    pub async fn run(mut self) -> DataTable<T> {
        info!(table = %self.store.name(), "Table session started");
        self.spawn_load(self.table.request());

        loop {
            let deadline = self.table.search_deadline();
            tokio::select! {
                event = self.events.recv() => match event {
                    None | Some(TableEvent::Shutdown) => break,
                    Some(event) => {
                        if let Some(request) = self.apply(event) {
                            self.spawn_load(request);
                        }
                    }
                },
                _ = wait_until(deadline) => {
                    if let Some(request) = self.table.poll_search(Instant::now()) {
                        self.spawn_load(request);
                    }
                }
            }
        }

        info!(table = %self.store.name(), "Table session stopped");
        self.table
    }

    fn apply(&mut self, event: TableEvent) -> Option<SearchRequest> {
        debug!(table = %self.store.name(), ?event, "Table event");
        match event {
            TableEvent::SearchInput(term) => {
                self.table.input_search(&term, Instant::now());
                None
            }
            TableEvent::ToggleSort(column) => self.table.toggle_sort(&column),
            TableEvent::SetPage(page) => Some(self.table.set_page(page)),
            TableEvent::NextPage => {
                let page = self.table.state().page;
                match self.known_total_pages() {
                    Some(total_pages) => {
                        (page < total_pages).then(|| self.table.set_page(page + 1))
                    }
                    None => {
                        debug!(
                            table = %self.store.name(),
                            "Page count unknown until the current query loads"
                        );
                        None
                    }
                }
            }
            TableEvent::PreviousPage => {
                let page = self.table.state().page;
                (page > 1).then(|| self.table.set_page(page - 1))
            }
            TableEvent::StageFilter { key, value } => {
                if self.table.stage_filter(&key, value) {
                    self.state.send_replace(self.table.state().clone());
                } else {
                    debug!(table = %self.store.name(), key = %key, "Ignoring unknown filter");
                }
                None
            }
            TableEvent::ApplyFilters => Some(self.table.apply_filters()),
            TableEvent::ClearFilters => Some(self.table.clear_filters()),
            TableEvent::Refresh => Some(self.table.request()),
            TableEvent::Shutdown => None,
        }
    }

    /// Page count of the current query. `None` while the last committed
    /// response answers a different term, sort or filter set.
    fn known_total_pages(&self) -> Option<u32> {
        let current = self.table.request();
        let updates = self.store.subscribe();
        let state = updates.borrow();
        let mut committed = state.request.clone()?;
        committed.page = current.page;
        (committed == current).then_some(state.response.total_pages)
    }

    fn spawn_load(&self, request: SearchRequest) {
        self.state.send_replace(self.table.state().clone());
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            store.load(request).await;
        });
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
