//! The datatable state machine.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, warn};

use memberhub_core::config::table::TableConfig;
use memberhub_core::types::search::DEFAULT_PAGE_SIZE;
use memberhub_core::types::{Filter, SearchRequest, SearchResponse, SortOrder};

use crate::action::{ActionEvent, DataTableAction};
use crate::column::DataTableColumn;
use crate::debounce::Debounce;
use crate::filter::{DataTableFilter, FilterComposer, StagedValue};
use crate::sort::SortState;

/// Default debounce window for search input.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Everything a list page declares about its table.
///
/// Owned by the page and shared read-only with the table.
pub struct DataTableConfig<T> {
    /// Columns in display order.
    pub columns: Vec<DataTableColumn<T>>,
    /// Row actions.
    pub actions: Vec<DataTableAction<T>>,
    /// Filter widgets.
    pub filters: Vec<DataTableFilter>,
    /// Fields the search term is matched against.
    pub search_fields: Vec<String>,
    /// Relations the server embeds in each row.
    pub eager_load: Vec<String>,
    /// Rows per page.
    pub page_size: u32,
    /// Quiet period before a typed term is emitted.
    pub debounce: Duration,
    /// Initial sort.
    pub default_sort: Option<(String, SortOrder)>,
}

impl<T> fmt::Debug for DataTableConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTableConfig")
            .field("columns", &self.columns)
            .field("actions", &self.actions)
            .field("filters", &self.filters)
            .field("search_fields", &self.search_fields)
            .field("eager_load", &self.eager_load)
            .field("page_size", &self.page_size)
            .field("debounce", &self.debounce)
            .field("default_sort", &self.default_sort)
            .finish()
    }
}

impl<T> Default for DataTableConfig<T> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            actions: Vec::new(),
            filters: Vec::new(),
            search_fields: Vec::new(),
            eager_load: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            debounce: DEFAULT_DEBOUNCE,
            default_sort: None,
        }
    }
}

impl<T> DataTableConfig<T> {
    /// An empty configuration with default paging and debounce.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take page size and debounce from the application configuration.
    pub fn with_defaults(mut self, table: &TableConfig) -> Self {
        self.page_size = table.page_size.max(1);
        self.debounce = table.debounce();
        self
    }

    /// Add a column.
    pub fn column(mut self, column: DataTableColumn<T>) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a row action.
    pub fn action(mut self, action: DataTableAction<T>) -> Self {
        self.actions.push(action);
        self
    }

    /// Add a filter widget.
    pub fn filter(mut self, filter: DataTableFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set the searched fields.
    pub fn search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the embedded relations.
    pub fn eager_load<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.eager_load = relations.into_iter().map(Into::into).collect();
        self
    }

    /// Set rows per page.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the search debounce window.
    pub fn debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }

    /// Start sorted.
    pub fn default_sort(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.default_sort = Some((column.into(), order));
        self
    }

    /// Find a column by key.
    pub fn find_column(&self, key: &str) -> Option<&DataTableColumn<T>> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Find a filter widget by key.
    pub fn find_filter(&self, key: &str) -> Option<&DataTableFilter> {
        self.filters.iter().find(|f| f.key == key)
    }

    /// Columns that are rendered.
    pub fn visible_columns(&self) -> impl Iterator<Item = &DataTableColumn<T>> {
        self.columns.iter().filter(|c| !c.hidden)
    }

    /// Actions offered for `row`.
    pub fn visible_actions<'a>(&'a self, row: &'a T) -> impl Iterator<Item = &'a DataTableAction<T>> {
        self.actions.iter().filter(move |a| a.is_visible(row))
    }

    /// Invoke the action labelled `label` on `row`, if it is offered there.
    /// Labels match case-insensitively.
    pub fn invoke_action(&self, label: &str, row: &T) -> Option<ActionEvent<T>>
    where
        T: Clone,
    {
        self.visible_actions(row)
            .find(|a| a.label.eq_ignore_ascii_case(label))
            .map(|a| a.invoke(row))
    }
}

impl<T: Serialize> DataTableConfig<T> {
    /// Project a page into display strings, marking the sorted column.
    pub fn render(&self, response: &SearchResponse<T>, sort: &SortState) -> RenderedTable {
        let headers = self
            .visible_columns()
            .map(|column| match sort.order_for(&column.key) {
                Some(SortOrder::Asc) => format!("{} ▲", column.label),
                Some(SortOrder::Desc) => format!("{} ▼", column.label),
                None => column.label.clone(),
            })
            .collect();

        let rows = response
            .items
            .iter()
            .map(|row| {
                let json = match serde_json::to_value(row) {
                    Ok(json) => json,
                    Err(err) => {
                        warn!(error = %err, "Row could not be serialized; rendering empty cells");
                        serde_json::Value::Null
                    }
                };
                let (cells, links) = self
                    .visible_columns()
                    .map(|column| (column.render(row, &json), column.link_for(&json)))
                    .unzip();
                RenderedRow {
                    cells,
                    links,
                    actions: self.visible_actions(row).map(|a| a.label.clone()).collect(),
                }
            })
            .collect();

        RenderedTable {
            headers,
            rows,
            summary: summarize(response),
        }
    }
}

/// Transient state of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    /// Last emitted search term.
    pub search_term: String,
    /// Sort column and order.
    pub sort: SortState,
    /// Current page (1-based).
    pub page: u32,
    /// Rows per page.
    pub page_size: u32,
    /// Widget values not yet applied.
    pub staged: HashMap<String, StagedValue>,
    /// Predicates in effect.
    pub active: Vec<Filter>,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    /// Cell text per visible column.
    pub cells: Vec<String>,
    /// Link per visible column.
    pub links: Vec<Option<String>>,
    /// Labels of the actions offered for this row.
    pub actions: Vec<String>,
}

/// A page projected for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    /// Header labels, with a marker on the sorted column.
    pub headers: Vec<String>,
    /// Rows.
    pub rows: Vec<RenderedRow>,
    /// e.g. `Showing 91-95 of 95 (page 10 of 10)`.
    pub summary: String,
}

/// Search, sort, paging and filter state for one list page.
///
/// Every state change that should reach the server returns the fresh
/// [`SearchRequest`] to send. The table itself never performs I/O.
pub struct DataTable<T> {
    config: Arc<DataTableConfig<T>>,
    composer: FilterComposer,
    state: TableState,
    search: Debounce<String>,
}

impl<T> fmt::Debug for DataTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("state", &self.state)
            .field("pending_search", &self.search.deadline())
            .finish_non_exhaustive()
    }
}

impl<T> DataTable<T> {
    /// Create a table. Filter defaults are staged and applied at once.
    pub fn new(config: Arc<DataTableConfig<T>>, composer: FilterComposer) -> Self {
        let staged: HashMap<String, StagedValue> = config
            .filters
            .iter()
            .filter_map(|f| f.default_value.clone().map(|v| (f.key.clone(), v)))
            .collect();
        let active = composer.compose_all(&config.filters, &staged);
        let sort = match &config.default_sort {
            Some((column, order)) => SortState::by(column.clone(), *order),
            None => SortState::default(),
        };

        Self {
            state: TableState {
                search_term: String::new(),
                sort,
                page: 1,
                page_size: config.page_size.max(1),
                staged,
                active,
            },
            search: Debounce::with_initial(config.debounce, String::new()),
            composer,
            config,
        }
    }

    /// The shared configuration.
    pub fn config(&self) -> &Arc<DataTableConfig<T>> {
        &self.config
    }

    /// Current state.
    pub fn state(&self) -> &TableState {
        &self.state
    }

    /// The request describing the current state.
    pub fn request(&self) -> SearchRequest {
        let mut request = SearchRequest::new(self.state.page, self.state.page_size)
            .with_search_term(self.state.search_term.clone())
            .with_search_fields(self.config.search_fields.iter().cloned())
            .with_eager_load(self.config.eager_load.iter().cloned())
            .with_filters(self.state.active.clone());
        if let (Some(column), Some(order)) = (self.state.sort.column(), self.state.sort.order()) {
            request = request.sorted_by(column, order);
        }
        request
    }

    /// Record a keystroke in the search box.
    pub fn input_search(&mut self, term: &str, now: Instant) {
        self.search.push(term.trim().to_string(), now);
    }

    /// When the pending search term becomes due.
    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    /// Emit the pending search term if it is due and differs from the last
    /// one. A new term resets the page to 1.
    pub fn poll_search(&mut self, now: Instant) -> Option<SearchRequest> {
        let term = self.search.poll(now)?;
        debug!(term = %term, "Search term changed");
        self.state.search_term = term;
        self.state.page = 1;
        Some(self.request())
    }

    /// Emit `term` now, skipping the quiet period. Returns `None` when it
    /// equals the last emitted term.
    pub fn submit_search(&mut self, term: &str) -> Option<SearchRequest> {
        self.search.push(term.trim().to_string(), Instant::now());
        let term = self.search.flush()?;
        self.state.search_term = term;
        self.state.page = 1;
        Some(self.request())
    }

    /// Toggle sorting on a sortable column. The page is kept.
    pub fn toggle_sort(&mut self, key: &str) -> Option<SearchRequest> {
        match self.config.find_column(key) {
            Some(column) if column.sortable => {
                self.state.sort.toggle(key);
                Some(self.request())
            }
            _ => None,
        }
    }

    /// Go to a page (at least 1).
    pub fn set_page(&mut self, page: u32) -> SearchRequest {
        self.state.page = page.max(1);
        self.request()
    }

    /// Stage a widget value without emitting. Returns `false` for an
    /// unknown filter key.
    pub fn stage_filter(&mut self, key: &str, value: StagedValue) -> bool {
        if self.config.find_filter(key).is_none() {
            return false;
        }
        self.state.staged.insert(key.to_string(), value);
        true
    }

    /// Apply the staged values. The page resets to 1.
    pub fn apply_filters(&mut self) -> SearchRequest {
        self.state.active = self
            .composer
            .compose_all(&self.config.filters, &self.state.staged);
        self.state.page = 1;
        debug!(active = self.state.active.len(), "Filters applied");
        self.request()
    }

    /// Drop staged and active filters. The page resets to 1.
    pub fn clear_filters(&mut self) -> SearchRequest {
        self.state.staged.clear();
        self.state.active.clear();
        self.state.page = 1;
        self.request()
    }

    /// Invoke the action labelled `label` on `row`, if it is offered there.
    pub fn invoke_action(&self, label: &str, row: &T) -> Option<ActionEvent<T>>
    where
        T: Clone,
    {
        self.config.invoke_action(label, row)
    }
}

impl<T: Serialize> DataTable<T> {
    /// Project a page into display strings.
    pub fn render(&self, response: &SearchResponse<T>) -> RenderedTable {
        self.config.render(response, &self.state.sort)
    }
}

fn summarize<T>(response: &SearchResponse<T>) -> String {
    match response.item_range() {
        Some((first, last)) => format!(
            "Showing {first}-{last} of {} (page {} of {})",
            response.total, response.page, response.total_pages
        ),
        None => "No records found".to_string(),
    }
}
