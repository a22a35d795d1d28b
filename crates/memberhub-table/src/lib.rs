//! # memberhub-table
//!
//! The list-view engine shared by every page of the console.
//!
//! - [`DataTable`] is a synchronous state machine: it stages filters,
//!   toggles sorting, tracks the page and debounces the search term, and
//!   turns each state change into a fresh [`SearchRequest`]. It performs
//!   no I/O.
//! - [`ListStore`] runs requests against a
//!   [`SearchSource`](memberhub_core::traits::SearchSource) and publishes
//!   the result through a `watch` channel, discarding superseded responses.
//! - [`TableSession`] couples the two and drives the debounce timer.
//!
//! [`SearchRequest`]: memberhub_core::types::SearchRequest

pub mod action;
pub mod column;
pub mod debounce;
pub mod filter;
pub mod lookup;
pub mod session;
pub mod sort;
pub mod store;
pub mod table;

pub use action::{ActionEvent, DataTableAction};
pub use column::{ColumnType, DataTableColumn};
pub use debounce::Debounce;
pub use filter::{
    CalendarZone, DataTableFilter, FilterComposer, FilterOption, FilterType, StagedValue,
};
pub use lookup::SearchSelect;
pub use session::{SessionHandle, TableEvent, TableSession};
pub use sort::SortState;
pub use store::{ListState, ListStore};
pub use table::{DataTable, DataTableConfig, RenderedRow, RenderedTable, TableState};
