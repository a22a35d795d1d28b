//! One-shot listing: build the request from flags, load one page, print it.

use std::sync::Arc;

use clap::Args;
use serde::Serialize;

use memberhub_core::error::AppError;
use memberhub_core::result::AppResult;
use memberhub_core::traits::SearchSource;
use memberhub_core::types::{SearchRequest, SortOrder};
use memberhub_table::{DataTable, DataTableConfig, FilterComposer, ListStore, StagedValue};

use crate::output;
use crate::pages::{ListPage, PageContext};

/// Search, filter, sort and paging flags shared by every list
#[derive(Debug, Clone, Default, Args)]
pub struct QueryArgs {
    /// Search term
    #[arg(short, long)]
    pub search: Option<String>,

    /// Filter as KEY=VALUE; repeatable. Multiselects take a,b; date ranges
    /// take 2024-01-01..2024-01-31
    #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub filters: Vec<(String, String)>,

    /// Sort column, optionally COLUMN:desc
    #[arg(long, value_name = "COLUMN[:asc|desc]")]
    pub sort: Option<String>,

    /// Page number
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,

    /// Rows per page
    #[arg(long)]
    pub page_size: Option<u32>,
}

/// Parse `key=value`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

/// Parse `column`, `column:asc` or `column:desc`.
pub fn parse_sort(raw: &str) -> AppResult<(String, SortOrder)> {
    let (column, order) = match raw.split_once(':') {
        Some((column, order)) => (column, order.trim()),
        None => (raw, "asc"),
    };
    let order = match order.to_ascii_lowercase().as_str() {
        "asc" => SortOrder::Asc,
        "desc" => SortOrder::Desc,
        other => {
            return Err(AppError::validation(format!(
                "Sort order must be asc or desc, got '{other}'"
            )));
        }
    };
    Ok((column.trim().to_string(), order))
}

/// Drive the table with the flags, the same way an operator would, and
/// return the request it ends up emitting.
pub fn prepare<T>(table: &mut DataTable<T>, query: &QueryArgs) -> AppResult<SearchRequest> {
    if let Some(term) = &query.search {
        table.submit_search(term);
    }

    if let Some(raw) = &query.sort {
        let (column, order) = parse_sort(raw)?;
        // A sort cycle has three states, so three toggles reach any of them.
        for _ in 0..3 {
            if table.state().sort.order_for(&column) == Some(order) {
                break;
            }
            if table.toggle_sort(&column).is_none() {
                return Err(AppError::validation(format!(
                    "Column '{column}' cannot be sorted"
                )));
            }
        }
    }

    for (key, raw) in &query.filters {
        let filter_type = table
            .config()
            .find_filter(key)
            .map(|filter| filter.filter_type)
            .ok_or_else(|| {
                let known: Vec<&str> = table.config().filters.iter().map(|f| f.key.as_str()).collect();
                AppError::validation(format!(
                    "Unknown filter '{key}'. Available: {}",
                    known.join(", ")
                ))
            })?;
        let value = StagedValue::parse(filter_type, raw)?;
        table.stage_filter(key, value);
    }
    if !query.filters.is_empty() {
        table.apply_filters();
    }

    if query.page > 1 {
        table.set_page(query.page);
    }
    Ok(table.request())
}

/// List one page of `page`.
pub async fn run<P: ListPage>(page: &P, query: &QueryArgs, ctx: &PageContext) -> AppResult<()> {
    run_query(
        page.name(),
        page.table(&ctx.table),
        page.source(&ctx.api),
        query,
        ctx,
    )
    .await
}

/// List one page of an arbitrary table/source pair.
pub async fn run_query<T>(
    name: &str,
    config: DataTableConfig<T>,
    source: Arc<dyn SearchSource<T>>,
    query: &QueryArgs,
    ctx: &PageContext,
) -> AppResult<()>
where
    T: Clone + Serialize + Send + Sync + 'static,
{
    let config = match query.page_size {
        Some(size) => config.page_size(size),
        None => config,
    };
    let page_size = config.page_size;
    let mut table = DataTable::new(Arc::new(config), FilterComposer::from_config(&ctx.table));
    let request = prepare(&mut table, query)?;

    let store = ListStore::new(name, source, page_size);
    store.load(request).await;
    let state = store.snapshot();
    if let Some(err) = state.error {
        return Err(err);
    }

    let rendered = table.render(&state.response);
    output::print_page(&rendered, &state.response, ctx.format);
    Ok(())
}
