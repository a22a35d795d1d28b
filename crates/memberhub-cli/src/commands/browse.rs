//! Interactive list session.
//!
//! Lines typed on stdin become [`TableEvent`]s for a running
//! [`TableSession`]; every committed page is printed as it arrives.

use std::sync::Arc;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use memberhub_core::error::AppError;
use memberhub_core::result::AppResult;
use memberhub_table::{
    DataTable, DataTableConfig, FilterComposer, ListState, ListStore, SessionHandle, StagedValue,
    TableEvent, TableSession,
};

use crate::output::{self, OutputFormat};
use crate::pages::{ListPage, PageContext, PageKind};

/// Arguments for browse
#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Page to open
    #[arg(value_enum)]
    pub page: PageKind,
}

/// A parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseCommand {
    /// Forward to the table session.
    Event(TableEvent),
    /// Invoke a row action; rows are numbered from 1.
    Action {
        /// Action label.
        label: String,
        /// Row number on the current page.
        row: usize,
    },
    /// Show the command list.
    Help,
    /// Leave the session.
    Quit,
    /// Blank line.
    Nothing,
}

const HELP: &str = "\
Commands:
  /search <term>          search (empty term clears)
  sort <column>           toggle sorting: asc, desc, off
  page <n> | next | prev  change page
  filter <key>=<value>    stage a filter (apply to run it)
  apply | clear           apply or clear filters
  action <label> <row>    run a row action
  refresh                 reload the current page
  help | quit";

/// Parse one console line against the page's table declaration.
pub fn parse_command<T>(line: &str, config: &DataTableConfig<T>) -> AppResult<BrowseCommand> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(BrowseCommand::Nothing);
    }
    if let Some(term) = line.strip_prefix("/search") {
        return Ok(BrowseCommand::Event(TableEvent::SearchInput(term.trim().to_string())));
    }

    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let command = match word.to_ascii_lowercase().as_str() {
        "sort" if !rest.is_empty() => BrowseCommand::Event(TableEvent::ToggleSort(rest.to_string())),
        "page" => {
            let page = rest
                .parse::<u32>()
                .map_err(|_| AppError::validation(format!("'{rest}' is not a page number")))?;
            BrowseCommand::Event(TableEvent::SetPage(page))
        }
        "next" | "n" => BrowseCommand::Event(TableEvent::NextPage),
        "prev" | "p" => BrowseCommand::Event(TableEvent::PreviousPage),
        "filter" => {
            let (key, raw) = rest
                .split_once('=')
                .ok_or_else(|| AppError::validation("Usage: filter <key>=<value>"))?;
            let key = key.trim();
            let filter = config.find_filter(key).ok_or_else(|| {
                let known: Vec<&str> = config.filters.iter().map(|f| f.key.as_str()).collect();
                AppError::validation(format!(
                    "Unknown filter '{key}'. Available: {}",
                    known.join(", ")
                ))
            })?;
            BrowseCommand::Event(TableEvent::StageFilter {
                key: key.to_string(),
                value: StagedValue::parse(filter.filter_type, raw)?,
            })
        }
        "apply" => BrowseCommand::Event(TableEvent::ApplyFilters),
        "clear" => BrowseCommand::Event(TableEvent::ClearFilters),
        "refresh" | "r" => BrowseCommand::Event(TableEvent::Refresh),
        "action" => {
            let (label, row) = rest
                .rsplit_once(char::is_whitespace)
                .ok_or_else(|| AppError::validation("Usage: action <label> <row>"))?;
            let row = row
                .parse::<usize>()
                .ok()
                .filter(|row| *row >= 1)
                .ok_or_else(|| AppError::validation(format!("'{row}' is not a row number")))?;
            BrowseCommand::Action {
                label: label.trim().to_string(),
                row,
            }
        }
        "help" | "?" => BrowseCommand::Help,
        "quit" | "exit" | "q" => BrowseCommand::Quit,
        _ => {
            return Err(AppError::validation(format!(
                "Unknown command '{line}'. Type help for the list."
            )));
        }
    };
    Ok(command)
}

/// Open the page named in `args`.
pub async fn execute(args: &BrowseArgs, ctx: &PageContext) -> AppResult<()> {
    crate::with_page!(args.page, |page| run(&page, ctx).await)
}

/// Run an interactive session over `page` until `quit` or end of input.
pub async fn run<P: ListPage>(page: &P, ctx: &PageContext) -> AppResult<()> {
    let config = Arc::new(page.table(&ctx.table));
    let table = DataTable::new(Arc::clone(&config), FilterComposer::from_config(&ctx.table));
    let store = Arc::new(ListStore::new(page.name(), page.source(&ctx.api), config.page_size));
    let mut updates = store.subscribe();
    let (session, handle) = TableSession::new(table, Arc::clone(&store));
    let task = tokio::spawn(session.run());

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                show(&config, &state, &handle, ctx.format);
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line, &config) {
                    Ok(BrowseCommand::Event(event)) => handle.send(event).await?,
                    Ok(BrowseCommand::Action { label, row }) => {
                        run_action(page, ctx, &store, &config, &label, row).await;
                    }
                    Ok(BrowseCommand::Help) => println!("{HELP}"),
                    Ok(BrowseCommand::Quit) => break,
                    Ok(BrowseCommand::Nothing) => {}
                    Err(e) => output::print_warning(&e.message),
                }
            }
        }
    }

    if handle.send(TableEvent::Shutdown).await.is_err() {
        debug!(table = page.name(), "Session already stopped");
    }
    task.await
        .map_err(|e| AppError::internal(format!("Table session failed: {e}")))?;
    Ok(())
}

fn show<T: serde::Serialize>(
    config: &DataTableConfig<T>,
    state: &ListState<T>,
    handle: &SessionHandle,
    format: OutputFormat,
) {
    if state.loading {
        output::print_info("Loading...");
        return;
    }
    let rendered = config.render(&state.response, &handle.table_state().sort);
    output::print_page(&rendered, &state.response, format);
    if let Some(err) = &state.error {
        output::print_error(&format!("Showing previous results: {err}"));
    }
}

async fn run_action<P: ListPage>(
    page: &P,
    ctx: &PageContext,
    store: &ListStore<P::Row>,
    config: &DataTableConfig<P::Row>,
    label: &str,
    row: usize,
) {
    let state = store.snapshot();
    let Some(item) = state.response.items.get(row - 1) else {
        output::print_warning(&format!("No row {row} on this page"));
        return;
    };
    let Some(event) = config.invoke_action(label, item) else {
        output::print_warning(&format!("'{label}' is not offered for row {row}"));
        return;
    };
    if let Err(e) = page.handle_action(ctx, event).await {
        output::print_error(&e.to_string());
    }
}
