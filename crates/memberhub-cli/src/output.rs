//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use memberhub_core::types::SearchResponse;
use memberhub_table::RenderedTable;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print one page of a list view in the selected format
pub fn print_page<T: Serialize>(
    rendered: &RenderedTable,
    response: &SearchResponse<T>,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Table => {
            if rendered.rows.is_empty() {
                println!("{}", rendered.summary);
                return;
            }
            println!("{}", rendered_table(rendered));
            println!("{}", rendered.summary);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(response).unwrap_or_else(|_| "{}".to_string());
            println!("{}", json);
        }
    }
}

/// Build the terminal table for a rendered page. Rows are numbered from 1
/// so actions can refer to them.
pub fn rendered_table(rendered: &RenderedTable) -> String {
    let with_actions = rendered.rows.iter().any(|row| !row.actions.is_empty());

    let mut builder = Builder::default();
    let mut header = vec!["#".to_string()];
    header.extend(rendered.headers.iter().cloned());
    if with_actions {
        header.push("Actions".to_string());
    }
    builder.push_record(header);

    for (index, row) in rendered.rows.iter().enumerate() {
        let mut record = vec![(index + 1).to_string()];
        record.extend(row.cells.iter().cloned());
        if with_actions {
            record.push(row.actions.join(", "));
        }
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// Print a list of fixed-shape rows in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                let mut table = Table::new(items);
                table.with(Style::rounded());
                println!("{}", table);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}

/// Print a single item in the selected format
pub fn print_item<T: Serialize>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => match serde_json::to_value(item) {
            Ok(Value::Object(fields)) => {
                for (key, value) in &fields {
                    print_kv(key, &display_value(value));
                }
            }
            Ok(other) => println!("{}", display_value(&other)),
            Err(_) => println!("-"),
        },
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
            println!("{}", json);
        }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print an informational message
pub fn print_info(msg: &str) {
    println!("ℹ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{}:", key), value);
}

#[cfg(test)]
mod tests {
    use memberhub_table::RenderedRow;

    use super::*;

    fn rendered(actions: Vec<String>) -> RenderedTable {
        RenderedTable {
            headers: vec!["Name ▲".to_string(), "Status".to_string()],
            rows: vec![RenderedRow {
                cells: vec!["Asha Nair".to_string(), "active".to_string()],
                links: vec![None, None],
                actions,
            }],
            summary: "Showing 1-1 of 1 (page 1 of 1)".to_string(),
        }
    }

    #[test]
    fn test_rows_are_numbered() {
        let text = rendered_table(&rendered(Vec::new()));
        assert!(text.contains("Name ▲"));
        assert!(text.contains("Asha Nair"));
        assert!(!text.contains("Actions"));
    }

    #[test]
    fn test_actions_column_when_offered() {
        let text = rendered_table(&rendered(vec!["Suspend".to_string(), "Nominees".to_string()]));
        assert!(text.contains("Actions"));
        assert!(text.contains("Suspend, Nominees"));
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&Value::Null), "-");
        assert_eq!(display_value(&Value::String("x".into())), "x");
        assert_eq!(display_value(&serde_json::json!(3)), "3");
    }
}
