//! Column declarations and cell rendering.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder for null or missing cells.
pub const EMPTY_CELL: &str = "-";

/// How a raw cell value is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Displayed as-is.
    #[default]
    Text,
    /// Numeric.
    Number,
    /// Two decimal places.
    Currency,
    /// Calendar day.
    Date,
    /// Timestamp, shown in UTC to the minute.
    Datetime,
    /// Yes/No.
    Boolean,
    /// Status badge.
    Status,
}

/// Custom cell formatter: receives the resolved value (`null` when missing)
/// and the whole row.
pub type CellFormatter<T> = Arc<dyn Fn(&Value, &T) -> String + Send + Sync>;

/// A column of a data table.
pub struct DataTableColumn<T> {
    /// Field key; dotted paths reach into eager-loaded relations.
    pub key: String,
    /// Header label.
    pub label: String,
    /// Whether clicking the header toggles sorting.
    pub sortable: bool,
    /// Display type for raw values.
    pub column_type: ColumnType,
    /// Custom formatter, tried first.
    pub format: Option<CellFormatter<T>>,
    /// Raw value to label mapping, tried second.
    pub value_mapping: Option<HashMap<String, String>>,
    /// Link template; `{field}` placeholders are filled from the row.
    pub link_url: Option<String>,
    /// Hidden columns are not rendered.
    pub hidden: bool,
    /// Preferred width in characters.
    pub width: Option<u16>,
}

impl<T> Clone for DataTableColumn<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            sortable: self.sortable,
            column_type: self.column_type,
            format: self.format.clone(),
            value_mapping: self.value_mapping.clone(),
            link_url: self.link_url.clone(),
            hidden: self.hidden,
            width: self.width,
        }
    }
}

impl<T> fmt::Debug for DataTableColumn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTableColumn")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("column_type", &self.column_type)
            .field("hidden", &self.hidden)
            .finish_non_exhaustive()
    }
}

impl<T> DataTableColumn<T> {
    /// A plain text column.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: false,
            column_type: ColumnType::Text,
            format: None,
            value_mapping: None,
            link_url: None,
            hidden: false,
            width: None,
        }
    }

    /// Allow sorting by this column.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Set the display type.
    pub fn of_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }

    /// Set a custom formatter.
    pub fn format<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Value, &T) -> String + Send + Sync + 'static,
    {
        self.format = Some(Arc::new(formatter));
        self
    }

    /// Map raw values to labels.
    pub fn map_values<I, K, V>(mut self, mapping: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.value_mapping = Some(
            mapping
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Link each cell to a URL template.
    pub fn link(mut self, template: impl Into<String>) -> Self {
        self.link_url = Some(template.into());
        self
    }

    /// Hide the column.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Preferred width.
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Render the cell for `row`, whose JSON form is `json`.
    ///
    /// Precedence: formatter, value mapping, raw value, `-`.
    pub fn render(&self, row: &T, json: &Value) -> String {
        let value = resolve_path(json, &self.key).unwrap_or(&Value::Null);

        if let Some(format) = &self.format {
            return format(value, row);
        }

        if value.is_null() {
            return EMPTY_CELL.to_string();
        }

        if let Some(mapping) = &self.value_mapping {
            if let Some(label) = mapping.get(&mapping_key(value)) {
                return label.clone();
            }
        }

        display_raw(self.column_type, value)
    }

    /// The cell's link with placeholders filled, if the column has one.
    pub fn link_for(&self, json: &Value) -> Option<String> {
        let template = self.link_url.as_ref()?;
        let mut url = String::with_capacity(template.len());
        let mut rest = template.as_str();
        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}') else {
                break;
            };
            url.push_str(&rest[..open]);
            let path = &rest[open + 1..open + close];
            match resolve_path(json, path) {
                Some(Value::Null) | None => return None,
                Some(value) => url.push_str(&mapping_key(value)),
            }
            rest = &rest[open + close + 1..];
        }
        url.push_str(rest);
        Some(url)
    }
}

/// Follow a dotted path through nested objects.
pub fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, segment| current.get(segment))
}

fn mapping_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn display_raw(column_type: ColumnType, value: &Value) -> String {
    match (column_type, value) {
        (ColumnType::Boolean, Value::Bool(b)) => (if *b { "Yes" } else { "No" }).to_string(),
        (ColumnType::Currency, Value::Number(n)) => match n.as_f64() {
            Some(amount) => format!("{amount:.2}"),
            None => n.to_string(),
        },
        (ColumnType::Date, Value::String(s)) => s
            .parse::<DateTime<Utc>>()
            .map(|dt| dt.date_naive())
            .or_else(|_| s.parse::<NaiveDate>())
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|_| s.clone()),
        (ColumnType::Datetime, Value::String(s)) => s
            .parse::<DateTime<Utc>>()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| s.clone()),
        (ColumnType::Status, Value::String(s)) => s.replace('_', " "),
        (_, Value::String(s)) => s.clone(),
        (_, Value::Array(items)) => items
            .iter()
            .map(mapping_key)
            .collect::<Vec<_>>()
            .join(", "),
        (_, other) => other.to_string(),
    }
}
