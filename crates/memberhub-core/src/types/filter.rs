//! Filter predicates carried by a [`SearchRequest`](super::search::SearchRequest).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    /// Exact equality.
    Equals,
    /// Not equal.
    NotEquals,
    /// Substring match.
    Contains,
    /// List membership.
    In,
    /// List non-membership.
    NotIn,
    /// Greater than or equal.
    Gte,
    /// Less than or equal.
    Lte,
    /// Greater than.
    Gt,
    /// Less than.
    Lt,
    /// Inclusive range; value is a two-element list.
    Between,
    /// Field is null; value ignored.
    IsNull,
    /// Field is not null; value ignored.
    IsNotNull,
}

impl FilterOperator {
    /// Whether the operator expects a list value.
    pub fn takes_list(&self) -> bool {
        matches!(self, Self::In | Self::NotIn | Self::Between)
    }

    /// Whether the operator ignores its value.
    pub fn ignores_value(&self) -> bool {
        matches!(self, Self::IsNull | Self::IsNotNull)
    }

    /// Wire name of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::Contains => "contains",
            Self::In => "in",
            Self::NotIn => "notIn",
            Self::Gte => "gte",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Between => "between",
            Self::IsNull => "isNull",
            Self::IsNotNull => "isNotNull",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dynamic filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// No value (for `isNull`, `isNotNull`).
    Null,
    /// A boolean value.
    Bool(bool),
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// A string value (dates travel as ISO-8601 strings).
    Text(String),
    /// A list of values (for `in`, `notIn`, `between`).
    List(Vec<FilterValue>),
}

impl FilterValue {
    /// Build a list value from anything convertible into values.
    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    /// Parse a widget string, turning `"true"`/`"false"` into booleans.
    pub fn coerce(raw: &str) -> Self {
        match raw {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            other => Self::Text(other.to_string()),
        }
    }

    /// Null, empty string, or empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            _ => false,
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A single predicate on a named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Field name; dotted paths address eager-loaded relations.
    pub field: String,
    /// Comparison operator.
    pub operator: FilterOperator,
    /// Comparison value. Its shape must match the operator.
    pub value: FilterValue,
    /// Invert the predicate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negate: Option<bool>,
}

impl Filter {
    /// Create a filter, checking that the value shape matches the operator.
    pub fn try_new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: FilterValue,
    ) -> AppResult<Self> {
        let filter = Self {
            field: field.into(),
            operator,
            value: if operator.ignores_value() {
                FilterValue::Null
            } else {
                value
            },
            negate: None,
        };
        filter.validate()?;
        Ok(filter)
    }

    /// Equality filter.
    pub fn equals(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            operator: FilterOperator::Equals,
            value: value.into(),
            negate: None,
        }
    }

    /// List-membership filter.
    pub fn one_of<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        Self {
            field: field.into(),
            operator: FilterOperator::In,
            value: FilterValue::list(values),
            negate: None,
        }
    }

    /// Inclusive range filter.
    pub fn between(
        field: impl Into<String>,
        low: impl Into<FilterValue>,
        high: impl Into<FilterValue>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: FilterOperator::Between,
            value: FilterValue::List(vec![low.into(), high.into()]),
            negate: None,
        }
    }

    /// Null check.
    pub fn is_null(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: FilterOperator::IsNull,
            value: FilterValue::Null,
            negate: None,
        }
    }

    /// Check that the value shape matches the operator.
    pub fn validate(&self) -> AppResult<()> {
        if self.field.trim().is_empty() {
            return Err(AppError::validation("Filter field must not be empty"));
        }
        match (&self.operator, &self.value) {
            (op, _) if op.ignores_value() => Ok(()),
            (FilterOperator::Between, FilterValue::List(items)) if items.len() == 2 => Ok(()),
            (FilterOperator::Between, _) => Err(AppError::validation(format!(
                "Filter '{}' with operator 'between' requires a two-element list",
                self.field
            ))),
            (op, FilterValue::List(_)) if op.takes_list() => Ok(()),
            (op, _) if op.takes_list() => Err(AppError::validation(format!(
                "Filter '{}' with operator '{op}' requires a list value",
                self.field
            ))),
            (op, FilterValue::List(_)) => Err(AppError::validation(format!(
                "Filter '{}' with operator '{op}' does not accept a list value",
                self.field
            ))),
            _ => Ok(()),
        }
    }
}
