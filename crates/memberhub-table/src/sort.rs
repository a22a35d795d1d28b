//! Three-state column sorting.

use memberhub_core::types::SortOrder;

/// Which column is sorted, and how.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    column: Option<String>,
    order: Option<SortOrder>,
}

impl SortState {
    /// Start sorted by `column`.
    pub fn by(column: impl Into<String>, order: SortOrder) -> Self {
        Self {
            column: Some(column.into()),
            order: Some(order),
        }
    }

    /// Cycle `column`: unsorted, ascending, descending, unsorted.
    ///
    /// A different column replaces the current one and starts ascending.
    pub fn toggle(&mut self, column: &str) {
        let next = match (self.column.as_deref(), self.order) {
            (Some(current), Some(SortOrder::Asc)) if current == column => Some(SortOrder::Desc),
            (Some(current), Some(SortOrder::Desc)) if current == column => None,
            _ => Some(SortOrder::Asc),
        };
        match next {
            Some(order) => {
                self.column = Some(column.to_string());
                self.order = Some(order);
            }
            None => self.clear(),
        }
    }

    /// Remove sorting.
    pub fn clear(&mut self) {
        self.column = None;
        self.order = None;
    }

    /// Sorted column.
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Sort order, present exactly when a column is.
    pub fn order(&self) -> Option<SortOrder> {
        self.order
    }

    /// The order applied to `column`, if it is the sorted one.
    pub fn order_for(&self, column: &str) -> Option<SortOrder> {
        match self.column.as_deref() {
            Some(current) if current == column => self.order,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle() {
        let mut sort = SortState::default();
        sort.toggle("name");
        assert_eq!((sort.column(), sort.order()), (Some("name"), Some(SortOrder::Asc)));
        sort.toggle("name");
        assert_eq!((sort.column(), sort.order()), (Some("name"), Some(SortOrder::Desc)));
        sort.toggle("name");
        assert_eq!((sort.column(), sort.order()), (None, None));
    }

    #[test]
    fn test_other_column_restarts_ascending() {
        let mut sort = SortState::by("name", SortOrder::Desc);
        sort.toggle("createdAt");
        assert_eq!(sort.column(), Some("createdAt"));
        assert_eq!(sort.order(), Some(SortOrder::Asc));
        assert_eq!(sort.order_for("name"), None);
    }
}
