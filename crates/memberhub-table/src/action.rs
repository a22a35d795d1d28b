//! Row actions.

use std::fmt;
use std::sync::Arc;

/// Runs when an action is invoked on a row.
pub type ActionCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Decides whether an action is offered for a row.
pub type VisiblePredicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// A per-row action such as "Suspend" or "View pipeline".
pub struct DataTableAction<T> {
    /// Button label; also identifies the action.
    pub label: String,
    callback: Option<ActionCallback<T>>,
    visible: Option<VisiblePredicate<T>>,
}

impl<T> Clone for DataTableAction<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            callback: self.callback.clone(),
            visible: self.visible.clone(),
        }
    }
}

impl<T> fmt::Debug for DataTableAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTableAction")
            .field("label", &self.label)
            .field("conditional", &self.visible.is_some())
            .finish()
    }
}

/// Emitted when an action is invoked.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEvent<T> {
    /// Action label.
    pub action: String,
    /// Row it was invoked on.
    pub row: T,
}

impl<T> DataTableAction<T> {
    /// An always-visible action with no callback.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            callback: None,
            visible: None,
        }
    }

    /// Run `callback` on invocation.
    pub fn on_invoke<F>(mut self, callback: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Offer the action only where `predicate` holds.
    pub fn visible_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.visible = Some(Arc::new(predicate));
        self
    }

    /// Whether the action is offered for `row`.
    pub fn is_visible(&self, row: &T) -> bool {
        self.visible.as_ref().is_none_or(|visible| visible(row))
    }

    /// Run the callback and produce the event for outer listeners.
    pub fn invoke(&self, row: &T) -> ActionEvent<T>
    where
        T: Clone,
    {
        if let Some(callback) = &self.callback {
            callback(row);
        }
        ActionEvent {
            action: self.label.clone(),
            row: row.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_visibility_predicate() {
        let suspend = DataTableAction::<u32>::new("Suspend").visible_when(|status| *status == 1);
        assert!(suspend.is_visible(&1));
        assert!(!suspend.is_visible(&2));
        assert!(DataTableAction::<u32>::new("View").is_visible(&2));
    }

    #[test]
    fn test_invoke_runs_callback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let action = DataTableAction::<String>::new("View").on_invoke(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let event = action.invoke(&"row-1".to_string());
        assert_eq!(event.action, "View");
        assert_eq!(event.row, "row-1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
