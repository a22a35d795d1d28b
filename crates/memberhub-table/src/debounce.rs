//! Quiet-period debouncing of a changing value.

use std::time::Duration;

use tokio::time::Instant;

/// Debouncer with an injected clock.
///
/// A pushed value becomes due once `window` has passed without another
/// push. A due value is emitted only if it differs from the last emitted
/// one. Callers supply `now`, so the machine runs the same under a real
/// or paused tokio clock.
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    /// Quiet period.
    window: Duration,
    /// Latest value and the instant it becomes due.
    pending: Option<(T, Instant)>,
    /// Last value handed out by [`poll`](Self::poll).
    last_emitted: Option<T>,
}

impl<T: Clone + PartialEq> Debounce<T> {
    /// Create a debouncer with nothing emitted yet.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            last_emitted: None,
        }
    }

    /// Create a debouncer that treats `initial` as already emitted.
    pub fn with_initial(window: Duration, initial: T) -> Self {
        Self {
            window,
            pending: None,
            last_emitted: Some(initial),
        }
    }

    /// Record a new value, restarting the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.window));
    }

    /// Drop the pending value, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// When the pending value becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    /// Emit the pending value if it is due and distinct.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, due)) if *due <= now => {}
            _ => return None,
        }
        let (value, _) = self.pending.take()?;
        self.emit(value)
    }

    /// Emit the pending value immediately if it is distinct.
    pub fn flush(&mut self) -> Option<T> {
        let (value, _) = self.pending.take()?;
        self.emit(value)
    }

    fn emit(&mut self, value: T) -> Option<T> {
        if self.last_emitted.as_ref() == Some(&value) {
            return None;
        }
        self.last_emitted = Some(value.clone());
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(300);

    #[test]
    fn test_burst_emits_last_value_once() {
        let t0 = Instant::now();
        let mut debounce = Debounce::new(WINDOW);
        debounce.push("j", t0);
        debounce.push("jo", t0 + Duration::from_millis(100));
        debounce.push("joh", t0 + Duration::from_millis(200));

        assert_eq!(debounce.poll(t0 + Duration::from_millis(400)), None);
        assert_eq!(debounce.poll(t0 + Duration::from_millis(500)), Some("joh"));
        assert_eq!(debounce.poll(t0 + Duration::from_millis(900)), None);
    }

    #[test]
    fn test_repeated_value_suppressed() {
        let t0 = Instant::now();
        let mut debounce = Debounce::with_initial(WINDOW, String::new());
        debounce.push("ann".to_string(), t0);
        assert_eq!(debounce.poll(t0 + WINDOW), Some("ann".to_string()));

        debounce.push("anne".to_string(), t0 + WINDOW);
        debounce.push("ann".to_string(), t0 + WINDOW * 2);
        assert_eq!(debounce.poll(t0 + WINDOW * 3), None);
        assert!(debounce.deadline().is_none());
    }

    #[test]
    fn test_initial_value_counts_as_emitted() {
        let t0 = Instant::now();
        let mut debounce = Debounce::with_initial(WINDOW, String::new());
        debounce.push(String::new(), t0);
        assert_eq!(debounce.flush(), None);
    }
}
