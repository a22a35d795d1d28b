//! List view defaults.

use std::time::Duration;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

/// Defaults applied to every data table and search-select.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Rows per page when a page does not override it.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Quiet period before a typed search term is emitted, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Minimum characters before a search-select issues a lookup.
    #[serde(default = "default_lookup_min_chars")]
    pub lookup_min_chars: usize,
    /// Offset used for date filter boundaries. Local time when unset.
    #[serde(default)]
    pub time_zone_offset_minutes: Option<i32>,
}

impl TableConfig {
    /// Debounce window as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Fixed offset for date filter boundaries, when one is configured.
    ///
    /// `None` means days follow the local zone, daylight saving included.
    pub fn fixed_offset(&self) -> Option<FixedOffset> {
        self.time_zone_offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            debounce_ms: default_debounce_ms(),
            lookup_min_chars: default_lookup_min_chars(),
            time_zone_offset_minutes: None,
        }
    }
}

fn default_page_size() -> u32 {
    10
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_lookup_min_chars() -> usize {
    3
}
