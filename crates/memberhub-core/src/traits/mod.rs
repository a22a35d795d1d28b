//! Seams defined in `memberhub-core` and implemented by other crates.

pub mod confirmation;
pub mod search_source;

pub use confirmation::{Confirmation, ConfirmRequest, ToastLevel};
pub use search_source::SearchSource;
