//! # memberhub-cli
//!
//! The terminal console: one-shot list commands, approval and claim
//! workflows, and interactive list sessions. Every list page is a
//! [`pages::ListPage`] rendered through `memberhub-table`.

pub mod commands;
pub mod confirm;
pub mod output;
pub mod pages;

pub use commands::Cli;
