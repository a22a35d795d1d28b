//! # memberhub-core
//!
//! Core crate for MemberHub. Contains configuration schemas, typed
//! identifiers, the search/filter/pagination contract shared by every
//! list view, the seams implemented by other crates, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other MemberHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
