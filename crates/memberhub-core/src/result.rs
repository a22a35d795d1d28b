//! Convenience result type alias for MemberHub.

use crate::error::AppError;

/// A specialized `Result` type for MemberHub operations.
pub type AppResult<T> = Result<T, AppError>;
