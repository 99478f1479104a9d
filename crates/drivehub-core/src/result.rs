//! Convenience result type alias for DriveHub.

use crate::error::AppError;

/// A specialized `Result` type for DriveHub operations.
pub type AppResult<T> = Result<T, AppError>;
