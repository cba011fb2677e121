use error_stack::Context;

use crate::ApiError;

/// Shorthand for funneling infrastructure errors into [`ApiError`].
pub trait ResultExt<T> {
    /// Converts the error into an opaque [`ErrorCategory::Internal`]
    /// API error, keeping the original cause in the report.
    ///
    /// [`ErrorCategory::Internal`]: crate::ErrorCategory::Internal
    fn erase_context(self) -> Result<T, ApiError>;
}

impl<T, E: Context> ResultExt<T> for Result<T, E> {
    fn erase_context(self) -> Result<T, ApiError> {
        self.map_err(ApiError::internal)
    }
}
