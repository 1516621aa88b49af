//! Result type alias for the usage exporter

use super::errors::UsageExportError;

/// Result type alias using [`UsageExportError`] as the error type
///
/// # Examples
///
/// ```
/// use usage_export::domain::result::Result;
/// use usage_export::domain::errors::UsageExportError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(UsageExportError::Configuration("missing token".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, UsageExportError>;
