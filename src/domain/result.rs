//! Result type alias for the prefill pipeline

use super::errors::PrefillError;

/// Result type alias for prefill operations
///
/// # Examples
///
/// ```
/// use prefill::domain::result::Result;
/// use prefill::domain::errors::PrefillError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(PrefillError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, PrefillError>;
