//! Logging and observability
//!
//! Structured logging with:
//! - JSON-formatted file logs
//! - Configurable log levels
//! - Local file rotation
//!
//! # Example
//!
//! ```no_run
//! use prefill::logging::init_logging;
//! use prefill::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the start of a prefill run
///
/// # Example
///
/// ```no_run
/// use prefill::log_prefill_start;
/// use prefill::domain::{CorrelationId, ReplyTo};
///
/// let correlation_id = CorrelationId::new("req-1");
/// let reply_to = ReplyTo::new("session-1");
/// log_prefill_start!(&correlation_id, &reply_to);
/// ```
#[macro_export]
macro_rules! log_prefill_start {
    ($correlation_id:expr, $reply_to:expr) => {
        tracing::info!(
            correlation_id = %$correlation_id,
            reply_to = %$reply_to,
            "Starting prefill run"
        );
    };
}

/// Log the completion of a prefill run
///
/// # Example
///
/// ```no_run
/// use prefill::log_prefill_complete;
/// use std::time::Duration;
///
/// log_prefill_complete!("req-1", 6, Duration::from_millis(420));
/// ```
#[macro_export]
macro_rules! log_prefill_complete {
    ($correlation_id:expr, $entries:expr, $duration:expr) => {
        tracing::info!(
            correlation_id = %$correlation_id,
            entries = $entries,
            duration_ms = $duration.as_millis() as u64,
            "Prefill run completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use prefill::log_error_with_context;
/// use prefill::domain::PrefillError;
///
/// let error = PrefillError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
