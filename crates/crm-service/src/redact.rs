//! Gate for donor data in log output.
//!
//! Prompts and service responses embed donor names, emails and addresses.
//! They are logged through [`redact_value`], which substitutes
//! [`REDACTED_VALUE`] unless [`set_log_data`] enabled raw logging.

use std::sync::atomic::{AtomicBool, Ordering};

static LOG_DATA_ENABLED: AtomicBool = AtomicBool::new(false);

/// Placeholder used when donor data logging is disabled.
pub const REDACTED_VALUE: &str = "[REDACTED]";

/// Allow or forbid donor data in log output. Off until called.
pub fn set_log_data(enable: bool) {
    LOG_DATA_ENABLED.store(enable, Ordering::Release);
}

/// Returns true if donor data may be logged.
pub fn log_data_enabled() -> bool {
    LOG_DATA_ENABLED.load(Ordering::Acquire)
}

/// Returns the input when donor data logging is enabled, otherwise a
/// redacted token.
pub fn redact_value(value: &str) -> &str {
    if log_data_enabled() {
        value
    } else {
        REDACTED_VALUE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_text_only_passes_once_enabled() {
        assert_eq!(redact_value("jane@email.com"), REDACTED_VALUE);

        set_log_data(true);
        assert_eq!(redact_value("jane@email.com"), "jane@email.com");

        set_log_data(false);
        assert_eq!(redact_value("jane@email.com"), REDACTED_VALUE);
    }
}
