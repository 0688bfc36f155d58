//! Error types for detectr.
//!
//! Pattern-configuration mistakes (empty sequences, zero thresholds, removing
//! a stream that was never attached, unresolvable stats attributes) are not
//! errors: they degrade to silent no-ops. The errors below cover what remains:
//! unparseable labels and configuration, failing user callbacks, and the
//! background ticker's worker thread.

use thiserror::Error;

use crate::pattern::PatternKind;

/// Error returned by a user callback.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by user callbacks.
pub type CallbackResult = Result<(), CallbackError>;

/// Top-level error type for detectr.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("Unknown time unit '{unit}'")]
    InvalidTimeUnit {
        unit: String,
    },

    #[error("Unknown stats operation '{op}'")]
    InvalidStatOp {
        op: String,
    },

    #[error("Invalid configuration: {message}")]
    Config {
        message: String,
    },

    #[error("Callback for '{kind}' pattern failed: {source}")]
    Callback {
        kind: PatternKind,
        #[source]
        source: CallbackError,
    },

    #[error("Failed to spawn worker thread: {message}")]
    Spawn {
        message: String,
    },
}

impl DetectError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns true if this error was raised by a user callback.
    #[must_use]
    pub const fn is_callback(&self) -> bool {
        matches!(self, Self::Callback { .. })
    }

    /// Returns true if this error stems from invalid caller input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidTimeUnit { .. } | Self::InvalidStatOp { .. } | Self::Config { .. }
        )
    }
}

/// Result type alias for detectr operations.
pub type DetectResult<T> = Result<T, DetectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_time_unit_message() {
        let err = DetectError::InvalidTimeUnit {
            unit: "fortnight".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("fortnight"));
        assert!(err.is_validation());
        assert!(!err.is_callback());
    }

    #[test]
    fn test_callback_error_keeps_source() {
        let err = DetectError::Callback {
            kind: PatternKind::Sequence,
            source: "boom".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("sequence"));
        assert!(msg.contains("boom"));
        assert!(err.is_callback());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_config_helper() {
        let err = DetectError::config("bad tick");
        assert!(err.is_validation());
        assert!(format!("{err}").contains("bad tick"));
    }
}
