//! Error types
//!
//! Recording samples never fails. Errors come from ranking with an invalid
//! size, from building a [`SamplingConfig`](crate::config::SamplingConfig)
//! out of malformed options, and from writing a report to a sink.

use std::time::Duration;

use thiserror::Error;

/// Error returned by profile queries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// Top-K was requested with `k == 0`
    #[error("invalid argument: at least 1 top element should be requested, got {k}")]
    InvalidArgument { k: usize },
}

/// Error returned when sampling options do not form a valid configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A count option is not a positive integer
    #[error("invalid configuration: option `{option}` must be a positive integer, got {value:?}")]
    InvalidNumber { option: String, value: String },

    /// A duration option does not match `<digits>(ms|s|m|h)`
    #[error("invalid configuration: option `{option}` is not a duration (expected e.g. 50ms, 30s, 5m, 2h), got {value:?}")]
    InvalidDuration { option: String, value: String },

    /// The active sampling window does not fit inside its period
    #[error("invalid configuration: duration {duration:?} must be less than period {period:?}")]
    DurationNotWithinPeriod { duration: Duration, period: Duration },

    /// An argument segment is not of the form `key=value`
    #[error("invalid configuration: malformed option {segment:?}, expected key=value")]
    MalformedOption { segment: String },
}

/// Error returned while writing a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
