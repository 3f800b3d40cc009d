//! Sampling configuration
//!
//! Options arrive as string pairs, either as a map or as an agent argument
//! string such as `top=20,interval=10ms,period=5m`. A [`SamplingConfig`] is only
//! handed out after every option has been parsed and the cadence checked, so
//! a sampler never starts with half-valid settings.
//!
//! | Option            | Meaning                                  | Default |
//! |-------------------|------------------------------------------|---------|
//! | `top`             | rows per report                          | 20      |
//! | `max-stack-depth` | frames walked per sample                 | 128     |
//! | `delay`           | wait before the first window             | `0s`    |
//! | `duration`        | active sampling time per window, 0 = all | `0s`    |
//! | `interval`        | time between two samples                 | `50ms`  |
//! | `period`          | window length, 0 = one single window     | `0s`    |
//!
//! Unknown options are ignored.

mod duration;

use core::str::FromStr;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::ConfigError;

use self::duration::parse_duration;

/// Option name of [`SamplingConfig::top`]
pub const TOP: &str = "top";
/// Option name of [`SamplingConfig::max_stack_depth`]
pub const MAX_STACK_DEPTH: &str = "max-stack-depth";
/// Option name of [`SamplingConfig::profiling_delay`]
pub const DELAY: &str = "delay";
/// Option name of [`SamplingConfig::profiling_duration`]
pub const DURATION: &str = "duration";
/// Option name of [`SamplingConfig::sampling_interval`]
pub const INTERVAL: &str = "interval";
/// Option name of [`SamplingConfig::profiling_period`]
pub const PERIOD: &str = "period";

/// Default number of report rows
pub const DEFAULT_TOP: usize = 20;
/// Default number of frames walked per sample
pub const DEFAULT_MAX_STACK_DEPTH: usize = 128;
/// Default time between two samples
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(50);

/// Validated sampling cadence and report size
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use hotcode::config::SamplingConfig;
///
/// let config: SamplingConfig = "top=5,duration=30s,period=5m".parse().unwrap();
/// assert_eq!(config.top(), 5);
/// assert_eq!(config.profiling_duration(), Duration::from_secs(30));
///
/// // The sampling window has to fit in its period
/// assert!("duration=30s,period=20s".parse::<SamplingConfig>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SamplingConfig {
    top: usize,
    max_stack_depth: usize,
    profiling_delay: Duration,
    profiling_duration: Duration,
    sampling_interval: Duration,
    profiling_period: Duration,
}

impl SamplingConfig {
    /// Start from the defaults
    pub fn builder() -> SamplingConfigBuilder {
        SamplingConfigBuilder::default()
    }

    /// Build from `(name, value)` option pairs
    ///
    /// A later pair overrides an earlier one with the same name.
    pub fn from_options<I, K, V>(options: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut builder = Self::builder();
        for (name, value) in options {
            builder.apply(name.as_ref(), value.as_ref())?;
        }
        builder.build()
    }

    /// Rows per report
    pub fn top(&self) -> usize {
        self.top
    }

    /// Maximum frames walked per sample
    pub fn max_stack_depth(&self) -> usize {
        self.max_stack_depth
    }

    /// Wait before the first sampling window opens
    pub fn profiling_delay(&self) -> Duration {
        self.profiling_delay
    }

    /// Active sampling time within each window, zero for the whole window
    pub fn profiling_duration(&self) -> Duration {
        self.profiling_duration
    }

    /// Time between two samples
    pub fn sampling_interval(&self) -> Duration {
        self.sampling_interval
    }

    /// Length of a recurring window, zero when sampling is not periodic
    pub fn profiling_period(&self) -> Duration {
        self.profiling_period
    }

    /// Check if windows recur, with counts reset at each boundary
    pub fn is_periodic(&self) -> bool {
        !self.profiling_period.is_zero()
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            top: DEFAULT_TOP,
            max_stack_depth: DEFAULT_MAX_STACK_DEPTH,
            profiling_delay: Duration::ZERO,
            profiling_duration: Duration::ZERO,
            sampling_interval: DEFAULT_INTERVAL,
            profiling_period: Duration::ZERO,
        }
    }
}

impl FromStr for SamplingConfig {
    type Err = ConfigError;

    /// Parse comma separated `key=value` pairs
    fn from_str(args: &str) -> Result<Self, Self::Err> {
        let pairs = args
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                segment
                    .split_once('=')
                    .map(|(name, value)| (name.trim(), value.trim()))
                    .ok_or_else(|| ConfigError::MalformedOption {
                        segment: segment.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_options(pairs)
    }
}

/// Builder for [`SamplingConfig`]
///
/// Setters do not validate; [`build`](Self::build) does.
#[derive(Debug, Clone, Default)]
pub struct SamplingConfigBuilder {
    config: SamplingConfig,
}

impl SamplingConfigBuilder {
    /// Rows per report
    pub fn top(mut self, top: usize) -> Self {
        self.config.top = top;
        self
    }

    /// Maximum frames walked per sample
    pub fn max_stack_depth(mut self, depth: usize) -> Self {
        self.config.max_stack_depth = depth;
        self
    }

    /// Wait before the first sampling window opens
    pub fn profiling_delay(mut self, delay: Duration) -> Self {
        self.config.profiling_delay = delay;
        self
    }

    /// Active sampling time within each window
    pub fn profiling_duration(mut self, duration: Duration) -> Self {
        self.config.profiling_duration = duration;
        self
    }

    /// Time between two samples
    pub fn sampling_interval(mut self, interval: Duration) -> Self {
        self.config.sampling_interval = interval;
        self
    }

    /// Length of a recurring window, zero for a single window
    pub fn profiling_period(mut self, period: Duration) -> Self {
        self.config.profiling_period = period;
        self
    }

    /// Parse one named option into the builder
    fn apply(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let config = &mut self.config;
        match name {
            TOP => config.top = parse_positive(name, value)?,
            MAX_STACK_DEPTH => config.max_stack_depth = parse_positive(name, value)?,
            DELAY => config.profiling_delay = parse_duration(name, value)?,
            DURATION => config.profiling_duration = parse_duration(name, value)?,
            INTERVAL => config.sampling_interval = parse_duration(name, value)?,
            PERIOD => config.profiling_period = parse_duration(name, value)?,
            _ => warn!(option = name, "ignoring unknown sampling option"),
        }
        Ok(())
    }

    /// Validate and produce the configuration
    pub fn build(self) -> Result<SamplingConfig, ConfigError> {
        let config = self.config;

        if config.top == 0 {
            return Err(not_positive(TOP));
        }
        if config.max_stack_depth == 0 {
            return Err(not_positive(MAX_STACK_DEPTH));
        }
        if config.is_periodic() && config.profiling_duration >= config.profiling_period {
            return Err(ConfigError::DurationNotWithinPeriod {
                duration: config.profiling_duration,
                period: config.profiling_period,
            });
        }

        debug!(
            top = config.top,
            max_stack_depth = config.max_stack_depth,
            delay = ?config.profiling_delay,
            duration = ?config.profiling_duration,
            interval = ?config.sampling_interval,
            period = ?config.profiling_period,
            "sampling configuration validated"
        );
        Ok(config)
    }
}

fn parse_positive(option: &str, value: &str) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 && value.bytes().all(|b| b.is_ascii_digit()) => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            option: option.to_string(),
            value: value.to_string(),
        }),
    }
}

fn not_positive(option: &str) -> ConfigError {
    ConfigError::InvalidNumber {
        option: option.to_string(),
        value: "0".to_string(),
    }
}
