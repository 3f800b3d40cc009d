//! # Hotcode
//!
//! Frequency profiles for sampling hot-code profilers.
//!
//! A stack sampler reports every observed location (a method, a frame, any
//! hashable key) to a profile. At the end of each sampling window the profile
//! is ranked and the hottest locations are rendered as a fixed-width table.
//!
//! ## Features
//!
//! - **Exact counting**: [`TopKProfile`] counts every key and ranks the top K
//!   with deterministic tie-breaks
//! - **Concurrent ingestion**: [`SharedProfile`] accepts samples from several
//!   threads while a reporter reads consistent snapshots
//! - **Reports**: [`Reporter`] renders `COUNT | % | METHOD` tables
//! - **Configuration**: [`SamplingConfig`] validates sampling cadence options
//!
//! ## Quick Start
//!
//! ```rust
//! use hotcode::prelude::*;
//!
//! let config: SamplingConfig = "top=3,interval=10ms,duration=30s,period=5m".parse().unwrap();
//! let profile = SharedProfile::new();
//!
//! // Sampling threads report what they see
//! for frame in ["Vec::push", "HashMap::get", "Vec::push", "String::clone"] {
//!     profile.report(frame);
//! }
//!
//! // At the end of the window, report and reset in one step
//! let window = profile.take();
//! let table = Reporter::from_config(&config).render(&window).unwrap();
//! println!("{table}");
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize` for profiles, ranked entries and configurations

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod profile;
pub mod report;
pub mod traits;

pub mod prelude {
    pub use crate::config::SamplingConfig;
    pub use crate::error::{ConfigError, ProfileError, ReportError};
    pub use crate::profile::{SharedProfile, TopKProfile};
    pub use crate::report::Reporter;
    pub use crate::traits::*;
}

pub use config::SamplingConfig;
pub use error::{ConfigError, ProfileError, ReportError};
pub use profile::{SharedProfile, TopKProfile};
pub use report::Reporter;
