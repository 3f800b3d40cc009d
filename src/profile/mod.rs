//! Frequency profiles of sampled locations
//!
//! A profile counts how often each key (typically a method signature) was
//! observed during a sampling window and ranks the hottest ones.
//!
//! # Types
//!
//! - [`TopKProfile`]: exact counter owned by one thread
//! - [`SharedProfile`]: the same counter behind a mutex, for sampling threads
//!   that report concurrently with a reporting thread
//!
//! # Example
//!
//! ```
//! use hotcode::profile::TopKProfile;
//!
//! let mut profile = TopKProfile::new();
//!
//! profile.record("HashMap::get");
//! profile.record("Vec::push");
//! profile.record("HashMap::get");
//!
//! let hottest = profile.top_k(1).unwrap();
//! assert_eq!(hottest, vec!["HashMap::get"]);
//! ```

mod shared;
mod top_k;

pub use shared::SharedProfile;
pub use top_k::TopKProfile;
