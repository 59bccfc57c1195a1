//! Configuration-driven composition of instrumentation test suites.
//!
//! A runner discovers an ordered list of tests, then hands it to a
//! [`Pipeline`] together with a flat [`Configuration`]. Each stage returns a
//! new ordered list:
//!
//! - [`Profile`] selects and orders tests from a scheduled profile document.
//! - [`Iterate`] repeats the suite (`iterations`, `order`).
//! - [`Shuffle`] permutes it reproducibly (`shuffle`, `seed`).
//!
//! ```
//! use suite_composer::{Configuration, Pipeline};
//!
//! let config = Configuration::new()
//!     .with("iterations", 2)
//!     .with("shuffle", true);
//! let tests: Vec<String> = vec!["open_maps".into(), "search".into()];
//! let composed = Pipeline::standard().compose(&config, tests).unwrap();
//! assert_eq!(composed.items.len(), 4);
//! // The generated seed is reported so the run can be replayed.
//! assert!(composed.resolved.contains_key("seed"));
//! ```
pub mod compose;
pub mod config;
pub mod error;
pub mod profile;

pub use compose::{Compose, Composition, Iterate, Pipeline, Shuffle, StageKind, StageOutput};
pub use config::Configuration;
pub use error::{ComposeError, ConfigurationError, ProfileCycleError, ProfileResolutionError};
pub use profile::{Named, Profile, ResolvedProfile, ScheduleHint};
