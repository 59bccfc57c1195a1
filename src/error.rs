//! Error taxonomy for suite composition.
//!
//! Every error aborts the whole composition: a runner never receives a
//! partially composed suite.
use std::path::PathBuf;
use thiserror::Error;

/// A malformed or unusable configuration value.
///
/// Absent keys are never an error; only explicit values that cannot be
/// interpreted surface here.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("option {key:?} has malformed value {value:?} (expected {expected})")]
    Malformed {
        key: String,
        value: String,
        expected: &'static str,
    },
    #[error("option {key:?} must be >= 0 (got {value})")]
    Negative { key: String, value: i64 },
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("read configuration {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigurationError {
    pub(crate) fn malformed(key: &str, value: &str, expected: &'static str) -> Self {
        ConfigurationError::Malformed {
            key: key.to_string(),
            value: value.to_string(),
            expected,
        }
    }
}

/// A profile document that could not be located, parsed, or expanded.
#[derive(Debug, Error)]
pub enum ProfileResolutionError {
    #[error("read profile document {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse profile document from {origin}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("profile document from {origin} has no entry profile (set `entry` or `profile-name`)")]
    NoEntry { origin: String },
    #[error("profile {name:?} is not defined (referenced by {referenced_by})")]
    UndefinedProfile { name: String, referenced_by: String },
    #[error("profile scenario {scenario:?} does not match any test item")]
    UnknownScenario { scenario: String },
    #[error("profile document count {count} exceeds the limit of {limit} scenario runs")]
    CountTooLarge { count: usize, limit: usize },
    #[error("option \"profile\" is set but blank")]
    BlankSource,
    #[error("profile {profile:?} entry {index}: {reason}")]
    InvalidEntry {
        profile: String,
        index: usize,
        reason: String,
    },
}

/// A profile that includes itself, directly or through other profiles.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("profile inclusion cycle: {}", .chain.join(" -> "))]
pub struct ProfileCycleError {
    /// Profile names from the first occurrence of the repeated profile to the
    /// repeated reference, inclusive.
    pub chain: Vec<String>,
}

/// Any failure raised while composing a suite.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    ProfileResolution(#[from] ProfileResolutionError),
    #[error(transparent)]
    ProfileCycle(#[from] ProfileCycleError),
}
