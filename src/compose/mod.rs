//! Compose stages and the pipeline that chains them.
//!
//! A stage takes the shared configuration and the current item sequence and
//! returns a new sequence. Stages never see each other's state; only the
//! sequence flows forward.
use crate::config::Configuration;
use crate::error::ComposeError;
use std::collections::BTreeMap;

mod iterate;
mod pipeline;
mod shuffle;

pub use iterate::{IterationOrder, Iterate, ITERATIONS_OPTION, ORDER_OPTION};
pub use pipeline::{Composition, Pipeline, StageKind, STAGES_OPTION};
pub use shuffle::{Shuffle, SEED_OPTION, SHUFFLE_OPTION};

/// Result of one stage: the new sequence plus any option values the stage
/// chose on its own.
///
/// `resolved` is how a stage makes otherwise hidden choices (a generated
/// shuffle seed) visible to the caller for later replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutput<T> {
    pub items: Vec<T>,
    pub resolved: BTreeMap<String, String>,
}

impl<T> StageOutput<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            resolved: BTreeMap::new(),
        }
    }

    pub fn with_resolved(mut self, key: &str, value: impl ToString) -> Self {
        self.resolved.insert(key.to_string(), value.to_string());
        self
    }
}

/// A pure transformation of an ordered item sequence.
pub trait Compose<T> {
    /// Short stage name used in logs and the `stages` option.
    fn name(&self) -> &'static str;

    fn apply(&self, config: &Configuration, items: Vec<T>)
        -> Result<StageOutput<T>, ComposeError>;
}
