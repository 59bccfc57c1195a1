//! Repeat the whole suite a configurable number of times.
use super::{Compose, StageOutput};
use crate::config::Configuration;
use crate::error::{ComposeError, ConfigurationError};

pub const ITERATIONS_OPTION: &str = "iterations";
pub const ORDER_OPTION: &str = "order";

const DEFAULT_ITERATIONS: i32 = 1;

/// How repetitions are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IterationOrder {
    /// `a b c a b c`: the whole sequence repeated back to back.
    #[default]
    Cyclic,
    /// `a a b b c c`: each item repeated in place.
    Sequential,
}

impl IterationOrder {
    fn from_config(config: &Configuration) -> Result<Self, ConfigurationError> {
        let Some(raw) = config.get(ORDER_OPTION) else {
            return Ok(Self::default());
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "cyclic" => Ok(Self::Cyclic),
            "sequential" => Ok(Self::Sequential),
            _ => Err(ConfigurationError::malformed(
                ORDER_OPTION,
                raw,
                "cyclic or sequential",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Iterate;

impl Iterate {
    fn iterations(config: &Configuration) -> Result<usize, ConfigurationError> {
        let value = config.get_int(ITERATIONS_OPTION, DEFAULT_ITERATIONS)?;
        usize::try_from(value).map_err(|_| ConfigurationError::Negative {
            key: ITERATIONS_OPTION.to_string(),
            value: i64::from(value),
        })
    }
}

impl<T: Clone> Compose<T> for Iterate {
    fn name(&self) -> &'static str {
        "iterate"
    }

    fn apply(
        &self,
        config: &Configuration,
        items: Vec<T>,
    ) -> Result<StageOutput<T>, ComposeError> {
        let iterations = Self::iterations(config)?;
        let order = IterationOrder::from_config(config)?;
        tracing::debug!(iterations, ?order, input = items.len(), "iterating suite");

        let mut out = Vec::new();
        match order {
            IterationOrder::Cyclic => {
                for _ in 0..iterations {
                    out.extend(items.iter().cloned());
                }
            }
            IterationOrder::Sequential => {
                for item in &items {
                    out.extend(std::iter::repeat_n(item, iterations).cloned());
                }
            }
        }
        Ok(StageOutput::new(out))
    }
}
