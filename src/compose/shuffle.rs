//! Reorder the suite with a reproducible seed.
//!
//! The permutation is a Fisher-Yates pass driven by `StdRng::seed_from_u64`:
//! for `i` from `len - 1` down to `1`, draw `j` uniformly from `0..=i` and swap
//! positions `i` and `j`. The seed is reinterpreted as `u64` bit for bit.
use super::{Compose, StageOutput};
use crate::config::Configuration;
use crate::error::ComposeError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SHUFFLE_OPTION: &str = "shuffle";
pub const SEED_OPTION: &str = "seed";

#[derive(Debug, Clone, Copy, Default)]
pub struct Shuffle;

impl Shuffle {
    /// Shuffle `items` in place with the given seed.
    pub fn permute<T>(items: &mut [T], seed: i64) {
        let mut rng = StdRng::seed_from_u64(seed as u64);
        for i in (1..items.len()).rev() {
            let j = rng.random_range(0..=i);
            items.swap(i, j);
        }
    }
}

impl<T> Compose<T> for Shuffle {
    fn name(&self) -> &'static str {
        "shuffle"
    }

    fn apply(
        &self,
        config: &Configuration,
        mut items: Vec<T>,
    ) -> Result<StageOutput<T>, ComposeError> {
        let enabled = config.get_bool(SHUFFLE_OPTION, false)?;
        let configured_seed = config.get_optional_long(SEED_OPTION)?;
        if !enabled {
            return Ok(StageOutput::new(items));
        }
        let seed = match configured_seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<i64>();
                tracing::info!(seed, "no shuffle seed configured; generated one");
                seed
            }
        };
        tracing::debug!(seed, input = items.len(), "shuffling suite");
        Self::permute(&mut items, seed);
        Ok(StageOutput::new(items).with_resolved(SEED_OPTION, seed))
    }
}
