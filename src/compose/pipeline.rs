//! Ordered chain of compose stages.
use super::{Compose, Iterate, Shuffle};
use crate::config::Configuration;
use crate::error::{ComposeError, ConfigurationError};
use crate::profile::{Named, Profile};
use serde::Serialize;
use std::collections::BTreeMap;

/// Comma-separated stage order, e.g. `profile,iterate,shuffle`.
pub const STAGES_OPTION: &str = "stages";

/// Stages the pipeline can build by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Profile,
    Iterate,
    Shuffle,
}

impl StageKind {
    pub const STANDARD: [StageKind; 3] =
        [StageKind::Profile, StageKind::Iterate, StageKind::Shuffle];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Profile => "profile",
            StageKind::Iterate => "iterate",
            StageKind::Shuffle => "shuffle",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "profile" => Some(StageKind::Profile),
            "iterate" => Some(StageKind::Iterate),
            "shuffle" => Some(StageKind::Shuffle),
            _ => None,
        }
    }

    /// Read the `stages` option, falling back to the standard order.
    pub fn order_from_config(
        config: &Configuration,
    ) -> Result<Vec<StageKind>, ConfigurationError> {
        let Some(raw) = config.get(STAGES_OPTION) else {
            return Ok(Self::STANDARD.to_vec());
        };
        let mut order = Vec::new();
        for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            let kind = StageKind::parse(&name.to_ascii_lowercase()).ok_or_else(|| {
                ConfigurationError::malformed(STAGES_OPTION, raw, "profile, iterate, or shuffle")
            })?;
            if order.contains(&kind) {
                return Err(ConfigurationError::Invalid(format!(
                    "stage {} listed more than once in {STAGES_OPTION:?}",
                    kind.as_str()
                )));
            }
            order.push(kind);
        }
        if order.is_empty() {
            return Err(ConfigurationError::Invalid(format!(
                "{STAGES_OPTION:?} is set but names no stage"
            )));
        }
        Ok(order)
    }
}

/// Final composed suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Composition<T> {
    pub items: Vec<T>,
    /// Option values chosen by stages rather than the caller.
    pub resolved: BTreeMap<String, String>,
}

impl<T> Composition<T> {
    /// `base` with every stage-chosen value pinned, so composing again with
    /// the returned configuration reproduces this suite.
    pub fn replay_configuration(&self, base: &Configuration) -> Configuration {
        self.resolved
            .iter()
            .fold(base.clone(), |config, (key, value)| config.with(key.as_str(), value))
    }
}

pub struct Pipeline<T> {
    stages: Vec<Box<dyn Compose<T>>>,
}

impl<T> Default for Pipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Pipeline<T> {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn stage(mut self, stage: impl Compose<T> + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run every stage in order over `items` with the same configuration.
    pub fn compose(
        &self,
        config: &Configuration,
        items: Vec<T>,
    ) -> Result<Composition<T>, ComposeError> {
        let mut items = items;
        let mut resolved = BTreeMap::new();
        for stage in &self.stages {
            let input = items.len();
            let output = stage.apply(config, items)?;
            tracing::debug!(
                stage = stage.name(),
                input,
                output = output.items.len(),
                "stage applied"
            );
            items = output.items;
            resolved.extend(output.resolved);
        }
        tracing::info!(items = items.len(), stages = self.stages.len(), "suite composed");
        Ok(Composition { items, resolved })
    }
}

impl<T: Named + Clone + 'static> Pipeline<T> {
    pub fn from_kinds(kinds: &[StageKind]) -> Self {
        kinds.iter().fold(Self::new(), |pipeline, kind| match kind {
            StageKind::Profile => pipeline.stage(Profile),
            StageKind::Iterate => pipeline.stage(Iterate),
            StageKind::Shuffle => pipeline.stage(Shuffle),
        })
    }

    /// Profile, then Iterate, then Shuffle.
    pub fn standard() -> Self {
        Self::from_kinds(&StageKind::STANDARD)
    }

    /// Build the stage order named by the `stages` option.
    pub fn from_config(config: &Configuration) -> Result<Self, ConfigurationError> {
        Ok(Self::from_kinds(&StageKind::order_from_config(config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{ITERATIONS_OPTION, SEED_OPTION, SHUFFLE_OPTION};
    use crate::profile::PROFILE_OPTION;

    fn suite() -> Vec<String> {
        (1..=9).map(|n| format!("test{n}")).collect()
    }

    #[test]
    fn empty_pipeline_is_identity() {
        let pipeline: Pipeline<String> = Pipeline::new();
        let out = pipeline.compose(&Configuration::new(), suite()).unwrap();
        assert_eq!(out.items, suite());
    }

    #[test]
    fn standard_order_and_defaults() {
        let pipeline: Pipeline<String> = Pipeline::standard();
        assert_eq!(pipeline.stage_names(), ["profile", "iterate", "shuffle"]);
        let out = pipeline.compose(&Configuration::new(), suite()).unwrap();
        assert_eq!(out.items, suite());
        assert!(out.resolved.is_empty());
    }

    #[test]
    fn iterations_then_shuffle_keeps_counts() {
        let config = Configuration::new()
            .with(ITERATIONS_OPTION, 3)
            .with(SHUFFLE_OPTION, true)
            .with(SEED_OPTION, 42);
        let out = Pipeline::standard().compose(&config, suite()).unwrap();
        assert_eq!(out.items.len(), 27);
        for name in suite() {
            assert_eq!(out.items.iter().filter(|item| **item == name).count(), 3);
        }
        assert_eq!(out.resolved.get(SEED_OPTION).map(String::as_str), Some("42"));
    }

    #[test]
    fn replay_pins_generated_seed() {
        let config = Configuration::new()
            .with(ITERATIONS_OPTION, 2)
            .with(SHUFFLE_OPTION, true);
        let pipeline = Pipeline::standard();
        let first = pipeline.compose(&config, suite()).unwrap();
        let replay = first.replay_configuration(&config);
        assert!(replay.contains(SEED_OPTION));
        let second = pipeline.compose(&replay, suite()).unwrap();
        assert_eq!(first.items, second.items);
    }

    #[test]
    fn stages_option_controls_order() {
        let config = Configuration::new().with(STAGES_OPTION, "shuffle, Iterate");
        let pipeline: Pipeline<String> = Pipeline::from_config(&config).unwrap();
        assert_eq!(pipeline.stage_names(), ["shuffle", "iterate"]);

        let bad = Configuration::new().with(STAGES_OPTION, "iterate,repeat");
        assert!(Pipeline::<String>::from_config(&bad).is_err());
        let dup = Configuration::new().with(STAGES_OPTION, "iterate,iterate");
        assert!(Pipeline::<String>::from_config(&dup).is_err());

        for blank in ["", " , "] {
            let empty = Configuration::new().with(STAGES_OPTION, blank);
            assert!(matches!(
                Pipeline::<String>::from_config(&empty),
                Err(ConfigurationError::Invalid(_))
            ));
        }
    }

    #[test]
    fn error_aborts_without_output() {
        let config = Configuration::new()
            .with(PROFILE_OPTION, r#"{"profiles": {"p": {"scenarios": [{"include": "p"}]}}}"#)
            .with(ITERATIONS_OPTION, 2);
        let err = Pipeline::<String>::standard()
            .compose(&config, suite())
            .unwrap_err();
        assert!(matches!(err, ComposeError::ProfileCycle(_)));
    }

    #[test]
    fn profile_feeds_iterate() {
        let config = Configuration::new()
            .with(
                PROFILE_OPTION,
                r#"{"profiles": {"smoke": {"scenarios": [
                    {"scenario": "test2", "schedule": "late"},
                    {"scenario": "test5"}
                ]}}}"#,
            )
            .with(ITERATIONS_OPTION, 2);
        let out = Pipeline::standard().compose(&config, suite()).unwrap();
        assert_eq!(out.items, ["test5", "test2", "test5", "test2"]);
        assert_eq!(out.resolved.get("profile-name").map(String::as_str), Some("smoke"));
    }
}
