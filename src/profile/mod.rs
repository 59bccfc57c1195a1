//! Profile stage: select and order test items from a scheduled profile.
//!
//! Resolution moves through `Unresolved -> Parsing -> Resolved | Failed`. A
//! configuration without a `profile` option stays `Unresolved` and the stage
//! passes the suite through untouched. Any failure is terminal for the
//! composition call.
use crate::compose::{Compose, StageOutput};
use crate::config::Configuration;
use crate::error::{ComposeError, ProfileResolutionError};
use std::collections::BTreeMap;

mod load;
mod resolve;
mod types;

pub use load::{ProfileSource, PROFILE_DIR_OPTION, PROFILE_NAME_OPTION, PROFILE_OPTION};
pub use resolve::resolve_profile;
pub use types::*;

/// Items the profile stage can match against scenario names.
pub trait Named {
    fn scenario_name(&self) -> &str;
}

impl Named for String {
    fn scenario_name(&self) -> &str {
        self
    }
}

impl Named for &str {
    fn scenario_name(&self) -> &str {
        self
    }
}

/// Outcome of a successful resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No profile configured.
    Unresolved,
    Resolved(ResolvedProfile),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Profile;

impl Profile {
    /// Locate, parse, and expand the configured profile.
    pub fn resolve(config: &Configuration) -> Result<Resolution, ComposeError> {
        let Some(source) = ProfileSource::from_config(config)? else {
            tracing::debug!("no profile configured");
            return Ok(Resolution::Unresolved);
        };
        tracing::debug!(origin = %source.origin(), "parsing profile");
        let resolved = source.load().and_then(|document| {
            let entry = source.entry_name(config, &document)?;
            resolve_profile(&document, &entry)
        });
        match resolved {
            Ok(profile) => {
                tracing::info!(
                    profile = %profile.name,
                    scenarios = profile.scenarios.len(),
                    "profile resolved"
                );
                Ok(Resolution::Resolved(profile))
            }
            Err(err) => {
                tracing::debug!(origin = %source.origin(), error = %err, "profile failed");
                Err(err)
            }
        }
    }

    /// Emit the items matching each resolved scenario, in scenario order.
    ///
    /// Items sharing a scenario name are all emitted, in input order.
    pub fn select<T: Named + Clone>(
        profile: &ResolvedProfile,
        items: &[T],
    ) -> Result<Vec<T>, ComposeError> {
        let mut by_name: BTreeMap<&str, Vec<&T>> = BTreeMap::new();
        for item in items {
            by_name.entry(item.scenario_name()).or_default().push(item);
        }
        let mut out = Vec::with_capacity(profile.scenarios.len());
        for scenario in &profile.scenarios {
            let matches = by_name.get(scenario.scenario.as_str()).ok_or_else(|| {
                ProfileResolutionError::UnknownScenario {
                    scenario: scenario.scenario.clone(),
                }
            })?;
            out.extend(matches.iter().map(|item| (*item).clone()));
        }
        Ok(out)
    }
}

impl<T: Named + Clone> Compose<T> for Profile {
    fn name(&self) -> &'static str {
        "profile"
    }

    fn apply(
        &self,
        config: &Configuration,
        items: Vec<T>,
    ) -> Result<StageOutput<T>, ComposeError> {
        match Self::resolve(config)? {
            Resolution::Unresolved => Ok(StageOutput::new(items)),
            Resolution::Resolved(profile) => {
                let selected = Self::select(&profile, &items)?;
                Ok(StageOutput::new(selected).with_resolved(PROFILE_NAME_OPTION, &profile.name))
            }
        }
    }
}
