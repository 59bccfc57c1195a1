//! JSON model for profile documents.
//!
//! ```json
//! {
//!   "entry": "daily",
//!   "count": 12,
//!   "profiles": {
//!     "daily": {
//!       "scenarios": [
//!         { "scenario": "open_maps", "schedule": "early" },
//!         { "include": "browse" },
//!         { "scenario": "close_apps", "schedule": "late", "weight": 2 }
//!       ]
//!     }
//!   }
//! }
//! ```
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placement constraint for a scenario within a resolved profile.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleHint {
    #[default]
    None,
    Early,
    Late,
}

impl ScheduleHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleHint::None => "none",
            ScheduleHint::Early => "early",
            ScheduleHint::Late => "late",
        }
    }
}

/// Reference to a single executable scenario.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ScenarioRef {
    pub scenario: String,
    #[serde(default)]
    pub schedule: ScheduleHint,
    /// Number of times the scenario runs per expansion; 0 disables it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    /// Free-form arguments passed through to the runner.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

/// Inclusion of another profile at this position.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct IncludeRef {
    pub include: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ProfileEntry {
    Scenario(ScenarioRef),
    Include(IncludeRef),
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProfileSpec {
    #[serde(default)]
    pub scenarios: Vec<ProfileEntry>,
}

/// Top-level profile document.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProfileDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    /// Total number of scenario runs; the scheduled order is cycled or cut to fit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileSpec>,
}

/// Scenario after expansion, in final run order.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ResolvedScenario {
    pub scenario: String,
    pub schedule: ScheduleHint,
    /// Profile that declared this scenario.
    pub profile: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ResolvedProfile {
    pub name: String,
    pub scenarios: Vec<ResolvedScenario>,
}

impl ResolvedProfile {
    pub fn scenario_names(&self) -> Vec<&str> {
        self.scenarios
            .iter()
            .map(|scenario| scenario.scenario.as_str())
            .collect()
    }
}
