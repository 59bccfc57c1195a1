//! Expansion of a profile document into a scheduled scenario list.
//!
//! Includes are expanded in place, depth first, while a stack of the profiles
//! currently being expanded guards against inclusion cycles. Scheduling runs
//! once over the flattened result.
use super::types::{
    ProfileDocument, ProfileEntry, ResolvedProfile, ResolvedScenario, ScenarioRef, ScheduleHint,
};
use crate::error::{ComposeError, ProfileCycleError, ProfileResolutionError};

/// Upper bound on scenario runs a single document may expand to.
pub const MAX_SCENARIO_RUNS: usize = 10_000;

/// Resolve `entry` within `document` into its final scenario order.
pub fn resolve_profile(
    document: &ProfileDocument,
    entry: &str,
) -> Result<ResolvedProfile, ComposeError> {
    if let Some(count) = document.count.filter(|count| *count > MAX_SCENARIO_RUNS) {
        return Err(ProfileResolutionError::CountTooLarge {
            count,
            limit: MAX_SCENARIO_RUNS,
        }
        .into());
    }
    let mut expander = Expander {
        document,
        stack: Vec::new(),
        out: Vec::new(),
    };
    expander.expand(entry, "configuration")?;

    let mut scenarios = schedule(expander.out);
    if let Some(count) = document.count {
        scenarios = fit_to_count(scenarios, count);
    }
    Ok(ResolvedProfile {
        name: entry.to_string(),
        scenarios,
    })
}

struct Expander<'a> {
    document: &'a ProfileDocument,
    stack: Vec<&'a str>,
    out: Vec<ResolvedScenario>,
}

impl Expander<'_> {
    fn expand(&mut self, name: &str, referenced_by: &str) -> Result<(), ComposeError> {
        if let Some(start) = self.stack.iter().position(|active| *active == name) {
            let mut chain: Vec<String> = self.stack[start..]
                .iter()
                .map(|active| active.to_string())
                .collect();
            chain.push(name.to_string());
            return Err(ProfileCycleError { chain }.into());
        }
        let document = self.document;
        let (name, spec) = document.profiles.get_key_value(name).ok_or_else(|| {
            ProfileResolutionError::UndefinedProfile {
                name: name.to_string(),
                referenced_by: referenced_by.to_string(),
            }
        })?;

        self.stack.push(name.as_str());
        for (index, entry) in spec.scenarios.iter().enumerate() {
            match entry {
                ProfileEntry::Scenario(scenario) => self.push_scenario(name, index, scenario)?,
                ProfileEntry::Include(include) => {
                    if include.include.trim().is_empty() {
                        return Err(invalid_entry(name, index, "include must name a profile"));
                    }
                    self.expand(&include.include, &format!("profile {name:?}"))?;
                }
            }
        }
        self.stack.pop();
        Ok(())
    }

    fn push_scenario(
        &mut self,
        profile: &str,
        index: usize,
        scenario: &ScenarioRef,
    ) -> Result<(), ComposeError> {
        if scenario.scenario.trim().is_empty() {
            return Err(invalid_entry(profile, index, "scenario name must not be empty"));
        }
        let weight = scenario.weight.map_or(1, |weight| weight as usize);
        if self.out.len().saturating_add(weight) > MAX_SCENARIO_RUNS {
            return Err(invalid_entry(
                profile,
                index,
                &format!("expansion exceeds {MAX_SCENARIO_RUNS} scenario runs"),
            ));
        }
        for _ in 0..weight {
            self.out.push(ResolvedScenario {
                scenario: scenario.scenario.clone(),
                schedule: scenario.schedule,
                profile: profile.to_string(),
                extras: scenario.extras.clone(),
            });
        }
        Ok(())
    }
}

fn invalid_entry(profile: &str, index: usize, reason: &str) -> ComposeError {
    ProfileResolutionError::InvalidEntry {
        profile: profile.to_string(),
        index,
        reason: reason.to_string(),
    }
    .into()
}

/// Stable partition: early scenarios first, late scenarios last.
fn schedule(scenarios: Vec<ResolvedScenario>) -> Vec<ResolvedScenario> {
    let (early, rest): (Vec<_>, Vec<_>) = scenarios
        .into_iter()
        .partition(|scenario| scenario.schedule == ScheduleHint::Early);
    let (late, middle): (Vec<_>, Vec<_>) = rest
        .into_iter()
        .partition(|scenario| scenario.schedule == ScheduleHint::Late);
    early.into_iter().chain(middle).chain(late).collect()
}

fn fit_to_count(scenarios: Vec<ResolvedScenario>, count: usize) -> Vec<ResolvedScenario> {
    if scenarios.len() == count || scenarios.is_empty() {
        return scenarios;
    }
    scenarios.iter().cycle().take(count).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(json: &str) -> ProfileDocument {
        serde_json::from_str(json).expect("parse profile document")
    }

    fn names(document: &ProfileDocument, entry: &str) -> Vec<String> {
        resolve_profile(document, entry)
            .unwrap()
            .scenarios
            .into_iter()
            .map(|scenario| scenario.scenario)
            .collect()
    }

    #[test]
    fn early_and_late_hints_are_hoisted() {
        let doc = document(
            r#"{"profiles": {"p": {"scenarios": [
                {"scenario": "A", "schedule": "early"},
                {"scenario": "B"},
                {"scenario": "C", "schedule": "late"},
                {"scenario": "D", "schedule": "none"}
            ]}}}"#,
        );
        assert_eq!(names(&doc, "p"), ["A", "B", "D", "C"]);
    }

    #[test]
    fn hint_groups_keep_declaration_order() {
        let doc = document(
            r#"{"profiles": {"p": {"scenarios": [
                {"scenario": "L1", "schedule": "late"},
                {"scenario": "E1", "schedule": "early"},
                {"scenario": "N1"},
                {"scenario": "L2", "schedule": "late"},
                {"scenario": "E2", "schedule": "early"},
                {"scenario": "N2"}
            ]}}}"#,
        );
        assert_eq!(names(&doc, "p"), ["E1", "E2", "N1", "N2", "L1", "L2"]);
    }

    #[test]
    fn includes_expand_in_place_before_scheduling() {
        let doc = document(
            r#"{"profiles": {
                "outer": {"scenarios": [
                    {"scenario": "a"},
                    {"include": "inner"},
                    {"scenario": "d"}
                ]},
                "inner": {"scenarios": [
                    {"scenario": "b"},
                    {"scenario": "late", "schedule": "late"},
                    {"scenario": "c"}
                ]}
            }}"#,
        );
        assert_eq!(names(&doc, "outer"), ["a", "b", "c", "d", "late"]);

        let resolved = resolve_profile(&doc, "outer").unwrap();
        assert_eq!(resolved.scenarios[1].profile, "inner");
        assert_eq!(resolved.scenarios[0].profile, "outer");
    }

    #[test]
    fn mutual_inclusion_is_a_cycle() {
        let doc = document(
            r#"{"profiles": {
                "P1": {"scenarios": [{"scenario": "a"}, {"include": "P2"}]},
                "P2": {"scenarios": [{"include": "P1"}]}
            }}"#,
        );
        let err = resolve_profile(&doc, "P1").unwrap_err();
        match err {
            ComposeError::ProfileCycle(cycle) => assert_eq!(cycle.chain, ["P1", "P2", "P1"]),
            other => panic!("expected cycle error, got {other:?}"),
        }
    }

    #[test]
    fn self_inclusion_is_a_cycle() {
        let doc = document(r#"{"profiles": {"p": {"scenarios": [{"include": "p"}]}}}"#);
        assert!(matches!(
            resolve_profile(&doc, "p"),
            Err(ComposeError::ProfileCycle(ProfileCycleError { ref chain })) if chain == &["p", "p"]
        ));
    }

    #[test]
    fn diamond_inclusion_is_not_a_cycle() {
        let doc = document(
            r#"{"profiles": {
                "top": {"scenarios": [{"include": "left"}, {"include": "right"}]},
                "left": {"scenarios": [{"include": "shared"}]},
                "right": {"scenarios": [{"include": "shared"}]},
                "shared": {"scenarios": [{"scenario": "s"}]}
            }}"#,
        );
        assert_eq!(names(&doc, "top"), ["s", "s"]);
    }

    #[test]
    fn undefined_profiles_are_resolution_errors() {
        let doc = document(r#"{"profiles": {"p": {"scenarios": [{"include": "missing"}]}}}"#);
        let err = resolve_profile(&doc, "p").unwrap_err();
        assert!(matches!(
            err,
            ComposeError::ProfileResolution(ProfileResolutionError::UndefinedProfile { ref name, .. })
                if name == "missing"
        ));
        assert!(resolve_profile(&doc, "nope").is_err());
    }

    #[test]
    fn weights_repeat_and_count_fits_the_schedule() {
        let doc = document(
            r#"{"count": 5, "profiles": {"p": {"scenarios": [
                {"scenario": "a", "weight": 2},
                {"scenario": "skip", "weight": 0},
                {"scenario": "b", "schedule": "early"}
            ]}}}"#,
        );
        assert_eq!(names(&doc, "p"), ["b", "a", "a", "b", "a"]);

        let short = document(
            r#"{"count": 1, "profiles": {"p": {"scenarios": [{"scenario": "a"}, {"scenario": "b"}]}}}"#,
        );
        assert_eq!(names(&short, "p"), ["a"]);
    }

    #[test]
    fn empty_names_are_invalid_entries() {
        let doc = document(r#"{"profiles": {"p": {"scenarios": [{"scenario": " "}]}}}"#);
        assert!(matches!(
            resolve_profile(&doc, "p"),
            Err(ComposeError::ProfileResolution(
                ProfileResolutionError::InvalidEntry { index: 0, .. }
            ))
        ));
        let doc = document(r#"{"profiles": {"p": {"scenarios": [{"include": ""}]}}}"#);
        assert!(resolve_profile(&doc, "p").is_err());
    }

    #[test]
    fn oversized_expansions_are_rejected() {
        let doc = document(
            r#"{"profiles": {"p": {"scenarios": [{"scenario": "a"}, {"scenario": "b", "weight": 4000000000}]}}}"#,
        );
        assert!(matches!(
            resolve_profile(&doc, "p"),
            Err(ComposeError::ProfileResolution(
                ProfileResolutionError::InvalidEntry { index: 1, .. }
            ))
        ));

        let doc = document(
            r#"{"count": 50000, "profiles": {"p": {"scenarios": [{"scenario": "a"}]}}}"#,
        );
        assert!(matches!(
            resolve_profile(&doc, "p"),
            Err(ComposeError::ProfileResolution(
                ProfileResolutionError::CountTooLarge { count: 50000, .. }
            ))
        ));

        let at_limit = document(
            r#"{"count": 10000, "profiles": {"p": {"scenarios": [{"scenario": "a", "weight": 10000}]}}}"#,
        );
        assert_eq!(resolve_profile(&at_limit, "p").unwrap().scenarios.len(), MAX_SCENARIO_RUNS);
    }
}
